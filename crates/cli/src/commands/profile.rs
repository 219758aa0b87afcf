//! Profile management commands.
//!
//! Profiles are normally written by the authentication provider at sign-in;
//! this command exists to bootstrap the first admin and to change roles
//! without going through the dashboard.

use std::str::FromStr;

use serde_json::json;
use tracing::info;

use voltlane_admin::AdminConfig;
use voltlane_admin::store::{
    Filter, PgStore, Record, ScalarValue, StoreGateway, Table, create_pool,
};
use voltlane_core::{Email, Role};

/// Grant `role` to the profile with the given email, creating the profile
/// row when none exists yet.
///
/// # Errors
///
/// Returns an error if the email or role is invalid, configuration is
/// missing, or the store rejects the write.
pub async fn grant(email: &str, role: &str) -> Result<(), Box<dyn std::error::Error>> {
    let email = Email::parse(email)?;
    let role = Role::from_str(role)?;

    let config = AdminConfig::from_env()?;
    let pool = create_pool(&config.database_url, &config.pool).await?;
    let store = PgStore::new(pool);

    let filter = Filter::Eq("email", ScalarValue::Text(email.as_str().to_owned()));
    let existing = store.select_one(Table::Profiles, &filter).await?;

    let mut record = Record::new();
    record.insert("role".to_owned(), json!(role.to_string()));

    if existing.is_some() {
        store.update(Table::Profiles, &filter, record).await?;
        info!(%email, %role, "updated profile role");
    } else {
        record.insert("email".to_owned(), json!(email.as_str()));
        store.insert(Table::Profiles, record).await?;
        info!(%email, %role, "created profile");
    }

    Ok(())
}
