//! Database migration command.
//!
//! Applies the migrations embedded from `crates/admin/migrations/` to the
//! database named by `VOLTLANE_DATABASE_URL` (or `DATABASE_URL`).

use tracing::info;

use voltlane_admin::AdminConfig;
use voltlane_admin::store::create_pool;

/// Migration failures.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("Configuration error: {0}")]
    Config(#[from] voltlane_admin::config::ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run database migrations.
///
/// # Errors
///
/// Returns an error if configuration is missing, the database is
/// unreachable, or a migration fails to apply.
pub async fn run() -> Result<(), MigrationError> {
    let config = AdminConfig::from_env()?;

    info!("Connecting to database...");
    let pool = create_pool(&config.database_url, &config.pool).await?;

    info!("Running migrations...");
    sqlx::migrate!("../admin/migrations").run(&pool).await?;

    info!("Migrations complete!");
    Ok(())
}
