//! Seed the database with demo catalog data.
//!
//! Creates a seeding admin profile, then drives the entity services the
//! same way the dashboard would: brands, components, and discounts go
//! through the policy checks; customers and orders (storefront-owned) are
//! written directly through the gateway.

use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use voltlane_admin::services::{
    BrandService, CallerIdentity, ComponentService, DiscountService, RequestContext,
};
use voltlane_admin::store::{
    Filter, PgStore, Record, Row, ScalarValue, StoreGateway, Table, create_pool,
};
use voltlane_admin::AdminConfig;
use voltlane_admin::models::{NewBrand, NewComponent, NewDiscount};
use voltlane_core::ProfileId;

const SEED_PROFILE_EMAIL: &str = "seed@voltlane.dev";

const BRANDS: &[(&str, &str)] = &[
    ("Hypervolt", "Boutique liquid-cooling gear"),
    ("Cindertech", "Budget-friendly cases and fans"),
    ("Northlight", "Premium PSUs and cabling"),
];

const COMPONENTS: &[(&str, &str)] = &[
    ("cpu", "Ryzen 9 9950X"),
    ("cpu", "Core Ultra 9 285K"),
    ("gpu", "GeForce RTX 5080"),
    ("gpu", "Radeon RX 9070 XT"),
    ("case", "Fractal North XL"),
];

/// Run the seeding process end to end.
///
/// # Errors
///
/// Returns an error if configuration is missing, the database is
/// unreachable, or any write is rejected.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AdminConfig::from_env()?;
    let pool = create_pool(&config.database_url, &config.pool).await?;
    let store: Arc<dyn StoreGateway> = Arc::new(PgStore::new(pool));

    let ctx = seeding_context(store.as_ref()).await?;

    let brands = BrandService::new(Arc::clone(&store));
    for (name, description) in BRANDS {
        let envelope = brands
            .create(
                &ctx,
                NewBrand {
                    name: (*name).to_owned(),
                    description: Some((*description).to_owned()),
                    ..NewBrand::default()
                },
            )
            .await;
        match envelope.into_result() {
            Ok(brand) => info!(slug = %brand.slug, "seeded brand"),
            Err(e) => info!(%name, reason = %e.message, "skipped brand"),
        }
    }

    let components = ComponentService::new(Arc::clone(&store));
    for (category, name) in COMPONENTS {
        let envelope = components
            .create(
                &ctx,
                NewComponent {
                    category: (*category).to_owned(),
                    name: (*name).to_owned(),
                },
            )
            .await;
        match envelope.into_result() {
            Ok(component) => info!(name = %component.name, "seeded component"),
            Err(e) => info!(%name, reason = %e.message, "skipped component"),
        }
    }

    let discounts = DiscountService::new(Arc::clone(&store));
    let envelope = discounts
        .create(
            &ctx,
            NewDiscount {
                code: "LAUNCH10".to_owned(),
                description: Some("Launch promotion".to_owned()),
                percent_off: Decimal::new(10, 0),
                ..NewDiscount::default()
            },
        )
        .await;
    match envelope.into_result() {
        Ok(discount) => info!(code = %discount.code, "seeded discount"),
        Err(e) => info!(reason = %e.message, "skipped discount"),
    }

    seed_storefront(store.as_ref()).await?;

    info!("Seeding complete!");
    Ok(())
}

/// Ensure the seeding admin profile exists and build a context acting as it.
async fn seeding_context(
    store: &dyn StoreGateway,
) -> Result<RequestContext, Box<dyn std::error::Error>> {
    let filter = Filter::Eq("email", ScalarValue::Text(SEED_PROFILE_EMAIL.to_owned()));
    let row = match store.select_one(Table::Profiles, &filter).await? {
        Some(row) => row,
        None => {
            let mut record = Record::new();
            record.insert("email".to_owned(), json!(SEED_PROFILE_EMAIL));
            record.insert("role".to_owned(), json!("admin"));
            store.insert(Table::Profiles, record).await?
        }
    };
    let id = row_id(&row)?;
    Ok(RequestContext::for_caller(CallerIdentity::new(
        ProfileId::new(id),
    )))
}

/// Demo customers with one order each, written directly through the gateway
/// since the dashboard never creates storefront records.
async fn seed_storefront(store: &dyn StoreGateway) -> Result<(), Box<dyn std::error::Error>> {
    let existing = store.count(Table::Customers, &Filter::All).await?;
    if existing > 0 {
        info!(existing, "customers already present, skipping storefront seed");
        return Ok(());
    }

    let mut product = Record::new();
    product.insert("name".to_owned(), json!("Voltlane Starter Tower"));
    product.insert("price".to_owned(), json!("1299.00"));
    let product_id = row_id(&store.insert(Table::Products, product).await?)?;

    for (first, last, email) in [
        ("Greg", "Halvorsen", "greg@example.com"),
        ("Margret", "Oduya", "margret@example.com"),
    ] {
        let mut customer = Record::new();
        customer.insert("first_name".to_owned(), json!(first));
        customer.insert("last_name".to_owned(), json!(last));
        customer.insert("email".to_owned(), json!(email));
        let customer_id = row_id(&store.insert(Table::Customers, customer).await?)?;

        let mut order = Record::new();
        order.insert("customer_id".to_owned(), json!(customer_id));
        order.insert("total_amount".to_owned(), json!("1299.00"));
        let order_id = row_id(&store.insert(Table::Orders, order).await?)?;

        let mut item = Record::new();
        item.insert("order_id".to_owned(), json!(order_id));
        item.insert("product_id".to_owned(), json!(product_id));
        item.insert("unit_price".to_owned(), json!("1299.00"));
        item.insert("quantity".to_owned(), json!(1));
        store.insert(Table::OrderItems, item).await?;

        info!(%email, "seeded customer with one order");
    }

    Ok(())
}

/// Pull the store-assigned UUID primary key out of a returned row.
fn row_id(row: &Row) -> Result<Uuid, Box<dyn std::error::Error>> {
    let raw = row
        .get("id")
        .and_then(|v| v.as_str())
        .ok_or("returned row carried no id")?;
    Ok(Uuid::from_str(raw)?)
}
