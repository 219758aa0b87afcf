//! Shared fixtures for the service-layer integration tests.
//!
//! Tests run against the in-memory store gateway, which enforces the same
//! contract as the Postgres gateway (store-assigned ids and timestamps,
//! unique columns, error classification), so every test here runs without
//! a database.

use std::sync::Arc;

use serde_json::{Value as JsonValue, json};
use uuid::Uuid;

use voltlane_admin::services::{
    BrandService, CallerIdentity, ComponentService, CustomerService, DiscountService,
    RequestContext, SharedStore,
};
use voltlane_admin::store::{MemoryStore, Record, Row, StoreGateway, Table};
use voltlane_core::{CustomerId, OrderId, ProductId, ProfileId, Role};

/// One in-memory store with every entity service wired over it.
pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub brands: BrandService,
    pub components: ComponentService,
    pub customers: CustomerService,
    pub discounts: DiscountService,
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

impl Harness {
    /// Build a harness over a fresh, empty store.
    #[must_use]
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let shared: SharedStore = Arc::clone(&store) as SharedStore;
        Self {
            brands: BrandService::new(Arc::clone(&shared)),
            components: ComponentService::new(Arc::clone(&shared)),
            customers: CustomerService::new(Arc::clone(&shared)),
            discounts: DiscountService::new(shared),
            store,
        }
    }

    /// Seed a profile with the given role and return a context acting as it.
    pub async fn ctx_with_role(&self, role: Role) -> RequestContext {
        let id = Uuid::new_v4();
        let mut record = Record::new();
        record.insert("id".to_owned(), json!(id.to_string()));
        record.insert("email".to_owned(), json!(format!("{role}@voltlane.dev")));
        record.insert("role".to_owned(), json!(role.to_string()));
        self.store
            .insert(Table::Profiles, record)
            .await
            .expect("seed profile");
        RequestContext::for_caller(CallerIdentity::new(ProfileId::new(id)))
    }

    /// Seed a customer row the way the storefront would.
    pub async fn seed_customer(&self, first: &str, last: &str, email: &str) -> CustomerId {
        let mut record = Record::new();
        record.insert("first_name".to_owned(), json!(first));
        record.insert("last_name".to_owned(), json!(last));
        record.insert("email".to_owned(), json!(email));
        let row = self
            .store
            .insert(Table::Customers, record)
            .await
            .expect("seed customer");
        CustomerId::new(row_id(&row))
    }

    /// Seed a catalog product.
    pub async fn seed_product(&self, name: &str, price: &str) -> ProductId {
        let mut record = Record::new();
        record.insert("name".to_owned(), json!(name));
        record.insert("price".to_owned(), json!(price));
        let row = self
            .store
            .insert(Table::Products, record)
            .await
            .expect("seed product");
        ProductId::new(row_id(&row))
    }

    /// Seed an order for a customer.
    pub async fn seed_order(&self, customer: CustomerId, total: &str) -> OrderId {
        let mut record = Record::new();
        record.insert("customer_id".to_owned(), json!(customer.to_string()));
        record.insert("total_amount".to_owned(), json!(total));
        let row = self
            .store
            .insert(Table::Orders, record)
            .await
            .expect("seed order");
        OrderId::new(row_id(&row))
    }

    /// Seed a line item referencing a product by raw id, which lets tests
    /// point at products that do not exist.
    pub async fn seed_order_item(
        &self,
        order: OrderId,
        product: Uuid,
        unit_price: &str,
        quantity: i32,
    ) {
        let mut record = Record::new();
        record.insert("order_id".to_owned(), json!(order.to_string()));
        record.insert("product_id".to_owned(), json!(product.to_string()));
        record.insert("unit_price".to_owned(), json!(unit_price));
        record.insert("quantity".to_owned(), json!(quantity));
        self.store
            .insert(Table::OrderItems, record)
            .await
            .expect("seed order item");
    }
}

/// Extract the store-assigned UUID primary key from a returned row.
#[must_use]
pub fn row_id(row: &Row) -> Uuid {
    row.get("id")
        .and_then(JsonValue::as_str)
        .and_then(|s| Uuid::parse_str(s).ok())
        .expect("row carries a uuid id")
}
