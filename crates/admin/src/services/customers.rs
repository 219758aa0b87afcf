//! Customer views.
//!
//! Read-only: the storefront owns customer records, the dashboard only
//! inspects them. There is no nested-read magic here - the single-customer
//! view is a composed fetch with a fixed depth of orders, their items, and
//! the referenced product names, issued as explicit sequential selects.

use std::collections::HashMap;

use chrono::{Duration, Utc};

use voltlane_core::{CustomerId, Envelope};

use crate::error::{IntoEnvelope, ServiceError};
use crate::models::{
    Customer, CustomerStats, CustomerWithOrders, Order, OrderItem, OrderItemDetail,
    OrderWithItems, Product, decode, decode_all,
};
use crate::services::SharedStore;
use crate::store::{Filter, Ordering, ScalarValue, Table};

/// Service for the customer entity family.
pub struct CustomerService {
    store: SharedStore,
}

impl CustomerService {
    /// Create a new customer service over the shared store gateway.
    #[must_use]
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// List all customers, newest first. A flat listing with zero nesting;
    /// order history is only fetched by [`Self::get_by_id`].
    pub async fn list(&self) -> Envelope<Vec<Customer>> {
        self.list_inner().await.into_envelope()
    }

    /// Fetch one customer with their full order history: orders newest
    /// first, each with its line items and product names resolved.
    pub async fn get_by_id(&self, id: CustomerId) -> Envelope<CustomerWithOrders> {
        self.get_by_id_inner(id).await.into_envelope()
    }

    /// Case-insensitive substring search over first name, last name, and
    /// email. A blank term is a validation error, not an empty result.
    pub async fn search(&self, term: &str) -> Envelope<Vec<Customer>> {
        self.search_inner(term).await.into_envelope()
    }

    /// Aggregate counts for the dashboard. Two sequential counts; if
    /// either fails the whole aggregate fails, never a partial answer.
    pub async fn stats(&self) -> Envelope<CustomerStats> {
        self.stats_inner().await.into_envelope()
    }

    async fn list_inner(&self) -> Result<Vec<Customer>, ServiceError> {
        let rows = self
            .store
            .select(
                Table::Customers,
                &Filter::All,
                Some(Ordering::desc("created_at")),
            )
            .await?;
        decode_all(rows)
    }

    async fn get_by_id_inner(&self, id: CustomerId) -> Result<CustomerWithOrders, ServiceError> {
        let row = self
            .store
            .select_one(
                Table::Customers,
                &Filter::Eq("id", ScalarValue::Uuid(id.as_uuid())),
            )
            .await?
            .ok_or_else(|| ServiceError::NotFound("customer not found".to_owned()))?;
        let customer: Customer = decode(row)?;

        let order_rows = self
            .store
            .select(
                Table::Orders,
                &Filter::Eq("customer_id", ScalarValue::Uuid(id.as_uuid())),
                Some(Ordering::desc("created_at")),
            )
            .await?;
        let orders: Vec<Order> = decode_all(order_rows)?;

        let items_by_order = self.items_for_orders(&orders).await?;

        let orders = orders
            .into_iter()
            .map(|order| {
                let items = items_by_order.get(&order.id).cloned().unwrap_or_default();
                OrderWithItems {
                    total: order.total(),
                    order,
                    items,
                }
            })
            .collect();

        Ok(CustomerWithOrders { customer, orders })
    }

    /// Resolve line items and product names for a set of orders: one select
    /// for all items, one for all referenced products.
    async fn items_for_orders(
        &self,
        orders: &[Order],
    ) -> Result<HashMap<voltlane_core::OrderId, Vec<OrderItemDetail>>, ServiceError> {
        if orders.is_empty() {
            return Ok(HashMap::new());
        }

        let item_filter = Filter::Or(
            orders
                .iter()
                .map(|o| Filter::Eq("order_id", ScalarValue::Uuid(o.id.as_uuid())))
                .collect(),
        );
        let item_rows = self
            .store
            .select(Table::OrderItems, &item_filter, None)
            .await?;
        let items: Vec<OrderItem> = decode_all(item_rows)?;

        let mut product_ids: Vec<_> = items.iter().map(|i| i.product_id).collect();
        product_ids.sort_unstable_by_key(|p| p.as_uuid());
        product_ids.dedup();

        let mut product_names = HashMap::new();
        if !product_ids.is_empty() {
            let product_filter = Filter::Or(
                product_ids
                    .iter()
                    .map(|p| Filter::Eq("id", ScalarValue::Uuid(p.as_uuid())))
                    .collect(),
            );
            let product_rows = self
                .store
                .select(Table::Products, &product_filter, None)
                .await?;
            let products: Vec<Product> = decode_all(product_rows)?;
            product_names = products.into_iter().map(|p| (p.id, p.name)).collect();
        }

        let mut by_order: HashMap<voltlane_core::OrderId, Vec<OrderItemDetail>> = HashMap::new();
        for item in items {
            let product_name = product_names
                .get(&item.product_id)
                .cloned()
                .unwrap_or_else(|| "unknown product".to_owned());
            by_order.entry(item.order_id).or_default().push(OrderItemDetail {
                id: item.id,
                product_name,
                unit_price: item.unit_price,
                quantity: item.quantity,
            });
        }
        Ok(by_order)
    }

    async fn search_inner(&self, term: &str) -> Result<Vec<Customer>, ServiceError> {
        let term = term.trim();
        if term.is_empty() {
            return Err(ServiceError::Validation(
                "search term is required".to_owned(),
            ));
        }

        let filter = Filter::Or(vec![
            Filter::Contains("first_name", term.to_owned()),
            Filter::Contains("last_name", term.to_owned()),
            Filter::Contains("email", term.to_owned()),
        ]);
        let rows = self
            .store
            .select(Table::Customers, &filter, Some(Ordering::desc("created_at")))
            .await?;
        decode_all(rows)
    }

    async fn stats_inner(&self) -> Result<CustomerStats, ServiceError> {
        let total = self.store.count(Table::Customers, &Filter::All).await?;
        let cutoff = Utc::now() - Duration::days(30);
        let new_last_30_days = self
            .store
            .count(Table::Customers, &Filter::After("created_at", cutoff))
            .await?;
        Ok(CustomerStats {
            total,
            new_last_30_days,
        })
    }
}
