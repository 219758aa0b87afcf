//! Customer, order, and product domain types.
//!
//! Customers are read-only from this layer's perspective: the storefront
//! owns their creation, the dashboard only views them. Nested reads are
//! explicit composed fetches with a declared depth - see
//! [`CustomerService`](crate::services::CustomerService).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use voltlane_core::{
    CurrencyCode, CustomerId, Email, OrderId, OrderItemId, Price, ProductId,
};

/// A storefront customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An order owned by a customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub customer_id: CustomerId,
    pub total_amount: Decimal,
    #[serde(default)]
    pub currency: CurrencyCode,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// The order total as a typed price.
    #[must_use]
    pub const fn total(&self) -> Price {
        Price::new(self.total_amount, self.currency)
    }
}

/// A line item within an order, holding a price/quantity snapshot taken at
/// purchase time and a reference to the product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub unit_price: Decimal,
    pub quantity: i32,
}

/// A catalog product, referenced by order items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
}

/// A line item joined with its product name for display.
#[derive(Debug, Clone, Serialize)]
pub struct OrderItemDetail {
    pub id: OrderItemId,
    pub product_name: String,
    pub unit_price: Decimal,
    pub quantity: i32,
}

/// An order with its line items resolved and its total as a typed price.
#[derive(Debug, Clone, Serialize)]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub total: Price,
    pub items: Vec<OrderItemDetail>,
}

/// A customer with their full order history, the shape returned by
/// single-customer lookups.
#[derive(Debug, Clone, Serialize)]
pub struct CustomerWithOrders {
    #[serde(flatten)]
    pub customer: Customer,
    pub orders: Vec<OrderWithItems>,
}

/// Aggregate customer statistics.
///
/// Computed from two independent counts; a failure in either fails the
/// whole aggregate - no partial statistics are ever returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CustomerStats {
    /// All customers on record.
    pub total: i64,
    /// Customers created within the trailing 30 days.
    pub new_last_30_days: i64,
}
