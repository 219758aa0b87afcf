//! Domain types decoded from store gateway rows.
//!
//! Rows arrive as JSON objects; each model deserializes with serde. A row
//! that does not fit its model is a data defect in the store and surfaces
//! as a `StoreFailure`, never a panic.

pub mod brand;
pub mod component;
pub mod customer;
pub mod discount;
pub mod profile;

use serde::de::DeserializeOwned;

pub use brand::{Brand, BrandPatch, NewBrand};
pub use component::{Component, ComponentPatch, NewComponent};
pub use customer::{
    Customer, CustomerStats, CustomerWithOrders, Order, OrderItem, OrderItemDetail,
    OrderWithItems, Product,
};
pub use discount::{Discount, DiscountPatch, NewDiscount};
pub use profile::Profile;

use crate::error::ServiceError;
use crate::store::Row;

/// Decode a gateway row into a domain type.
pub(crate) fn decode<T: DeserializeOwned>(row: Row) -> Result<T, ServiceError> {
    serde_json::from_value(row).map_err(|e| ServiceError::Store(format!("malformed row: {e}")))
}

/// Decode a batch of gateway rows.
pub(crate) fn decode_all<T: DeserializeOwned>(rows: Vec<Row>) -> Result<Vec<T>, ServiceError> {
    rows.into_iter().map(decode).collect()
}
