//! Shared type definitions.

pub mod email;
pub mod envelope;
pub mod id;
pub mod price;
pub mod role;

pub use email::{Email, EmailError};
pub use envelope::{Envelope, ErrorInfo, ErrorKind};
pub use id::{
    BrandId, ComponentId, CustomerId, DiscountId, OrderId, OrderItemId, ProductId, ProfileId,
};
pub use price::{CurrencyCode, Price};
pub use role::Role;
