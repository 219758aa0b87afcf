//! Discount/promotion domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use voltlane_core::DiscountId;

/// A discount code.
///
/// Codes are stored uppercase and unique; soft-deleted discounts
/// (`active = false`) are invisible to default reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Discount {
    pub id: DiscountId,
    pub code: String,
    pub description: Option<String>,
    pub percent_off: Decimal,
    pub active: bool,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a discount.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewDiscount {
    pub code: String,
    pub description: Option<String>,
    pub percent_off: Decimal,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
}

/// Partial update for a discount - only supplied fields change.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiscountPatch {
    pub code: Option<String>,
    pub description: Option<String>,
    pub percent_off: Option<Decimal>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
}

impl DiscountPatch {
    /// Whether the patch carries no fields at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.code.is_none()
            && self.description.is_none()
            && self.percent_off.is_none()
            && self.starts_at.is_none()
            && self.ends_at.is_none()
    }
}
