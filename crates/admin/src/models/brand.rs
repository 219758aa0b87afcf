//! Brand domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use voltlane_core::BrandId;

/// A hardware brand carried in the catalog.
///
/// The slug is a deterministic function of the name; soft-deleted brands
/// (`active = false`) are invisible to every default read path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brand {
    pub id: BrandId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub website_url: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a brand. The slug is derived, never supplied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewBrand {
    pub name: String,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub website_url: Option<String>,
}

/// Partial update for a brand - only supplied fields change.
///
/// Setting an optional field to an empty string clears it in the store.
/// The slug is re-derived when (and only when) `name` is present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BrandPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub website_url: Option<String>,
}

impl BrandPatch {
    /// Whether the patch carries no fields at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.logo_url.is_none()
            && self.website_url.is_none()
    }
}
