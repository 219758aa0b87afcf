//! Catalog component (attribute) domain types.

use serde::{Deserialize, Serialize};

use voltlane_core::ComponentId;

/// A catalog attribute such as a CPU or GPU entry.
///
/// Categories are a free-form classification tag; the set of categories is
/// derived at read time from the distinct active rows, never pre-declared.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
    pub id: ComponentId,
    pub category: String,
    pub name: String,
    pub active: bool,
}

/// Input for creating a component.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewComponent {
    pub category: String,
    pub name: String,
}

/// Partial update for a component - only supplied fields change.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComponentPatch {
    pub category: Option<String>,
    pub name: Option<String>,
}

impl ComponentPatch {
    /// Whether the patch carries no fields at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.category.is_none() && self.name.is_none()
    }
}
