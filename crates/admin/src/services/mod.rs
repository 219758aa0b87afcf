//! Entity services - the public surface of this crate.
//!
//! One service per entity family (brands, components, customers,
//! discounts), each composing the store gateway, the authorization check,
//! and the slug deriver. Every operation is stateless, independently
//! invocable, and returns an [`Envelope`](voltlane_core::Envelope).
//!
//! Session state is never ambient: the caller identity travels in an
//! explicit [`RequestContext`] passed into each call, which keeps the
//! services deterministic under test with fake identities and stores.

pub mod auth;
pub mod brands;
pub mod components;
pub mod customers;
pub mod discounts;

use std::sync::Arc;

pub use brands::BrandService;
pub use components::ComponentService;
pub use customers::CustomerService;
pub use discounts::DiscountService;

use voltlane_core::ProfileId;

use crate::error::ServiceError;
use crate::store::StoreGateway;

/// A process-wide handle to the store gateway shared by all services.
pub type SharedStore = Arc<dyn StoreGateway>;

/// The resolved actor on whose behalf an operation executes.
///
/// Supplied by the external authentication collaborator; this layer never
/// resolves sessions itself. The role is NOT carried here - it is looked
/// up from the profile store during authorization so the UI cannot forge
/// it.
#[derive(Debug, Clone, Copy)]
pub struct CallerIdentity {
    /// Profile row backing this caller.
    pub profile_id: ProfileId,
}

impl CallerIdentity {
    /// Create an identity for the given profile.
    #[must_use]
    pub const fn new(profile_id: ProfileId) -> Self {
        Self { profile_id }
    }
}

/// Per-call context passed explicitly into every service operation.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    caller: Option<CallerIdentity>,
}

impl RequestContext {
    /// A context with no caller - read paths work, mutations fail with
    /// `Unauthenticated`.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self { caller: None }
    }

    /// A context acting on behalf of the given caller.
    #[must_use]
    pub const fn for_caller(caller: CallerIdentity) -> Self {
        Self {
            caller: Some(caller),
        }
    }

    /// The caller, if any.
    #[must_use]
    pub const fn caller(&self) -> Option<&CallerIdentity> {
        self.caller.as_ref()
    }
}

// =============================================================================
// Input normalization
// =============================================================================

/// Trim a required text field; empty after trimming is a validation error.
pub(crate) fn normalize_required(value: &str, field: &str) -> Result<String, ServiceError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_owned())
}

/// Trim an optional text field; empty after trimming becomes `None`.
pub(crate) fn normalize_optional(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_owned())
        }
    })
}
