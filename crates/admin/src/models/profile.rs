//! Caller profile, resolved during the authorization check.

use serde::{Deserialize, Serialize};

use voltlane_core::{Email, ProfileId, Role};

/// The stored profile backing a caller identity.
///
/// Supplied by the external authentication collaborator at sign-in; this
/// layer only reads it to resolve the caller's role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    pub email: Option<Email>,
    pub role: Role,
}
