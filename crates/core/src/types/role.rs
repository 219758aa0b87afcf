//! Caller roles for write authorization.

use serde::{Deserialize, Serialize};

/// Role of the caller on whose behalf a service operation executes.
///
/// Resolved from the profile store by the authorization check; the service
/// layer never trusts a role supplied directly by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full access to all dashboard features.
    Admin,
    /// Full access to catalog management.
    Manager,
    /// Read-only access to store data.
    Staff,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Manager => write!(f, "manager"),
            Self::Staff => write!(f, "staff"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "manager" => Ok(Self::Manager),
            "staff" => Ok(Self::Staff),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_role_round_trip() {
        for role in [Role::Admin, Role::Manager, Role::Staff] {
            let parsed = Role::from_str(&role.to_string()).expect("parse");
            assert_eq!(parsed, role);
        }
    }

    #[test]
    fn test_role_rejects_unknown() {
        assert!(Role::from_str("superuser").is_err());
    }

    #[test]
    fn test_role_serde_snake_case() {
        let json = serde_json::to_string(&Role::Manager).expect("serialize");
        assert_eq!(json, "\"manager\"");
    }
}
