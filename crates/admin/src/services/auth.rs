//! Write authorization.
//!
//! Runs synchronously before any mutating store call - nothing is written
//! until the check succeeds, so no compensating rollback is ever needed.
//!
//! The resolution algorithm distinguishes three failures the UI treats
//! differently: `Unauthenticated` (no session), `AuthorizationLookupFailed`
//! (infrastructure - retryable), and `Denied` (policy - hard stop).

use voltlane_core::Role;

use crate::error::ServiceError;
use crate::models::{Profile, decode};
use crate::services::RequestContext;
use crate::store::{Filter, ScalarValue, StoreGateway, Table};

/// Roles allowed to mutate catalog entities (brands, components,
/// discounts).
pub const CATALOG_WRITERS: &[Role] = &[Role::Admin, Role::Manager];

/// Resolve the caller's role and check it against `required`.
///
/// # Errors
///
/// - `Unauthenticated` when the context carries no caller.
/// - `AuthorizationLookupFailed` when the one-shot profile read fails -
///   an infrastructure error, distinct from a policy decision.
/// - `Denied` when the caller has no profile row or a role outside
///   `required`.
pub async fn authorize(
    store: &dyn StoreGateway,
    ctx: &RequestContext,
    required: &[Role],
) -> Result<Role, ServiceError> {
    let caller = ctx.caller().ok_or(ServiceError::Unauthenticated)?;

    let row = store
        .select_one(
            Table::Profiles,
            &Filter::Eq("id", ScalarValue::Uuid(caller.profile_id.as_uuid())),
        )
        .await
        .map_err(|e| ServiceError::AuthorizationLookupFailed(e.to_string()))?;

    let Some(row) = row else {
        return Err(ServiceError::Denied(
            "no role is assigned to this account".to_owned(),
        ));
    };
    let profile: Profile =
        decode(row).map_err(|e| ServiceError::AuthorizationLookupFailed(e.to_string()))?;

    if required.contains(&profile.role) {
        Ok(profile.role)
    } else {
        let allowed = required
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" or ");
        tracing::warn!(
            profile_id = %caller.profile_id,
            role = %profile.role,
            "write denied by role policy"
        );
        Err(ServiceError::Denied(format!(
            "this action requires the {allowed} role"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::CallerIdentity;
    use crate::store::{MemoryStore, Record, StoreErrorKind};
    use serde_json::json;
    use uuid::Uuid;
    use voltlane_core::ProfileId;

    async fn store_with_profile(role: &str) -> (MemoryStore, RequestContext) {
        let store = MemoryStore::new();
        let id = Uuid::new_v4();
        let mut record = Record::new();
        record.insert("id".to_owned(), json!(id.to_string()));
        record.insert("email".to_owned(), json!("someone@voltlane.dev"));
        record.insert("role".to_owned(), json!(role));
        store
            .insert(Table::Profiles, record)
            .await
            .expect("seed profile");
        let ctx = RequestContext::for_caller(CallerIdentity::new(ProfileId::new(id)));
        (store, ctx)
    }

    #[tokio::test]
    async fn test_no_caller_is_unauthenticated() {
        let store = MemoryStore::new();
        let err = authorize(&store, &RequestContext::anonymous(), CATALOG_WRITERS)
            .await
            .expect_err("anonymous");
        assert!(matches!(err, ServiceError::Unauthenticated));
    }

    #[tokio::test]
    async fn test_manager_is_allowed() {
        let (store, ctx) = store_with_profile("manager").await;
        let role = authorize(&store, &ctx, CATALOG_WRITERS)
            .await
            .expect("manager allowed");
        assert_eq!(role, Role::Manager);
    }

    #[tokio::test]
    async fn test_staff_is_denied() {
        let (store, ctx) = store_with_profile("staff").await;
        let err = authorize(&store, &ctx, CATALOG_WRITERS)
            .await
            .expect_err("staff denied");
        assert!(matches!(err, ServiceError::Denied(_)));
        assert_eq!(err.to_string(), "this action requires the admin or manager role");
    }

    #[tokio::test]
    async fn test_missing_profile_is_denied() {
        let store = MemoryStore::new();
        let ctx =
            RequestContext::for_caller(CallerIdentity::new(ProfileId::new(Uuid::new_v4())));
        let err = authorize(&store, &ctx, CATALOG_WRITERS)
            .await
            .expect_err("no profile row");
        assert!(matches!(err, ServiceError::Denied(_)));
    }

    #[tokio::test]
    async fn test_lookup_failure_is_not_a_denial() {
        let (store, ctx) = store_with_profile("manager").await;
        store.fail_next(StoreErrorKind::Transport).await;
        let err = authorize(&store, &ctx, CATALOG_WRITERS)
            .await
            .expect_err("lookup failed");
        assert!(matches!(err, ServiceError::AuthorizationLookupFailed(_)));
    }
}
