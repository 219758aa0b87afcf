//! Discount code management.

use rust_decimal::Decimal;
use serde_json::json;

use voltlane_core::{DiscountId, Envelope};

use crate::error::{IntoEnvelope, ServiceError};
use crate::models::{Discount, DiscountPatch, NewDiscount, decode, decode_all};
use crate::services::auth::{CATALOG_WRITERS, authorize};
use crate::services::{RequestContext, SharedStore, normalize_optional, normalize_required};
use crate::store::{Filter, Ordering, Record, StoreError, StoreErrorKind, Table};

/// Service for discount codes.
///
/// Codes are normalized to uppercase before storage so "summer10" and
/// "SUMMER10" are the same code; uniqueness is enforced by the store and
/// surfaced as a conflict.
pub struct DiscountService {
    store: SharedStore,
}

impl DiscountService {
    /// Create a new discount service over the shared store gateway.
    #[must_use]
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// List active discounts, alphabetical by code.
    pub async fn list_active(&self) -> Envelope<Vec<Discount>> {
        self.list_active_inner().await.into_envelope()
    }

    /// Fetch a single active discount.
    pub async fn get_by_id(&self, id: DiscountId) -> Envelope<Discount> {
        self.get_by_id_inner(id).await.into_envelope()
    }

    /// Case-insensitive substring search over code and description.
    pub async fn search(&self, term: &str) -> Envelope<Vec<Discount>> {
        self.search_inner(term).await.into_envelope()
    }

    /// Create a discount. Requires the admin or manager role.
    pub async fn create(&self, ctx: &RequestContext, input: NewDiscount) -> Envelope<Discount> {
        self.create_inner(ctx, input).await.into_envelope()
    }

    /// Apply a partial update. Only supplied fields change.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: DiscountId,
        patch: DiscountPatch,
    ) -> Envelope<Discount> {
        self.update_inner(ctx, id, patch).await.into_envelope()
    }

    /// Soft-delete a discount by clearing its active flag. The code stays
    /// reserved; reactivation is an update, not a re-create.
    pub async fn soft_delete(&self, ctx: &RequestContext, id: DiscountId) -> Envelope<Discount> {
        self.soft_delete_inner(ctx, id).await.into_envelope()
    }

    async fn list_active_inner(&self) -> Result<Vec<Discount>, ServiceError> {
        let rows = self
            .store
            .select(
                Table::Discounts,
                &Filter::active(),
                Some(Ordering::asc("code")),
            )
            .await?;
        decode_all(rows)
    }

    async fn get_by_id_inner(&self, id: DiscountId) -> Result<Discount, ServiceError> {
        let row = self
            .store
            .select_one(Table::Discounts, &Filter::active_by_id(id.as_uuid()))
            .await?
            .ok_or_else(|| ServiceError::NotFound("discount not found".to_owned()))?;
        decode(row)
    }

    async fn search_inner(&self, term: &str) -> Result<Vec<Discount>, ServiceError> {
        let term = term.trim();
        if term.is_empty() {
            return Err(ServiceError::Validation(
                "search term is required".to_owned(),
            ));
        }

        let filter = Filter::And(vec![
            Filter::active(),
            Filter::Or(vec![
                Filter::Contains("code", term.to_owned()),
                Filter::Contains("description", term.to_owned()),
            ]),
        ]);
        let rows = self
            .store
            .select(Table::Discounts, &filter, Some(Ordering::desc("created_at")))
            .await?;
        decode_all(rows)
    }

    async fn create_inner(
        &self,
        ctx: &RequestContext,
        input: NewDiscount,
    ) -> Result<Discount, ServiceError> {
        authorize(self.store.as_ref(), ctx, CATALOG_WRITERS).await?;

        let code = normalize_required(&input.code, "code")?.to_uppercase();
        validate_percent(input.percent_off)?;
        validate_window(input.starts_at, input.ends_at)?;

        let mut record = Record::new();
        record.insert("code".to_owned(), json!(code));
        record.insert(
            "description".to_owned(),
            json!(normalize_optional(input.description)),
        );
        record.insert("percent_off".to_owned(), json!(input.percent_off));
        record.insert("starts_at".to_owned(), json!(input.starts_at));
        record.insert("ends_at".to_owned(), json!(input.ends_at));
        record.insert("active".to_owned(), json!(true));

        let row = self
            .store
            .insert(Table::Discounts, record)
            .await
            .map_err(|e| Self::describe_write_error(e, &code))?;
        let discount: Discount = decode(row)?;
        tracing::info!(discount_id = %discount.id, code = %discount.code, "created discount");
        Ok(discount)
    }

    async fn update_inner(
        &self,
        ctx: &RequestContext,
        id: DiscountId,
        patch: DiscountPatch,
    ) -> Result<Discount, ServiceError> {
        authorize(self.store.as_ref(), ctx, CATALOG_WRITERS).await?;

        if patch.is_empty() {
            return Err(ServiceError::Validation("nothing to update".to_owned()));
        }

        // The window invariant holds over the merged row, so a patch that
        // moves one bound is checked against the stored other bound.
        if patch.starts_at.is_some() || patch.ends_at.is_some() {
            let current = self.get_by_id_inner(id).await?;
            validate_window(
                patch.starts_at.or(current.starts_at),
                patch.ends_at.or(current.ends_at),
            )?;
        }

        let mut record = Record::new();
        let mut code_for_error = String::new();
        if let Some(code) = patch.code {
            let code = normalize_required(&code, "code")?.to_uppercase();
            record.insert("code".to_owned(), json!(code));
            code_for_error = code;
        }
        if let Some(description) = patch.description {
            record.insert(
                "description".to_owned(),
                json!(normalize_optional(Some(description))),
            );
        }
        if let Some(percent_off) = patch.percent_off {
            validate_percent(percent_off)?;
            record.insert("percent_off".to_owned(), json!(percent_off));
        }
        if let Some(starts_at) = patch.starts_at {
            record.insert("starts_at".to_owned(), json!(starts_at));
        }
        if let Some(ends_at) = patch.ends_at {
            record.insert("ends_at".to_owned(), json!(ends_at));
        }

        let row = self
            .store
            .update(Table::Discounts, &Filter::active_by_id(id.as_uuid()), record)
            .await
            .map_err(|e| match e.kind {
                StoreErrorKind::NotFound => {
                    ServiceError::NotFound("discount not found".to_owned())
                }
                _ => Self::describe_write_error(e, &code_for_error),
            })?;
        let discount: Discount = decode(row)?;
        tracing::info!(discount_id = %discount.id, "updated discount");
        Ok(discount)
    }

    async fn soft_delete_inner(
        &self,
        ctx: &RequestContext,
        id: DiscountId,
    ) -> Result<Discount, ServiceError> {
        authorize(self.store.as_ref(), ctx, CATALOG_WRITERS).await?;

        let mut record = Record::new();
        record.insert("active".to_owned(), json!(false));

        let row = self
            .store
            .update(Table::Discounts, &Filter::active_by_id(id.as_uuid()), record)
            .await
            .map_err(|e| match e.kind {
                StoreErrorKind::NotFound => {
                    ServiceError::NotFound("discount not found".to_owned())
                }
                _ => ServiceError::from(e),
            })?;
        let discount: Discount = decode(row)?;
        tracing::info!(discount_id = %discount.id, "soft-deleted discount");
        Ok(discount)
    }

    fn describe_write_error(err: StoreError, code: &str) -> ServiceError {
        match err.kind {
            StoreErrorKind::Conflict => ServiceError::Conflict(format!(
                "a discount with code \"{code}\" already exists"
            )),
            StoreErrorKind::PermissionDenied => ServiceError::Denied(
                "the store's security policy rejected this discount write".to_owned(),
            ),
            _ => ServiceError::from(err),
        }
    }
}

/// A percentage must be in (0, 100].
fn validate_percent(percent_off: Decimal) -> Result<(), ServiceError> {
    if percent_off <= Decimal::ZERO || percent_off > Decimal::ONE_HUNDRED {
        return Err(ServiceError::Validation(
            "percent_off must be greater than 0 and at most 100".to_owned(),
        ));
    }
    Ok(())
}

/// When both window bounds are present, the window must not be inverted.
fn validate_window(
    starts_at: Option<chrono::DateTime<chrono::Utc>>,
    ends_at: Option<chrono::DateTime<chrono::Utc>>,
) -> Result<(), ServiceError> {
    if let (Some(starts_at), Some(ends_at)) = (starts_at, ends_at)
        && ends_at <= starts_at
    {
        return Err(ServiceError::Validation(
            "ends_at must be after starts_at".to_owned(),
        ));
    }
    Ok(())
}
