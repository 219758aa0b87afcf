//! Brand management.

use serde_json::json;

use voltlane_core::{BrandId, Envelope, slug::derive_slug};

use crate::error::{IntoEnvelope, ServiceError};
use crate::models::{Brand, BrandPatch, NewBrand, decode, decode_all};
use crate::services::{RequestContext, SharedStore, normalize_optional, normalize_required};
use crate::services::auth::{CATALOG_WRITERS, authorize};
use crate::store::{Filter, Ordering, Record, StoreError, StoreErrorKind, Table};

/// Service for the brand entity family.
///
/// Mutations are gated on the admin/manager roles; deletion is always
/// logical (the active flag), never physical.
pub struct BrandService {
    store: SharedStore,
}

impl BrandService {
    /// Create a new brand service over the shared store gateway.
    #[must_use]
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// List all active brands, alphabetical by name.
    pub async fn list_active(&self) -> Envelope<Vec<Brand>> {
        self.list_active_inner().await.into_envelope()
    }

    /// Fetch a single active brand. Soft-deleted brands are invisible
    /// here, matching list visibility.
    pub async fn get_by_id(&self, id: BrandId) -> Envelope<Brand> {
        self.get_by_id_inner(id).await.into_envelope()
    }

    /// Create a brand. Requires the admin or manager role; the slug is
    /// derived from the name.
    pub async fn create(&self, ctx: &RequestContext, input: NewBrand) -> Envelope<Brand> {
        self.create_inner(ctx, input).await.into_envelope()
    }

    /// Apply a partial update. Only supplied fields change; the slug is
    /// re-derived when (and only when) the patch carries a name.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: BrandId,
        patch: BrandPatch,
    ) -> Envelope<Brand> {
        self.update_inner(ctx, id, patch).await.into_envelope()
    }

    /// Soft-delete a brand by clearing its active flag. The record keeps
    /// existing physically but disappears from every default read path.
    pub async fn soft_delete(&self, ctx: &RequestContext, id: BrandId) -> Envelope<Brand> {
        self.soft_delete_inner(ctx, id).await.into_envelope()
    }

    async fn list_active_inner(&self) -> Result<Vec<Brand>, ServiceError> {
        let rows = self
            .store
            .select(Table::Brands, &Filter::active(), Some(Ordering::asc("name")))
            .await?;
        decode_all(rows)
    }

    async fn get_by_id_inner(&self, id: BrandId) -> Result<Brand, ServiceError> {
        let row = self
            .store
            .select_one(Table::Brands, &Filter::active_by_id(id.as_uuid()))
            .await?
            .ok_or_else(|| ServiceError::NotFound("brand not found".to_owned()))?;
        decode(row)
    }

    async fn create_inner(
        &self,
        ctx: &RequestContext,
        input: NewBrand,
    ) -> Result<Brand, ServiceError> {
        authorize(self.store.as_ref(), ctx, CATALOG_WRITERS).await?;

        let name = normalize_required(&input.name, "name")?;
        let slug = derive_slug(&name);
        if slug.is_empty() {
            return Err(ServiceError::Validation(
                "name must contain at least one letter or digit".to_owned(),
            ));
        }

        let mut record = Record::new();
        record.insert("name".to_owned(), json!(name));
        record.insert("slug".to_owned(), json!(slug));
        record.insert("description".to_owned(), json!(normalize_optional(input.description)));
        record.insert("logo_url".to_owned(), json!(normalize_optional(input.logo_url)));
        record.insert(
            "website_url".to_owned(),
            json!(normalize_optional(input.website_url)),
        );
        record.insert("active".to_owned(), json!(true));

        let row = self
            .store
            .insert(Table::Brands, record)
            .await
            .map_err(|e| Self::describe_write_error(e, &slug))?;
        let brand: Brand = decode(row)?;
        tracing::info!(brand_id = %brand.id, slug = %brand.slug, "created brand");
        Ok(brand)
    }

    async fn update_inner(
        &self,
        ctx: &RequestContext,
        id: BrandId,
        patch: BrandPatch,
    ) -> Result<Brand, ServiceError> {
        authorize(self.store.as_ref(), ctx, CATALOG_WRITERS).await?;

        if patch.is_empty() {
            return Err(ServiceError::Validation("nothing to update".to_owned()));
        }

        let mut record = Record::new();
        let mut slug_for_error = String::new();
        if let Some(name) = patch.name {
            let name = normalize_required(&name, "name")?;
            let slug = derive_slug(&name);
            if slug.is_empty() {
                return Err(ServiceError::Validation(
                    "name must contain at least one letter or digit".to_owned(),
                ));
            }
            record.insert("name".to_owned(), json!(name));
            record.insert("slug".to_owned(), json!(slug));
            slug_for_error = slug;
        }
        if let Some(description) = patch.description {
            record.insert(
                "description".to_owned(),
                json!(normalize_optional(Some(description))),
            );
        }
        if let Some(logo_url) = patch.logo_url {
            record.insert("logo_url".to_owned(), json!(normalize_optional(Some(logo_url))));
        }
        if let Some(website_url) = patch.website_url {
            record.insert(
                "website_url".to_owned(),
                json!(normalize_optional(Some(website_url))),
            );
        }

        let row = self
            .store
            .update(Table::Brands, &Filter::active_by_id(id.as_uuid()), record)
            .await
            .map_err(|e| match e.kind {
                StoreErrorKind::NotFound => {
                    ServiceError::NotFound("brand not found".to_owned())
                }
                _ => Self::describe_write_error(e, &slug_for_error),
            })?;
        let brand: Brand = decode(row)?;
        tracing::info!(brand_id = %brand.id, "updated brand");
        Ok(brand)
    }

    async fn soft_delete_inner(
        &self,
        ctx: &RequestContext,
        id: BrandId,
    ) -> Result<Brand, ServiceError> {
        authorize(self.store.as_ref(), ctx, CATALOG_WRITERS).await?;

        let mut record = Record::new();
        record.insert("active".to_owned(), json!(false));

        let row = self
            .store
            .update(Table::Brands, &Filter::active_by_id(id.as_uuid()), record)
            .await
            .map_err(|e| match e.kind {
                StoreErrorKind::NotFound => {
                    ServiceError::NotFound("brand not found".to_owned())
                }
                _ => ServiceError::from(e),
            })?;
        let brand: Brand = decode(row)?;
        tracing::info!(brand_id = %brand.id, "soft-deleted brand");
        Ok(brand)
    }

    /// Translate a write failure into a descriptive service error instead
    /// of passing the store's message through unexamined.
    fn describe_write_error(err: StoreError, slug: &str) -> ServiceError {
        match err.kind {
            StoreErrorKind::Conflict => ServiceError::Conflict(format!(
                "a brand with slug \"{slug}\" already exists"
            )),
            StoreErrorKind::PermissionDenied => ServiceError::Denied(
                "the store's security policy rejected this brand write".to_owned(),
            ),
            _ => ServiceError::from(err),
        }
    }
}
