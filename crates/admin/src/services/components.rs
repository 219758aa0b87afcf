//! Catalog component management.

use std::collections::BTreeSet;

use serde_json::json;

use voltlane_core::{ComponentId, Envelope};

use crate::error::{IntoEnvelope, ServiceError};
use crate::models::{Component, ComponentPatch, NewComponent, decode, decode_all};
use crate::services::auth::{CATALOG_WRITERS, authorize};
use crate::services::{RequestContext, SharedStore, normalize_required};
use crate::store::{Filter, Ordering, Record, ScalarValue, StoreErrorKind, Table};

/// Service for catalog components (CPUs, GPUs, and the like).
///
/// Categories are free-form tags; the category vocabulary is whatever the
/// distinct active rows say it is.
pub struct ComponentService {
    store: SharedStore,
}

impl ComponentService {
    /// Create a new component service over the shared store gateway.
    #[must_use]
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// List active components, optionally restricted to one category,
    /// alphabetical by name.
    pub async fn list_active(&self, category: Option<&str>) -> Envelope<Vec<Component>> {
        self.list_active_inner(category).await.into_envelope()
    }

    /// The distinct categories present among active components, sorted.
    /// An empty catalog yields an empty list, which is a success.
    pub async fn categories(&self) -> Envelope<Vec<String>> {
        self.categories_inner().await.into_envelope()
    }

    /// Fetch a single active component.
    pub async fn get_by_id(&self, id: ComponentId) -> Envelope<Component> {
        self.get_by_id_inner(id).await.into_envelope()
    }

    /// Create a component. Requires the admin or manager role.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        input: NewComponent,
    ) -> Envelope<Component> {
        self.create_inner(ctx, input).await.into_envelope()
    }

    /// Apply a partial update. Only supplied fields change.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: ComponentId,
        patch: ComponentPatch,
    ) -> Envelope<Component> {
        self.update_inner(ctx, id, patch).await.into_envelope()
    }

    /// Soft-delete a component by clearing its active flag.
    pub async fn soft_delete(&self, ctx: &RequestContext, id: ComponentId) -> Envelope<Component> {
        self.soft_delete_inner(ctx, id).await.into_envelope()
    }

    async fn list_active_inner(
        &self,
        category: Option<&str>,
    ) -> Result<Vec<Component>, ServiceError> {
        let filter = match category {
            Some(category) => Filter::And(vec![
                Filter::active(),
                Filter::Eq("category", ScalarValue::Text(category.trim().to_owned())),
            ]),
            None => Filter::active(),
        };
        let rows = self
            .store
            .select(Table::Components, &filter, Some(Ordering::asc("name")))
            .await?;
        decode_all(rows)
    }

    async fn categories_inner(&self) -> Result<Vec<String>, ServiceError> {
        let rows = self
            .store
            .select(Table::Components, &Filter::active(), None)
            .await?;
        let components: Vec<Component> = decode_all(rows)?;
        let distinct: BTreeSet<String> =
            components.into_iter().map(|c| c.category).collect();
        Ok(distinct.into_iter().collect())
    }

    async fn get_by_id_inner(&self, id: ComponentId) -> Result<Component, ServiceError> {
        let row = self
            .store
            .select_one(Table::Components, &Filter::active_by_id(id.as_uuid()))
            .await?
            .ok_or_else(|| ServiceError::NotFound("component not found".to_owned()))?;
        decode(row)
    }

    async fn create_inner(
        &self,
        ctx: &RequestContext,
        input: NewComponent,
    ) -> Result<Component, ServiceError> {
        authorize(self.store.as_ref(), ctx, CATALOG_WRITERS).await?;

        let category = normalize_required(&input.category, "category")?;
        let name = normalize_required(&input.name, "name")?;

        let mut record = Record::new();
        record.insert("category".to_owned(), json!(category));
        record.insert("name".to_owned(), json!(name));
        record.insert("active".to_owned(), json!(true));

        let row = self.store.insert(Table::Components, record).await?;
        let component: Component = decode(row)?;
        tracing::info!(
            component_id = %component.id,
            category = %component.category,
            "created component"
        );
        Ok(component)
    }

    async fn update_inner(
        &self,
        ctx: &RequestContext,
        id: ComponentId,
        patch: ComponentPatch,
    ) -> Result<Component, ServiceError> {
        authorize(self.store.as_ref(), ctx, CATALOG_WRITERS).await?;

        if patch.is_empty() {
            return Err(ServiceError::Validation("nothing to update".to_owned()));
        }

        let mut record = Record::new();
        if let Some(category) = patch.category {
            record.insert(
                "category".to_owned(),
                json!(normalize_required(&category, "category")?),
            );
        }
        if let Some(name) = patch.name {
            record.insert("name".to_owned(), json!(normalize_required(&name, "name")?));
        }

        let row = self
            .store
            .update(Table::Components, &Filter::active_by_id(id.as_uuid()), record)
            .await
            .map_err(|e| match e.kind {
                StoreErrorKind::NotFound => {
                    ServiceError::NotFound("component not found".to_owned())
                }
                _ => ServiceError::from(e),
            })?;
        let component: Component = decode(row)?;
        tracing::info!(component_id = %component.id, "updated component");
        Ok(component)
    }

    async fn soft_delete_inner(
        &self,
        ctx: &RequestContext,
        id: ComponentId,
    ) -> Result<Component, ServiceError> {
        authorize(self.store.as_ref(), ctx, CATALOG_WRITERS).await?;

        let mut record = Record::new();
        record.insert("active".to_owned(), json!(false));

        let row = self
            .store
            .update(Table::Components, &Filter::active_by_id(id.as_uuid()), record)
            .await
            .map_err(|e| match e.kind {
                StoreErrorKind::NotFound => {
                    ServiceError::NotFound("component not found".to_owned())
                }
                _ => ServiceError::from(e),
            })?;
        let component: Component = decode(row)?;
        tracing::info!(component_id = %component.id, "soft-deleted component");
        Ok(component)
    }
}
