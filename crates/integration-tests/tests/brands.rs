//! End-to-end brand workflows over the in-memory gateway: creation with
//! slug derivation, role gating, soft-delete visibility, partial updates.

use voltlane_admin::models::{BrandPatch, NewBrand};
use voltlane_admin::store::{StoreErrorKind, Table};
use voltlane_core::{ErrorKind, Role};
use voltlane_integration_tests::Harness;

fn new_brand(name: &str) -> NewBrand {
    NewBrand {
        name: name.to_owned(),
        ..NewBrand::default()
    }
}

#[tokio::test]
async fn test_create_derives_slug_from_name() {
    let h = Harness::new();
    let ctx = h.ctx_with_role(Role::Admin).await;

    let brand = h
        .brands
        .create(&ctx, new_brand("Acme Gaming"))
        .await
        .into_result()
        .expect("create succeeds");

    assert_eq!(brand.name, "Acme Gaming");
    assert_eq!(brand.slug, "acme-gaming");
    assert!(brand.active);
}

#[tokio::test]
async fn test_manager_creates_brand_with_punctuated_name() {
    let h = Harness::new();
    let ctx = h.ctx_with_role(Role::Manager).await;

    let envelope = h.brands.create(&ctx, new_brand("Acme Gaming!!")).await;
    assert!(envelope.success);

    let brand = envelope.into_result().expect("create succeeds");
    // The display name keeps its punctuation; only the slug is normalized.
    assert_eq!(brand.name, "Acme Gaming!!");
    assert_eq!(brand.slug, "acme-gaming");
    assert!(brand.active);
}

#[tokio::test]
async fn test_create_requires_a_name() {
    let h = Harness::new();
    let ctx = h.ctx_with_role(Role::Admin).await;

    let error = h
        .brands
        .create(&ctx, new_brand("   "))
        .await
        .into_result()
        .expect_err("blank name rejected");

    assert_eq!(error.kind, ErrorKind::ValidationFailed);
    assert_eq!(error.message, "name is required");
    assert_eq!(h.store.row_count(Table::Brands).await, 0);
}

#[tokio::test]
async fn test_name_with_no_usable_characters_rejected() {
    let h = Harness::new();
    let ctx = h.ctx_with_role(Role::Admin).await;

    let error = h
        .brands
        .create(&ctx, new_brand("!!!"))
        .await
        .into_result()
        .expect_err("symbol-only name rejected");

    assert_eq!(error.kind, ErrorKind::ValidationFailed);
    assert_eq!(h.store.row_count(Table::Brands).await, 0);
}

#[tokio::test]
async fn test_staff_cannot_create() {
    let h = Harness::new();
    let ctx = h.ctx_with_role(Role::Staff).await;

    let error = h
        .brands
        .create(&ctx, new_brand("Acme"))
        .await
        .into_result()
        .expect_err("staff denied");

    assert_eq!(error.kind, ErrorKind::Denied);
    assert!(!error.kind.is_retryable());
    // Nothing reached the store.
    assert_eq!(h.store.row_count(Table::Brands).await, 0);
}

#[tokio::test]
async fn test_anonymous_cannot_create() {
    let h = Harness::new();

    let error = h
        .brands
        .create(
            &voltlane_admin::RequestContext::anonymous(),
            new_brand("Acme"),
        )
        .await
        .into_result()
        .expect_err("anonymous rejected");

    assert_eq!(error.kind, ErrorKind::Unauthenticated);
    assert_eq!(h.store.row_count(Table::Brands).await, 0);
}

#[tokio::test]
async fn test_role_lookup_failure_is_retryable_and_writes_nothing() {
    let h = Harness::new();
    let ctx = h.ctx_with_role(Role::Admin).await;

    h.store.fail_next(StoreErrorKind::Transport).await;
    let error = h
        .brands
        .create(&ctx, new_brand("Acme"))
        .await
        .into_result()
        .expect_err("lookup failed");

    assert_eq!(error.kind, ErrorKind::AuthorizationLookupFailed);
    assert!(error.kind.is_retryable());
    assert_eq!(h.store.row_count(Table::Brands).await, 0);
}

#[tokio::test]
async fn test_duplicate_slug_is_a_conflict() {
    let h = Harness::new();
    let ctx = h.ctx_with_role(Role::Admin).await;

    h.brands
        .create(&ctx, new_brand("Acme Gaming"))
        .await
        .into_result()
        .expect("first create");

    // Different display name, same derived slug.
    let error = h
        .brands
        .create(&ctx, new_brand("  acme   GAMING "))
        .await
        .into_result()
        .expect_err("same slug rejected");

    assert_eq!(error.kind, ErrorKind::Conflict);
    assert!(error.message.contains("acme-gaming"));
    assert_eq!(h.store.row_count(Table::Brands).await, 1);
}

#[tokio::test]
async fn test_soft_delete_hides_brand_from_reads_but_keeps_the_row() {
    let h = Harness::new();
    let ctx = h.ctx_with_role(Role::Manager).await;

    let brand = h
        .brands
        .create(&ctx, new_brand("Acme"))
        .await
        .into_result()
        .expect("create");

    h.brands
        .soft_delete(&ctx, brand.id)
        .await
        .into_result()
        .expect("soft delete");

    let listed = h.brands.list_active().await.into_result().expect("list");
    assert!(listed.is_empty());

    let error = h
        .brands
        .get_by_id(brand.id)
        .await
        .into_result()
        .expect_err("invisible after delete");
    assert_eq!(error.kind, ErrorKind::NotFound);

    // The row still exists physically.
    assert_eq!(h.store.row_count(Table::Brands).await, 1);
}

#[tokio::test]
async fn test_partial_update_changes_only_supplied_fields() {
    let h = Harness::new();
    let ctx = h.ctx_with_role(Role::Admin).await;

    let brand = h
        .brands
        .create(
            &ctx,
            NewBrand {
                name: "Acme".to_owned(),
                description: Some("Original description".to_owned()),
                ..NewBrand::default()
            },
        )
        .await
        .into_result()
        .expect("create");

    let updated = h
        .brands
        .update(
            &ctx,
            brand.id,
            BrandPatch {
                website_url: Some("https://acme.example".to_owned()),
                ..BrandPatch::default()
            },
        )
        .await
        .into_result()
        .expect("update");

    assert_eq!(updated.name, "Acme");
    assert_eq!(updated.slug, "acme");
    assert_eq!(updated.description.as_deref(), Some("Original description"));
    assert_eq!(updated.website_url.as_deref(), Some("https://acme.example"));
}

#[tokio::test]
async fn test_renaming_rederives_the_slug() {
    let h = Harness::new();
    let ctx = h.ctx_with_role(Role::Admin).await;

    let brand = h
        .brands
        .create(&ctx, new_brand("Acme"))
        .await
        .into_result()
        .expect("create");

    let updated = h
        .brands
        .update(
            &ctx,
            brand.id,
            BrandPatch {
                name: Some("RGB Mouse!!".to_owned()),
                ..BrandPatch::default()
            },
        )
        .await
        .into_result()
        .expect("rename");

    assert_eq!(updated.slug, "rgb-mouse");
}

#[tokio::test]
async fn test_empty_patch_is_rejected() {
    let h = Harness::new();
    let ctx = h.ctx_with_role(Role::Admin).await;

    let brand = h
        .brands
        .create(&ctx, new_brand("Acme"))
        .await
        .into_result()
        .expect("create");

    let error = h
        .brands
        .update(&ctx, brand.id, BrandPatch::default())
        .await
        .into_result()
        .expect_err("empty patch rejected");

    assert_eq!(error.kind, ErrorKind::ValidationFailed);
    assert_eq!(error.message, "nothing to update");
}

#[tokio::test]
async fn test_list_is_alphabetical() {
    let h = Harness::new();
    let ctx = h.ctx_with_role(Role::Admin).await;

    for name in ["Zephyr", "acme", "Mantle"] {
        h.brands
            .create(&ctx, new_brand(name))
            .await
            .into_result()
            .expect("create");
    }

    let listed = h.brands.list_active().await.into_result().expect("list");
    let names: Vec<&str> = listed.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec!["acme", "Mantle", "Zephyr"]);
}
