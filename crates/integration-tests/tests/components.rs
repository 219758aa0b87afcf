//! Component catalog workflows: category derivation, filtered listings,
//! role gating.

use voltlane_admin::models::{ComponentPatch, NewComponent};
use voltlane_admin::store::Table;
use voltlane_core::{ErrorKind, Role};
use voltlane_integration_tests::Harness;

fn new_component(category: &str, name: &str) -> NewComponent {
    NewComponent {
        category: category.to_owned(),
        name: name.to_owned(),
    }
}

#[tokio::test]
async fn test_create_and_list_by_category() {
    let h = Harness::new();
    let ctx = h.ctx_with_role(Role::Manager).await;

    for (category, name) in [
        ("cpu", "Ryzen 9 9950X"),
        ("gpu", "GeForce RTX 5080"),
        ("cpu", "Core Ultra 9 285K"),
    ] {
        h.components
            .create(&ctx, new_component(category, name))
            .await
            .into_result()
            .expect("create");
    }

    let cpus = h
        .components
        .list_active(Some("cpu"))
        .await
        .into_result()
        .expect("list cpus");
    assert_eq!(cpus.len(), 2);
    assert!(cpus.iter().all(|c| c.category == "cpu"));
    // Alphabetical by name.
    assert_eq!(cpus[0].name, "Core Ultra 9 285K");

    let all = h
        .components
        .list_active(None)
        .await
        .into_result()
        .expect("list all");
    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn test_categories_are_distinct_and_sorted() {
    let h = Harness::new();
    let ctx = h.ctx_with_role(Role::Admin).await;

    for (category, name) in [
        ("gpu", "GeForce RTX 5080"),
        ("case", "Fractal North XL"),
        ("gpu", "Radeon RX 9070 XT"),
        ("cpu", "Ryzen 9 9950X"),
    ] {
        h.components
            .create(&ctx, new_component(category, name))
            .await
            .into_result()
            .expect("create");
    }

    let categories = h
        .components
        .categories()
        .await
        .into_result()
        .expect("categories");
    assert_eq!(categories, vec!["case", "cpu", "gpu"]);
}

#[tokio::test]
async fn test_empty_catalog_has_no_categories() {
    let h = Harness::new();

    let categories = h
        .components
        .categories()
        .await
        .into_result()
        .expect("empty catalog is a success, not an error");
    assert!(categories.is_empty());
}

#[tokio::test]
async fn test_soft_deleted_components_leave_the_category_set() {
    let h = Harness::new();
    let ctx = h.ctx_with_role(Role::Admin).await;

    let component = h
        .components
        .create(&ctx, new_component("psu", "Northlight 850W"))
        .await
        .into_result()
        .expect("create");

    h.components
        .soft_delete(&ctx, component.id)
        .await
        .into_result()
        .expect("soft delete");

    let categories = h
        .components
        .categories()
        .await
        .into_result()
        .expect("categories");
    assert!(categories.is_empty());

    let error = h
        .components
        .get_by_id(component.id)
        .await
        .into_result()
        .expect_err("invisible after delete");
    assert_eq!(error.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_staff_cannot_mutate_components() {
    let h = Harness::new();
    let ctx = h.ctx_with_role(Role::Staff).await;

    let error = h
        .components
        .create(&ctx, new_component("cpu", "Ryzen 5 9600X"))
        .await
        .into_result()
        .expect_err("staff denied");

    assert_eq!(error.kind, ErrorKind::Denied);
    assert_eq!(h.store.row_count(Table::Components).await, 0);
}

#[tokio::test]
async fn test_update_can_move_a_component_between_categories() {
    let h = Harness::new();
    let ctx = h.ctx_with_role(Role::Admin).await;

    let component = h
        .components
        .create(&ctx, new_component("cooler", "Hypervolt 360"))
        .await
        .into_result()
        .expect("create");

    let updated = h
        .components
        .update(
            &ctx,
            component.id,
            ComponentPatch {
                category: Some("aio".to_owned()),
                ..ComponentPatch::default()
            },
        )
        .await
        .into_result()
        .expect("update");

    assert_eq!(updated.category, "aio");
    assert_eq!(updated.name, "Hypervolt 360");

    let categories = h
        .components
        .categories()
        .await
        .into_result()
        .expect("categories");
    assert_eq!(categories, vec!["aio"]);
}
