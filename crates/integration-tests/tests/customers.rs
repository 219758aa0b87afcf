//! Customer read paths: flat listing, composed order history, search, and
//! atomic statistics.

use rust_decimal::Decimal;
use uuid::Uuid;
use voltlane_admin::store::StoreErrorKind;
use voltlane_core::{CurrencyCode, CustomerId, ErrorKind};
use voltlane_integration_tests::Harness;

#[tokio::test]
async fn test_list_returns_flat_customers() {
    let h = Harness::new();
    h.seed_customer("Greg", "Halvorsen", "greg@example.com").await;
    h.seed_customer("Margret", "Oduya", "margret@example.com").await;

    let customers = h.customers.list().await.into_result().expect("list");
    assert_eq!(customers.len(), 2);
}

#[tokio::test]
async fn test_get_by_id_composes_orders_items_and_product_names() {
    let h = Harness::new();
    let customer_id = h.seed_customer("Greg", "Halvorsen", "greg@example.com").await;
    let tower = h.seed_product("Starter Tower", "1299.00").await;
    let mouse = h.seed_product("RGB Mouse", "49.99").await;

    let order = h.seed_order(customer_id, "1348.99").await;
    h.seed_order_item(order, tower.as_uuid(), "1299.00", 1).await;
    h.seed_order_item(order, mouse.as_uuid(), "49.99", 1).await;

    let detail = h
        .customers
        .get_by_id(customer_id)
        .await
        .into_result()
        .expect("composed fetch");

    assert_eq!(detail.customer.first_name, "Greg");
    assert_eq!(detail.orders.len(), 1);

    let order = &detail.orders[0];
    assert_eq!(order.order.total_amount, Decimal::new(134_899, 2));
    assert_eq!(order.total.amount, Decimal::new(134_899, 2));
    assert_eq!(order.total.currency_code, CurrencyCode::USD);
    assert_eq!(order.items.len(), 2);
    let mut names: Vec<&str> = order.items.iter().map(|i| i.product_name.as_str()).collect();
    names.sort_unstable();
    assert_eq!(names, vec!["RGB Mouse", "Starter Tower"]);
}

#[tokio::test]
async fn test_item_with_missing_product_gets_a_placeholder_name() {
    let h = Harness::new();
    let customer_id = h.seed_customer("Greg", "Halvorsen", "greg@example.com").await;
    let order = h.seed_order(customer_id, "49.99").await;
    // Product row never created.
    h.seed_order_item(order, Uuid::new_v4(), "49.99", 1).await;

    let detail = h
        .customers
        .get_by_id(customer_id)
        .await
        .into_result()
        .expect("composed fetch tolerates dangling product refs");

    assert_eq!(detail.orders[0].items[0].product_name, "unknown product");
}

#[tokio::test]
async fn test_customer_without_orders_has_empty_history() {
    let h = Harness::new();
    let customer_id = h.seed_customer("Greg", "Halvorsen", "greg@example.com").await;

    let detail = h
        .customers
        .get_by_id(customer_id)
        .await
        .into_result()
        .expect("fetch");
    assert!(detail.orders.is_empty());
}

#[tokio::test]
async fn test_unknown_customer_is_not_found() {
    let h = Harness::new();

    let error = h
        .customers
        .get_by_id(CustomerId::new(Uuid::new_v4()))
        .await
        .into_result()
        .expect_err("missing customer");
    assert_eq!(error.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_search_matches_names_and_emails_case_insensitively() {
    let h = Harness::new();
    h.seed_customer("Greg", "Halvorsen", "greg@example.com").await;
    h.seed_customer("Margret", "Oduya", "margret@example.com").await;
    h.seed_customer("Ada", "Byron", "ada@example.com").await;

    // "gre" hits Greg's first name and Margret's email.
    let hits = h
        .customers
        .search("gre")
        .await
        .into_result()
        .expect("search");
    assert_eq!(hits.len(), 2);

    let hits = h
        .customers
        .search("BYRON")
        .await
        .into_result()
        .expect("uppercase term still matches");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].last_name, "Byron");
}

#[tokio::test]
async fn test_malformed_email_row_is_a_store_failure() {
    let h = Harness::new();
    h.seed_customer("Bad", "Row", "not-an-email").await;

    let error = h
        .customers
        .list()
        .await
        .into_result()
        .expect_err("row fails email validation at decode");
    assert_eq!(error.kind, ErrorKind::StoreFailure);
    assert!(error.message.contains("malformed row"));
}

#[tokio::test]
async fn test_blank_search_term_is_rejected() {
    let h = Harness::new();

    let error = h
        .customers
        .search("   ")
        .await
        .into_result()
        .expect_err("blank term rejected");
    assert_eq!(error.kind, ErrorKind::ValidationFailed);
}

#[tokio::test]
async fn test_stats_counts_totals_and_recent_signups() {
    let h = Harness::new();
    h.seed_customer("Greg", "Halvorsen", "greg@example.com").await;
    h.seed_customer("Margret", "Oduya", "margret@example.com").await;

    let stats = h.customers.stats().await.into_result().expect("stats");
    assert_eq!(stats.total, 2);
    // Both were just created, so both fall inside the trailing window.
    assert_eq!(stats.new_last_30_days, 2);
}

#[tokio::test]
async fn test_stats_fails_whole_when_second_count_fails() {
    let h = Harness::new();
    h.seed_customer("Greg", "Halvorsen", "greg@example.com").await;

    // First count succeeds, second fails: no partial statistics.
    h.store.fail_after(1, StoreErrorKind::Transport).await;
    let error = h
        .customers
        .stats()
        .await
        .into_result()
        .expect_err("aggregate fails as a unit");
    assert_eq!(error.kind, ErrorKind::StoreFailure);
    assert!(error.kind.is_retryable());
}
