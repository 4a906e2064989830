// Alert queries against an in-memory SQLite database. Every query takes an
// explicit reference date, so the assertions never depend on the wall clock.

#[path = "../helpers/mod.rs"]
mod helpers;

use rust_decimal_macros::dec;

use helpers::{create_test_pool, seed_monthly_sale, TestDataFactory};
use tallybook::modules::installments::services::InstallmentService;
use tallybook::modules::notifications::{
    models::InstallmentAlertKind, services::NotificationService,
};
use tallybook::modules::products::{models::ProductInput, services::ProductService};

#[tokio::test]
async fn test_overdue_alerts_only_past_due_installments() {
    let pool = create_test_pool().await;
    // Plan due 2024-02-15, 2024-03-15, 2024-04-15
    let sale = seed_monthly_sale(&pool, 3, 1, TestDataFactory::date(2024, 1, 15)).await;

    let alerts = NotificationService::new(pool.clone())
        .overdue_installments(TestDataFactory::date(2024, 3, 20))
        .await
        .unwrap();

    assert_eq!(alerts.len(), 2);
    assert!(alerts
        .iter()
        .all(|a| a.kind == InstallmentAlertKind::Overdue && a.sale_id == sale.id));
    let numbers: Vec<i64> = alerts.iter().map(|a| a.installment_number).collect();
    assert_eq!(numbers, vec![1, 2]);
}

#[tokio::test]
async fn test_due_on_reference_date_is_not_overdue() {
    let pool = create_test_pool().await;
    seed_monthly_sale(&pool, 1, 1, TestDataFactory::date(2024, 1, 15)).await;

    let service = NotificationService::new(pool.clone());

    // Due 2024-02-15: not overdue on the day itself
    let alerts = service
        .overdue_installments(TestDataFactory::date(2024, 2, 15))
        .await
        .unwrap();
    assert!(alerts.is_empty());

    let alerts = service
        .overdue_installments(TestDataFactory::date(2024, 2, 16))
        .await
        .unwrap();
    assert_eq!(alerts.len(), 1);
}

#[tokio::test]
async fn test_settled_installments_never_alert() {
    let pool = create_test_pool().await;
    let sale = seed_monthly_sale(&pool, 2, 1, TestDataFactory::date(2024, 1, 15)).await;

    let installment_service = InstallmentService::new(pool.clone());
    let plan = installment_service.get_plan(&sale.id).await.unwrap();

    // Settle #1 well after its due date
    let paid_at = TestDataFactory::date(2024, 3, 1)
        .and_hms_opt(10, 0, 0)
        .unwrap();
    installment_service
        .record_payment(&plan[0].id, dec!(50.00), paid_at)
        .await
        .unwrap();

    let alerts = NotificationService::new(pool.clone())
        .overdue_installments(TestDataFactory::date(2024, 6, 1))
        .await
        .unwrap();

    // Only #2 is still open (and was moved by the reschedule, still past due by June)
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].installment_number, 2);
}

#[tokio::test]
async fn test_upcoming_window_is_inclusive() {
    let pool = create_test_pool().await;
    // Plan due 2024-02-15 and 2024-03-15
    seed_monthly_sale(&pool, 2, 1, TestDataFactory::date(2024, 1, 15)).await;

    let service = NotificationService::new(pool.clone());

    // Window [2024-02-08, 2024-02-15] catches #1 on its boundary
    let alerts = service
        .upcoming_installments(TestDataFactory::date(2024, 2, 8), 7)
        .await
        .unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].kind, InstallmentAlertKind::DueSoon);
    assert_eq!(alerts[0].due_date, "2024-02-15");

    // One day later the window [2024-02-09, 2024-02-16] still holds #1
    let alerts = service
        .upcoming_installments(TestDataFactory::date(2024, 2, 9), 7)
        .await
        .unwrap();
    assert_eq!(alerts.len(), 1);

    // Past-due installments are the overdue query's business, not this one's
    let alerts = service
        .upcoming_installments(TestDataFactory::date(2024, 2, 16), 7)
        .await
        .unwrap();
    assert!(alerts.is_empty());
}

#[tokio::test]
async fn test_wide_window_catches_whole_plan() {
    let pool = create_test_pool().await;
    seed_monthly_sale(&pool, 3, 1, TestDataFactory::date(2024, 1, 15)).await;

    let alerts = NotificationService::new(pool.clone())
        .upcoming_installments(TestDataFactory::date(2024, 2, 1), 90)
        .await
        .unwrap();

    assert_eq!(alerts.len(), 3);
    assert_eq!(alerts[0].balance, dec!(33.33));
}

#[tokio::test]
async fn test_configured_default_threshold_applies_to_new_products() {
    let pool = create_test_pool().await;

    let product = ProductService::with_default_threshold(pool.clone(), 3)
        .create_product(ProductInput {
            name: "Lamp".to_string(),
            price: dec!(30.00),
            stock_quantity: 3,
            low_stock_threshold: None,
        })
        .await
        .unwrap();
    assert_eq!(product.low_stock_threshold, 3);

    // At exactly the configured threshold the product alerts
    let alerts = NotificationService::new(pool.clone())
        .low_stock_products()
        .await
        .unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].low_stock_threshold, 3);
}

#[tokio::test]
async fn test_low_stock_alerts() {
    let pool = create_test_pool().await;

    let product_service = ProductService::new(pool.clone());
    let healthy = product_service
        .create_product(TestDataFactory::product_input("Fan", "100.00", 20))
        .await
        .unwrap();
    let low = product_service
        .create_product(TestDataFactory::product_input("Iron", "45.00", 2))
        .await
        .unwrap();
    let out = product_service
        .create_product(TestDataFactory::product_input("Mixer", "89.00", 0))
        .await
        .unwrap();

    let alerts = NotificationService::new(pool.clone())
        .low_stock_products()
        .await
        .unwrap();

    let ids: Vec<&str> = alerts.iter().map(|a| a.product_id.as_str()).collect();
    assert_eq!(alerts.len(), 2);
    assert!(ids.contains(&low.id.as_str()));
    assert!(ids.contains(&out.id.as_str()));
    assert!(!ids.contains(&healthy.id.as_str()));
}
