// End-to-end installment payment flow against an in-memory SQLite database:
// sequential enforcement, partial payments, settlement, monthly
// rescheduling, and payment reversal.

#[path = "../helpers/mod.rs"]
mod helpers;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use helpers::{create_test_pool, seed_monthly_sale, TestDataFactory};
use tallybook::core::AppError;
use tallybook::modules::installments::models::InstallmentStatus;
use tallybook::modules::installments::services::InstallmentService;

fn pay_time(y: i32, m: u32, d: u32) -> chrono::NaiveDateTime {
    TestDataFactory::date(y, m, d).and_hms_opt(14, 30, 0).unwrap()
}

#[tokio::test]
async fn test_out_of_order_payment_rejected() {
    let pool = create_test_pool().await;
    let sale = seed_monthly_sale(&pool, 3, 3, TestDataFactory::date(2024, 1, 10)).await;

    let service = InstallmentService::new(pool.clone());
    let plan = service.get_plan(&sale.id).await.unwrap();
    assert_eq!(plan.len(), 3);

    let second = &plan[1];
    let err = service
        .record_payment(&second.id, dec!(100.00), pay_time(2024, 2, 1))
        .await
        .unwrap_err();

    match err {
        AppError::Validation(message) => {
            assert!(message.contains("installment 2"));
            assert!(message.contains("installment 1"));
        }
        other => panic!("expected validation error, got {:?}", other),
    }

    // Nothing was persisted
    let untouched = service.get_installment(&second.id).await.unwrap();
    assert_eq!(untouched.status, InstallmentStatus::Pending);
    assert_eq!(untouched.paid_amount, Decimal::ZERO);
}

#[tokio::test]
async fn test_partial_then_full_payment() {
    let pool = create_test_pool().await;
    // 3 x 100.00 monthly
    let sale = seed_monthly_sale(&pool, 3, 3, TestDataFactory::date(2024, 1, 10)).await;

    let service = InstallmentService::new(pool.clone());
    let plan = service.get_plan(&sale.id).await.unwrap();
    let first = &plan[0];

    let after_partial = service
        .record_payment(&first.id, dec!(40.00), pay_time(2024, 2, 5))
        .await
        .unwrap();
    assert_eq!(after_partial.status, InstallmentStatus::Partial);
    assert_eq!(after_partial.paid_amount, dec!(40.00));
    assert_eq!(after_partial.balance, dec!(60.00));

    // A partial predecessor still blocks the next installment
    let second_id = plan[1].id.clone();
    assert!(service
        .record_payment(&second_id, dec!(100.00), pay_time(2024, 2, 6))
        .await
        .is_err());

    let settled = service
        .record_payment(&first.id, dec!(60.00), pay_time(2024, 2, 7))
        .await
        .unwrap();
    assert_eq!(settled.status, InstallmentStatus::Paid);
    assert_eq!(settled.balance, Decimal::ZERO);
    assert!(settled.paid_date.is_some());

    // Now the second installment is payable
    let second = service
        .record_payment(&second_id, dec!(100.00), pay_time(2024, 3, 7))
        .await
        .unwrap();
    assert_eq!(second.status, InstallmentStatus::Paid);
}

#[tokio::test]
async fn test_settlement_reschedules_next_pending_monthly() {
    let pool = create_test_pool().await;
    // Sold 2024-01-10: due dates 02-10, 03-10, 04-10
    let sale = seed_monthly_sale(&pool, 3, 3, TestDataFactory::date(2024, 1, 10)).await;

    let service = InstallmentService::new(pool.clone());
    let plan = service.get_plan(&sale.id).await.unwrap();
    assert_eq!(plan[0].due_date, "2024-02-10");
    assert_eq!(plan[1].due_date, "2024-03-10");

    // Settle #1 late, on 2024-04-02: #2 moves to one month after the
    // payment, keeping its day-10 anchor
    service
        .record_payment(&plan[0].id, dec!(100.00), pay_time(2024, 4, 2))
        .await
        .unwrap();

    let plan = service.get_plan(&sale.id).await.unwrap();
    assert_eq!(plan[1].due_date, "2024-05-10");
    // Only the next pending installment moves
    assert_eq!(plan[2].due_date, "2024-04-10");
}

#[tokio::test]
async fn test_partial_payment_does_not_reschedule() {
    let pool = create_test_pool().await;
    let sale = seed_monthly_sale(&pool, 2, 3, TestDataFactory::date(2024, 1, 10)).await;

    let service = InstallmentService::new(pool.clone());
    let plan = service.get_plan(&sale.id).await.unwrap();

    // A partial payment leaves #1 unsettled: nothing is anchored, so
    // nothing moves
    service
        .record_payment(&plan[0].id, dec!(50.00), pay_time(2024, 2, 20))
        .await
        .unwrap();

    let plan = service.get_plan(&sale.id).await.unwrap();
    assert_eq!(plan[0].due_date, "2024-02-10");
    assert_eq!(plan[1].due_date, "2024-03-10");
}

#[tokio::test]
async fn test_outstanding_balance_tracks_payments() {
    let pool = create_test_pool().await;
    // 3 x 100.00 monthly
    let sale = seed_monthly_sale(&pool, 3, 3, TestDataFactory::date(2024, 1, 10)).await;

    let service = InstallmentService::new(pool.clone());
    assert_eq!(
        service.outstanding_balance(&sale.id).await.unwrap(),
        dec!(300.00)
    );

    let plan = service.get_plan(&sale.id).await.unwrap();

    // Partial payments count against the balance too
    service
        .record_payment(&plan[0].id, dec!(40.00), pay_time(2024, 2, 5))
        .await
        .unwrap();
    assert_eq!(
        service.outstanding_balance(&sale.id).await.unwrap(),
        dec!(260.00)
    );

    service
        .record_payment(&plan[0].id, dec!(60.00), pay_time(2024, 2, 7))
        .await
        .unwrap();
    assert_eq!(
        service.outstanding_balance(&sale.id).await.unwrap(),
        dec!(200.00)
    );
}

#[tokio::test]
async fn test_overpayment_rejected() {
    let pool = create_test_pool().await;
    let sale = seed_monthly_sale(&pool, 3, 3, TestDataFactory::date(2024, 1, 10)).await;

    let service = InstallmentService::new(pool.clone());
    let plan = service.get_plan(&sale.id).await.unwrap();

    assert!(service
        .record_payment(&plan[0].id, dec!(100.01), pay_time(2024, 2, 1))
        .await
        .is_err());
    assert!(service
        .record_payment(&plan[0].id, dec!(0.00), pay_time(2024, 2, 1))
        .await
        .is_err());
}

#[tokio::test]
async fn test_revert_payment_restores_pending() {
    let pool = create_test_pool().await;
    let sale = seed_monthly_sale(&pool, 2, 3, TestDataFactory::date(2024, 1, 10)).await;

    let service = InstallmentService::new(pool.clone());
    let plan = service.get_plan(&sale.id).await.unwrap();

    service
        .record_payment(&plan[0].id, dec!(150.00), pay_time(2024, 2, 5))
        .await
        .unwrap();

    let reverted = service.revert_payment(&plan[0].id).await.unwrap();
    assert_eq!(reverted.status, InstallmentStatus::Pending);
    assert_eq!(reverted.paid_amount, Decimal::ZERO);
    assert_eq!(reverted.balance, reverted.amount);
    assert!(reverted.paid_date.is_none());

    // With #1 back to pending, #2 is blocked again
    assert!(service
        .record_payment(&plan[1].id, dec!(150.00), pay_time(2024, 2, 6))
        .await
        .is_err());
}

#[tokio::test]
async fn test_flag_overdue_marks_past_due_only() {
    let pool = create_test_pool().await;
    // Due dates 2024-02-10 and 2024-03-10
    let sale = seed_monthly_sale(&pool, 2, 3, TestDataFactory::date(2024, 1, 10)).await;

    let service = InstallmentService::new(pool.clone());

    let flagged = service
        .flag_overdue(&sale.id, TestDataFactory::date(2024, 2, 20))
        .await
        .unwrap();
    assert_eq!(flagged.len(), 1);
    assert_eq!(flagged[0].installment_number, 1);
    assert_eq!(flagged[0].status, InstallmentStatus::Overdue);

    // Overdue blocks successors exactly like pending
    let plan = service.get_plan(&sale.id).await.unwrap();
    assert!(service
        .record_payment(&plan[1].id, dec!(150.00), pay_time(2024, 2, 21))
        .await
        .is_err());

    // And the overdue installment itself can still be paid
    assert!(service
        .record_payment(&plan[0].id, dec!(150.00), pay_time(2024, 2, 22))
        .await
        .is_ok());
}
