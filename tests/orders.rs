mod common;

use portal_core::CoreError;
use portal_core::model::{OrderDecision, OrderStatus};
use portal_core::service::OrderLedger;

#[tokio::test]
async fn submit_creates_a_pending_record() {
    let pool = common::test_pool().await;
    let user = common::seed_user(&pool, "amira", Some("5.00"), true).await;
    let ledger = OrderLedger::new(pool);

    let record = ledger.submit(user, "2024-02-10", 12).await.unwrap();
    assert_eq!(record.user_id, user);
    assert_eq!(record.submitted_count, 12);
    assert_eq!(record.approved_count, None);
    assert_eq!(record.status, OrderStatus::Pending);
}

#[tokio::test]
async fn resubmit_overwrites_the_same_day() {
    let pool = common::test_pool().await;
    let user = common::seed_user(&pool, "amira", Some("5.00"), true).await;
    let ledger = OrderLedger::new(pool);

    let first = ledger.submit(user, "2024-02-10", 12).await.unwrap();
    let second = ledger.submit(user, "2024-02-10", 7).await.unwrap();

    assert_eq!(second.id, first.id);
    assert_eq!(second.submitted_count, 7);
    assert_eq!(second.status, OrderStatus::Pending);
}

#[tokio::test]
async fn rejected_submission_can_be_resubmitted() {
    let pool = common::test_pool().await;
    let user = common::seed_user(&pool, "amira", Some("5.00"), true).await;
    let ledger = OrderLedger::new(pool);

    let record = ledger.submit(user, "2024-02-10", 12).await.unwrap();
    let rejected = ledger
        .decide(record.id, OrderDecision::Reject, None)
        .await
        .unwrap();
    assert_eq!(rejected.status, OrderStatus::Rejected);
    assert_eq!(rejected.approved_count, None);

    let resubmitted = ledger.submit(user, "2024-02-10", 15).await.unwrap();
    assert_eq!(resubmitted.id, record.id);
    assert_eq!(resubmitted.status, OrderStatus::Pending);
    assert_eq!(resubmitted.submitted_count, 15);
}

#[tokio::test]
async fn approval_fixes_the_count_and_locks_the_record() {
    let pool = common::test_pool().await;
    let user = common::seed_user(&pool, "amira", Some("5.00"), true).await;
    let ledger = OrderLedger::new(pool);

    let record = ledger.submit(user, "2024-02-10", 12).await.unwrap();
    let approved = ledger
        .decide(record.id, OrderDecision::Approve, Some(10))
        .await
        .unwrap();
    assert_eq!(approved.status, OrderStatus::Approved);
    assert_eq!(approved.approved_count, Some(10));

    // The employee can no longer touch it.
    let err = ledger.submit(user, "2024-02-10", 99).await.unwrap_err();
    assert!(matches!(err, CoreError::OrderLocked(id) if id == record.id));

    // Neither can a second decision.
    let err = ledger
        .decide(record.id, OrderDecision::Reject, None)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::OrderLocked(_)));

    let records = ledger.list_for_month(user, "2024-02").await.unwrap();
    assert_eq!(records[0].submitted_count, 12);
    assert_eq!(records[0].approved_count, Some(10));
    assert_eq!(records[0].status, OrderStatus::Approved);
}

#[tokio::test]
async fn approve_without_a_count_is_rejected() {
    let pool = common::test_pool().await;
    let user = common::seed_user(&pool, "amira", Some("5.00"), true).await;
    let ledger = OrderLedger::new(pool);

    let record = ledger.submit(user, "2024-02-10", 12).await.unwrap();
    let err = ledger
        .decide(record.id, OrderDecision::Approve, None)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::InvalidApprovedCount));

    // The record is untouched.
    let records = ledger.list_for_month(user, "2024-02").await.unwrap();
    assert_eq!(records[0].status, OrderStatus::Pending);
}

#[tokio::test]
async fn deciding_an_unknown_order_fails() {
    let pool = common::test_pool().await;
    let ledger = OrderLedger::new(pool);

    let err = ledger
        .decide(4242, OrderDecision::Reject, None)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::OrderNotFound(4242)));
}

#[tokio::test]
async fn malformed_date_keys_are_rejected() {
    let pool = common::test_pool().await;
    let user = common::seed_user(&pool, "amira", Some("5.00"), true).await;
    let ledger = OrderLedger::new(pool);

    let err = ledger.submit(user, "2024-2-10", 1).await.unwrap_err();
    assert!(matches!(err, CoreError::InvalidDateKey(_)));
}

#[tokio::test]
async fn list_for_month_is_windowed_and_ordered() {
    let pool = common::test_pool().await;
    let user = common::seed_user(&pool, "amira", Some("5.00"), true).await;
    let ledger = OrderLedger::new(pool);

    for (day, count) in [
        ("2024-02-20", 4),
        ("2024-02-03", 9),
        ("2024-03-01", 2),
        ("2024-01-31", 6),
    ] {
        ledger.submit(user, day, count).await.unwrap();
    }

    let records = ledger.list_for_month(user, "2024-02").await.unwrap();
    let days: Vec<String> = records.iter().map(|r| r.date.to_string()).collect();
    assert_eq!(days, ["2024-02-03", "2024-02-20"]);
}
