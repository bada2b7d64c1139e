//! Checkout and issuance: server-computed totals, atomic inventory
//! decrement, no overselling under concurrency.

mod common;

use std::sync::Arc;

use rust_decimal::Decimal;

use gatepass::IssuanceManager;
use gatepass::db::models::{OrganizerStatus, PaymentStatus};
use gatepass::db::repository::{EventRepository, TicketRepository};

fn d(s: &str) -> Decimal {
    s.parse().expect("decimal literal")
}

#[tokio::test]
async fn order_total_is_server_computed() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let db = common::test_db(&tmp).await;
    let organizer_id = common::seed_organizer(&db, OrganizerStatus::Approved).await;
    let event = common::seed_event(&db, organizer_id, d("100.00"), 10).await;
    let account_id = common::seed_user(&db, "buyer@example.com").await;

    let issuance = IssuanceManager::new(db);
    let order = issuance
        .create_order(account_id, common::cart(&event, 2))
        .await
        .expect("create order");

    assert_eq!(order.total_amount, d("200.00"));
    assert_eq!(order.payment_status, PaymentStatus::Pending);
    assert_eq!(order.items.len(), 1);
    assert_eq!(order.items[0].line_total, d("200.00"));
}

#[tokio::test]
async fn full_checkout_issues_tickets_and_exhausts_inventory() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let db = common::test_db(&tmp).await;
    let organizer_id = common::seed_organizer(&db, OrganizerStatus::Approved).await;
    let event = common::seed_event(&db, organizer_id, d("100.00"), 2).await;
    let account_id = common::seed_user(&db, "buyer@example.com").await;

    let issuance = IssuanceManager::new(db.clone());

    // Buy both remaining tickets
    let order = issuance
        .create_order(account_id, common::cart(&event, 2))
        .await
        .expect("create order");
    let (completed, tickets) = issuance
        .confirm_payment(order.order_id, Some(account_id))
        .await
        .expect("confirm payment");

    assert_eq!(completed.payment_status, PaymentStatus::Completed);
    assert!(completed.completed_at.is_some());
    assert_eq!(tickets.len(), 2);

    // Each ticket has a distinct pass id and QR payload
    assert_ne!(tickets[0].pass_id, tickets[1].pass_id);
    assert_ne!(tickets[0].qr_code, tickets[1].qr_code);

    // Availability is zero, capacity untouched
    let event = EventRepository::new(db.clone())
        .find_by_id(event.event_id)
        .await
        .expect("fetch event")
        .expect("event exists");
    let tt = &event.categories[0].ticket_types[0];
    assert_eq!(tt.quantity_available, 0);
    assert_eq!(tt.quantity_total, 2);

    // A further order against the exhausted type fails with an inventory
    // error at cart time
    let err = issuance
        .create_order(account_id, common::cart(&event, 1))
        .await
        .expect_err("sold out");
    assert!(err.to_string().contains("remaining"), "unexpected error: {err}");

    // Confirming the same order again is a distinct conflict
    let err = issuance
        .confirm_payment(order.order_id, Some(account_id))
        .await
        .expect_err("already completed");
    assert!(
        err.to_string().contains("already completed"),
        "unexpected error: {err}"
    );
}

#[tokio::test]
async fn confirmation_reverifies_inventory() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let db = common::test_db(&tmp).await;
    let organizer_id = common::seed_organizer(&db, OrganizerStatus::Approved).await;
    let event = common::seed_event(&db, organizer_id, d("50.00"), 2).await;
    let account_id = common::seed_user(&db, "buyer@example.com").await;

    let issuance = IssuanceManager::new(db.clone());

    // Both orders pass the cart-time check while inventory is still 2
    let first = issuance
        .create_order(account_id, common::cart(&event, 2))
        .await
        .expect("first order");
    let second = issuance
        .create_order(account_id, common::cart(&event, 1))
        .await
        .expect("second order");

    issuance
        .confirm_payment(first.order_id, Some(account_id))
        .await
        .expect("first confirmation");

    // The second confirmation must fail: the cart-time check is not trusted
    let err = issuance
        .confirm_payment(second.order_id, Some(account_id))
        .await
        .expect_err("oversell rejected");
    assert!(
        err.to_string().contains("inventory exceeded"),
        "unexpected error: {err}"
    );

    // The failed order is marked FAILED and no partial tickets exist for it
    let failed = gatepass::db::repository::OrderRepository::new(db.clone())
        .find_by_id(second.order_id)
        .await
        .expect("fetch order")
        .expect("order exists");
    assert_eq!(failed.payment_status, PaymentStatus::Failed);
    let tickets = TicketRepository::new(db.clone())
        .list_by_order(second.order_id)
        .await
        .expect("tickets");
    assert!(tickets.is_empty());
}

#[tokio::test]
async fn concurrent_confirmations_never_oversell() {
    const CAPACITY: i64 = 5;
    const BUYERS: usize = 10;

    let tmp = tempfile::tempdir().expect("tempdir");
    let db = common::test_db(&tmp).await;
    let organizer_id = common::seed_organizer(&db, OrganizerStatus::Approved).await;
    let event = common::seed_event(&db, organizer_id, d("25.00"), CAPACITY).await;
    let account_id = common::seed_user(&db, "buyer@example.com").await;

    let issuance = Arc::new(IssuanceManager::new(db.clone()));

    // All orders pass the cart-time check before any confirmation runs
    let mut order_ids = Vec::new();
    for _ in 0..BUYERS {
        let order = issuance
            .create_order(account_id, common::cart(&event, 1))
            .await
            .expect("create order");
        order_ids.push(order.order_id);
    }

    let handles: Vec<_> = order_ids
        .into_iter()
        .map(|order_id| {
            let issuance = issuance.clone();
            tokio::spawn(async move {
                issuance.confirm_payment(order_id, Some(account_id)).await
            })
        })
        .collect();

    let mut successes = 0;
    for result in futures::future::join_all(handles).await {
        if result.expect("join").is_ok() {
            successes += 1;
        }
    }
    assert_eq!(successes, CAPACITY, "exactly capacity confirmations succeed");

    let event = EventRepository::new(db.clone())
        .find_by_id(event.event_id)
        .await
        .expect("fetch event")
        .expect("event exists");
    let available = event.categories[0].ticket_types[0].quantity_available;
    assert_eq!(available, 0);
    assert!(available >= 0, "inventory must never go negative");

    let issued = TicketRepository::new(db.clone())
        .list_by_event(event.event_id)
        .await
        .expect("tickets");
    assert_eq!(issued.len() as i64, CAPACITY);
}
