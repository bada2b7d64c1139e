//! Sales aggregation over the real store: completed-only filtering and the
//! revenue identity between item-level and order-level totals.

mod common;

use rust_decimal::Decimal;

use gatepass::IssuanceManager;
use gatepass::analytics;
use gatepass::db::models::OrganizerStatus;
use gatepass::db::repository::ReportRepository;

fn d(s: &str) -> Decimal {
    s.parse().expect("decimal literal")
}

#[tokio::test]
async fn only_completed_orders_contribute() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let db = common::test_db(&tmp).await;
    let organizer_id = common::seed_organizer(&db, OrganizerStatus::Approved).await;
    let event = common::seed_event(&db, organizer_id, d("100.00"), 10).await;
    let account_id = common::seed_user(&db, "buyer@example.com").await;

    let issuance = IssuanceManager::new(db.clone());

    // One completed order, one pending, one failed
    let completed = issuance
        .create_order(account_id, common::cart(&event, 2))
        .await
        .expect("order");
    issuance
        .confirm_payment(completed.order_id, Some(account_id))
        .await
        .expect("confirm");

    issuance
        .create_order(account_id, common::cart(&event, 1))
        .await
        .expect("pending order");

    let failed = issuance
        .create_order(account_id, common::cart(&event, 1))
        .await
        .expect("to-fail order");
    issuance
        .fail_payment(failed.order_id, Some(account_id))
        .await
        .expect("fail payment");

    let orders = ReportRepository::new(db.clone())
        .completed_orders()
        .await
        .expect("completed orders");
    assert_eq!(orders.len(), 1);

    let sales = analytics::sales_for_event(&orders, event.event_id);
    assert_eq!(sales.tickets_sold, 2);
    assert_eq!(sales.revenue, d("200.00"));
    assert_eq!(sales.order_count, 1);
}

#[tokio::test]
async fn revenue_identity_holds_across_levels() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let db = common::test_db(&tmp).await;
    let organizer_id = common::seed_organizer(&db, OrganizerStatus::Approved).await;
    let event_a = common::seed_event(&db, organizer_id, d("100.00"), 50).await;
    let event_b = common::seed_event(&db, organizer_id, d("33.33"), 50).await;
    let account_id = common::seed_user(&db, "buyer@example.com").await;

    let issuance = IssuanceManager::new(db.clone());
    for (event, quantity) in [(&event_a, 2), (&event_b, 3), (&event_a, 1)] {
        let order = issuance
            .create_order(account_id, common::cart(event, quantity))
            .await
            .expect("order");
        issuance
            .confirm_payment(order.order_id, Some(account_id))
            .await
            .expect("confirm");
    }

    let orders = ReportRepository::new(db.clone())
        .completed_orders()
        .await
        .expect("completed orders");
    assert_eq!(orders.len(), 3);

    let by_event = analytics::aggregate_by_event(&orders);
    let per_event_sum: Decimal = by_event.values().map(|s| s.revenue).sum();
    let item_sum: Decimal = orders
        .iter()
        .flat_map(|o| o.items.iter())
        .map(|i| i.line_total)
        .sum();
    let order_sum: Decimal = orders.iter().map(|o| o.total_amount).sum();

    assert_eq!(per_event_sum, item_sum);
    assert_eq!(per_event_sum, order_sum);
    // 3 * 100.00 + 3 * 33.33
    assert_eq!(per_event_sum, d("399.99"));

    assert_eq!(by_event.get(&event_a.event_id).expect("event a").tickets_sold, 3);
    assert_eq!(by_event.get(&event_b.event_id).expect("event b").tickets_sold, 3);
}

#[tokio::test]
async fn per_event_fetch_filters_mixed_orders() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let db = common::test_db(&tmp).await;
    let organizer_id = common::seed_organizer(&db, OrganizerStatus::Approved).await;
    let event_a = common::seed_event(&db, organizer_id, d("10.00"), 10).await;
    let event_b = common::seed_event(&db, organizer_id, d("20.00"), 10).await;
    let account_id = common::seed_user(&db, "buyer@example.com").await;

    let issuance = IssuanceManager::new(db.clone());
    for event in [&event_a, &event_b] {
        let order = issuance
            .create_order(account_id, common::cart(event, 1))
            .await
            .expect("order");
        issuance
            .confirm_payment(order.order_id, Some(account_id))
            .await
            .expect("confirm");
    }

    let reports = ReportRepository::new(db.clone());
    let for_a = reports
        .completed_orders_for_event(event_a.event_id)
        .await
        .expect("orders for a");
    assert_eq!(for_a.len(), 1);
    assert_eq!(for_a[0].items[0].event_id, event_a.event_id);
}
