//! Scanner properties: pass-id lookup and validate-exactly-once.

mod common;

use std::sync::Arc;

use rust_decimal::Decimal;

use gatepass::IssuanceManager;
use gatepass::db::models::OrganizerStatus;
use gatepass::db::repository::TicketRepository;
use gatepass::utils::time::now_millis;

fn d(s: &str) -> Decimal {
    s.parse().expect("decimal literal")
}

#[tokio::test]
async fn validation_succeeds_once_then_conflicts() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let db = common::test_db(&tmp).await;
    let organizer_id = common::seed_organizer(&db, OrganizerStatus::Approved).await;
    let event = common::seed_event(&db, organizer_id, d("100.00"), 2).await;
    let account_id = common::seed_user(&db, "buyer@example.com").await;

    let issuance = IssuanceManager::new(db.clone());
    let order = issuance
        .create_order(account_id, common::cart(&event, 1))
        .await
        .expect("create order");
    let (_, tickets) = issuance
        .confirm_payment(order.order_id, Some(account_id))
        .await
        .expect("confirm");
    let pass_id = tickets[0].pass_id.clone();

    let repo = TicketRepository::new(db.clone());

    // Lookup resolves by pass id, not ticket id
    let found = repo
        .find_by_pass_id(&pass_id)
        .await
        .expect("lookup")
        .expect("ticket exists");
    assert!(!found.is_validated);
    assert!(found.validation_time.is_none());

    // First validation succeeds and stamps the time
    let validated = repo
        .mark_validated(&pass_id, now_millis())
        .await
        .expect("mark validated")
        .expect("first validation wins");
    assert!(validated.is_validated);
    let stamped = validated.validation_time.expect("validation time set");

    // Second validation is refused and the stamp is unchanged
    let second = repo
        .mark_validated(&pass_id, now_millis() + 60_000)
        .await
        .expect("mark validated");
    assert!(second.is_none(), "second validation must not succeed");

    let after = repo
        .find_by_pass_id(&pass_id)
        .await
        .expect("lookup")
        .expect("ticket exists");
    assert!(after.is_validated);
    assert_eq!(after.validation_time, Some(stamped));
}

#[tokio::test]
async fn unknown_pass_id_resolves_to_nothing() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let db = common::test_db(&tmp).await;

    let repo = TicketRepository::new(db);
    let missing = repo
        .find_by_pass_id("GP-does-not-exist")
        .await
        .expect("lookup");
    assert!(missing.is_none());

    let updated = repo
        .mark_validated("GP-does-not-exist", now_millis())
        .await
        .expect("mark validated");
    assert!(updated.is_none());
}

#[tokio::test]
async fn concurrent_scans_validate_exactly_once() {
    const SCANNERS: usize = 8;

    let tmp = tempfile::tempdir().expect("tempdir");
    let db = common::test_db(&tmp).await;
    let organizer_id = common::seed_organizer(&db, OrganizerStatus::Approved).await;
    let event = common::seed_event(&db, organizer_id, d("10.00"), 1).await;
    let account_id = common::seed_user(&db, "buyer@example.com").await;

    let issuance = IssuanceManager::new(db.clone());
    let order = issuance
        .create_order(account_id, common::cart(&event, 1))
        .await
        .expect("create order");
    let (_, tickets) = issuance
        .confirm_payment(order.order_id, Some(account_id))
        .await
        .expect("confirm");
    let pass_id = tickets[0].pass_id.clone();

    let repo = Arc::new(TicketRepository::new(db));
    let handles: Vec<_> = (0..SCANNERS)
        .map(|_| {
            let repo = repo.clone();
            let pass_id = pass_id.clone();
            tokio::spawn(async move {
                repo.mark_validated(&pass_id, now_millis()).await.expect("query")
            })
        })
        .collect();

    let mut wins = 0;
    for result in futures::future::join_all(handles).await {
        if result.expect("join").is_some() {
            wins += 1;
        }
    }
    assert_eq!(wins, 1, "exactly one concurrent scan may win");
}
