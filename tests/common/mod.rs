//! Shared fixtures for integration tests: an embedded store in a tempdir
//! plus seeded accounts, organizers and events.
#![allow(dead_code)]

use rust_decimal::Decimal;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

use gatepass::db::DbService;
use gatepass::db::models::{
    AttendeeInfo, Event, EventStatus, MasterAccount, OrderCreate, OrderItemInput,
    OrganizerProfile, OrganizerStatus, Role, TicketCategory, TicketType, UserProfile,
};
use gatepass::db::repository::{AccountRepository, EventRepository, OrganizerRepository, UserRepository};
use gatepass::db::sequence::{SequenceService, sequences};

pub async fn test_db(tmp: &tempfile::TempDir) -> Surreal<Db> {
    DbService::new(tmp.path()).await.expect("open test db").db
}

pub fn now() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Seed a user account + profile; returns the account id
pub async fn seed_user(db: &Surreal<Db>, email: &str) -> i64 {
    let sequences_svc = SequenceService::new(db.clone());
    let account_id = sequences_svc.next_value(sequences::ACCOUNTS).await.expect("seq");
    let user_id = sequences_svc.next_value(sequences::USERS).await.expect("seq");

    UserRepository::new(db.clone())
        .create(UserProfile {
            id: None,
            user_id,
            account: RecordId::from_table_key("account", account_id),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            phone: None,
            profile_image: None,
            gender: None,
            date_of_birth: None,
            created_at: now(),
        })
        .await
        .expect("seed user profile");

    AccountRepository::new(db.clone())
        .create(MasterAccount {
            id: None,
            account_id,
            email: email.to_string(),
            password_hash: None,
            role: Role::User,
            role_id: user_id,
            email_verified: true,
            last_login: None,
            created_at: now(),
        })
        .await
        .expect("seed account");

    account_id
}

/// Seed an organizer profile with the given status; returns the organizer id
pub async fn seed_organizer(db: &Surreal<Db>, status: OrganizerStatus) -> i64 {
    let sequences_svc = SequenceService::new(db.clone());
    let account_id = sequences_svc.next_value(sequences::ACCOUNTS).await.expect("seq");
    let organizer_id = sequences_svc.next_value(sequences::ORGANIZERS).await.expect("seq");

    OrganizerRepository::new(db.clone())
        .create(OrganizerProfile {
            id: None,
            organizer_id,
            account: RecordId::from_table_key("account", account_id),
            organization_name: format!("Org {organizer_id}"),
            contact_phone: None,
            website: None,
            social_links: None,
            logo: None,
            status,
            rejection_reason: None,
            event_count: 0,
            created_at: now(),
        })
        .await
        .expect("seed organizer");

    organizer_id
}

/// Seed a live event with one category and one ticket type
pub async fn seed_event(
    db: &Surreal<Db>,
    organizer_id: i64,
    price: Decimal,
    quantity: i64,
) -> Event {
    let sequences_svc = SequenceService::new(db.clone());
    let event_id = sequences_svc.next_value(sequences::EVENTS).await.expect("seq");
    let category_id = sequences_svc.next_value(sequences::CATEGORIES).await.expect("seq");
    let ticket_type_id = sequences_svc
        .next_value(sequences::TICKET_TYPES)
        .await
        .expect("seq");

    let created_at = now();
    EventRepository::new(db.clone())
        .create(Event {
            id: None,
            event_id,
            organizer: RecordId::from_table_key("organizer", organizer_id),
            organizer_id,
            title: format!("Event {event_id}"),
            description: None,
            banner: None,
            starts_at: created_at + 7 * 86_400_000,
            ends_at: created_at + 7 * 86_400_000 + 4 * 3_600_000,
            venue: "Main Hall".to_string(),
            location: None,
            genre: None,
            status: EventStatus::Live,
            rejection_reason: None,
            sale_starts_at: created_at - 3_600_000,
            sale_ends_at: created_at + 6 * 86_400_000,
            categories: vec![TicketCategory {
                category_id,
                name: "Standard".to_string(),
                kind: None,
                ticket_types: vec![TicketType {
                    ticket_type_id,
                    name: "General Admission".to_string(),
                    price,
                    quantity_total: quantity,
                    quantity_available: quantity,
                    max_per_order: 10,
                    banner: None,
                    pdf_template: None,
                }],
            }],
            artists: Vec::new(),
            created_at,
            updated_at: created_at,
        })
        .await
        .expect("seed event")
}

/// One-line cart for the event's single ticket type
pub fn cart(event: &Event, quantity: i64) -> OrderCreate {
    let ticket_type_id = event.categories[0].ticket_types[0].ticket_type_id;
    OrderCreate {
        items: vec![OrderItemInput {
            event_id: event.event_id,
            ticket_type_id,
            quantity,
            attendee: AttendeeInfo {
                name: "Alex Example".to_string(),
                email: "alex@example.com".to_string(),
                phone: None,
            },
        }],
    }
}
