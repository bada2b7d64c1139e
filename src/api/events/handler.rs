//! Organizer event handlers
//!
//! All routes require an approved organizer; reads and mutations are
//! restricted to the organizer's own events. Inventory counters are set at
//! creation and only ever decremented by issuance.

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::Serialize;
use surrealdb::RecordId;

use crate::analytics;
use crate::api::require_approved_organizer;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{
    Event, EventCreate, EventStatus, EventUpdate, Ticket, TicketCategory, TicketType,
};
use crate::db::repository::{EventRepository, ReportRepository, TicketRepository};
use crate::db::sequence::sequences;
use crate::ticketing::money;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, MAX_TEXT_LEN, validate_optional_text,
    validate_required_text,
};
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message, time};

/// Fetch an event and verify it belongs to `organizer_id`
async fn find_owned_event(
    state: &ServerState,
    organizer_id: i64,
    event_id: i64,
) -> AppResult<Event> {
    let event = EventRepository::new(state.db.clone())
        .find_by_id(event_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("event {event_id} not found")))?;

    if event.organizer_id != organizer_id {
        return Err(AppError::forbidden("event belongs to another organizer"));
    }
    Ok(event)
}

/// Owned event with its sales rollup
#[derive(Debug, Serialize)]
pub struct EventWithSales {
    #[serde(flatten)]
    pub event: Event,
    pub sales: analytics::EventSales,
    pub sold_percentage: rust_decimal::Decimal,
}

/// GET /api/events - the organizer's events with best-effort sales
pub async fn list(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<AppResponse<Vec<EventWithSales>>>> {
    let organizer_id = user.require_organizer()?;
    require_approved_organizer(&state, organizer_id).await?;

    let events = EventRepository::new(state.db.clone())
        .list_by_organizer(organizer_id)
        .await?;
    let reports = ReportRepository::new(state.db.clone());

    let mut out = Vec::with_capacity(events.len());
    for event in events {
        let sales = match reports.completed_orders_for_event(event.event_id).await {
            Ok(orders) => analytics::sales_for_event(&orders, event.event_id),
            Err(e) => {
                tracing::warn!(event_id = event.event_id, error = %e, "sales rollup failed");
                analytics::EventSales::default()
            }
        };
        let sold_percentage =
            analytics::sold_percentage(sales.tickets_sold, event.total_capacity());
        out.push(EventWithSales {
            event,
            sales,
            sold_percentage,
        });
    }

    Ok(ok(out))
}

/// POST /api/events - create a draft event with its embedded inventory
pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<EventCreate>,
) -> AppResult<Json<AppResponse<Event>>> {
    let organizer_id = user.require_organizer()?;
    require_approved_organizer(&state, organizer_id).await?;

    validate_required_text(&payload.title, "title", MAX_NAME_LEN)?;
    validate_required_text(&payload.venue, "venue", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_TEXT_LEN)?;
    if payload.ends_at < payload.starts_at {
        return Err(AppError::validation("ends_at must not precede starts_at"));
    }
    if payload.sale_ends_at <= payload.sale_starts_at {
        return Err(AppError::validation("sale window must not be empty"));
    }
    if payload.categories.is_empty() {
        return Err(AppError::validation("event needs at least one ticket category"));
    }

    let mut categories: Vec<TicketCategory> = Vec::with_capacity(payload.categories.len());
    for category in &payload.categories {
        validate_required_text(&category.name, "category name", MAX_NAME_LEN)?;
        if category.ticket_types.is_empty() {
            return Err(AppError::validation(format!(
                "category '{}' needs at least one ticket type",
                category.name
            )));
        }

        let mut ticket_types: Vec<TicketType> = Vec::with_capacity(category.ticket_types.len());
        for tt in &category.ticket_types {
            validate_required_text(&tt.name, "ticket type name", MAX_NAME_LEN)?;
            money::validate_price(tt.price, "price")?;
            if tt.quantity <= 0 {
                return Err(AppError::validation(format!(
                    "ticket type '{}' quantity must be positive",
                    tt.name
                )));
            }
            let max_per_order = tt.max_per_order.unwrap_or(10);
            if max_per_order < 1 {
                return Err(AppError::validation("max_per_order must be at least 1"));
            }

            ticket_types.push(TicketType {
                ticket_type_id: state.sequences.next_value(sequences::TICKET_TYPES).await?,
                name: tt.name.clone(),
                price: tt.price,
                quantity_total: tt.quantity,
                quantity_available: tt.quantity,
                max_per_order,
                banner: tt.banner.clone(),
                pdf_template: tt.pdf_template.clone(),
            });
        }

        categories.push(TicketCategory {
            category_id: state.sequences.next_value(sequences::CATEGORIES).await?,
            name: category.name.clone(),
            kind: category.kind.clone(),
            ticket_types,
        });
    }

    let now = time::now_millis();
    let event_id = state.sequences.next_value(sequences::EVENTS).await?;
    let event = Event {
        id: None,
        event_id,
        organizer: RecordId::from_table_key("organizer", organizer_id),
        organizer_id,
        title: payload.title.clone(),
        description: payload.description.clone(),
        banner: payload.banner.clone(),
        starts_at: payload.starts_at,
        ends_at: payload.ends_at,
        venue: payload.venue.clone(),
        location: payload
            .location_id
            .map(|id| RecordId::from_table_key("location", id)),
        genre: payload
            .genre_id
            .map(|id| RecordId::from_table_key("genre", id)),
        status: EventStatus::Draft,
        rejection_reason: None,
        sale_starts_at: payload.sale_starts_at,
        sale_ends_at: payload.sale_ends_at,
        categories,
        artists: payload
            .artist_ids
            .iter()
            .map(|id| RecordId::from_table_key("artist", *id))
            .collect(),
        created_at: now,
        updated_at: now,
    };

    let created = EventRepository::new(state.db.clone()).create(event).await?;
    tracing::info!(event_id, organizer_id, "event created");
    Ok(ok_with_message(created, "Event created"))
}

/// GET /api/events/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(event_id): Path<i64>,
) -> AppResult<Json<AppResponse<EventWithSales>>> {
    let organizer_id = user.require_organizer()?;
    require_approved_organizer(&state, organizer_id).await?;
    let event = find_owned_event(&state, organizer_id, event_id).await?;

    let sales = match ReportRepository::new(state.db.clone())
        .completed_orders_for_event(event_id)
        .await
    {
        Ok(orders) => analytics::sales_for_event(&orders, event_id),
        Err(_) => analytics::EventSales::default(),
    };
    let sold_percentage = analytics::sold_percentage(sales.tickets_sold, event.total_capacity());

    Ok(ok(EventWithSales {
        event,
        sales,
        sold_percentage,
    }))
}

/// PUT /api/events/{id}
///
/// Structural fields (dates, venue, sale window, references) are editable
/// while the event is draft or pending; title, description and banner stay
/// editable until the event is completed or cancelled. Inventory is never
/// writable here.
pub async fn update(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(event_id): Path<i64>,
    Json(payload): Json<EventUpdate>,
) -> AppResult<Json<AppResponse<Event>>> {
    let organizer_id = user.require_organizer()?;
    require_approved_organizer(&state, organizer_id).await?;
    let event = find_owned_event(&state, organizer_id, event_id).await?;

    if matches!(event.status, EventStatus::Completed | EventStatus::Cancelled) {
        return Err(AppError::business_rule(format!(
            "a {} event cannot be edited",
            event.status.as_str()
        )));
    }

    let structural_change = payload.starts_at.is_some()
        || payload.ends_at.is_some()
        || payload.venue.is_some()
        || payload.location_id.is_some()
        || payload.genre_id.is_some()
        || payload.sale_starts_at.is_some()
        || payload.sale_ends_at.is_some()
        || payload.artist_ids.is_some();
    if structural_change
        && !matches!(event.status, EventStatus::Draft | EventStatus::Pending)
    {
        return Err(AppError::business_rule(format!(
            "structural fields of a {} event cannot change",
            event.status.as_str()
        )));
    }

    validate_optional_text(&payload.title, "title", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_TEXT_LEN)?;
    validate_optional_text(&payload.venue, "venue", MAX_SHORT_TEXT_LEN)?;

    #[derive(Serialize)]
    struct EventUpdateDb {
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        banner: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        starts_at: Option<i64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        ends_at: Option<i64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        venue: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        location: Option<RecordId>,
        #[serde(skip_serializing_if = "Option::is_none")]
        genre: Option<RecordId>,
        #[serde(skip_serializing_if = "Option::is_none")]
        sale_starts_at: Option<i64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        sale_ends_at: Option<i64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        artists: Option<Vec<RecordId>>,
        updated_at: i64,
    }

    let updated = EventRepository::new(state.db.clone())
        .merge_fields(
            event_id,
            EventUpdateDb {
                title: payload.title,
                description: payload.description,
                banner: payload.banner,
                starts_at: payload.starts_at,
                ends_at: payload.ends_at,
                venue: payload.venue,
                location: payload
                    .location_id
                    .map(|id| RecordId::from_table_key("location", id)),
                genre: payload
                    .genre_id
                    .map(|id| RecordId::from_table_key("genre", id)),
                sale_starts_at: payload.sale_starts_at,
                sale_ends_at: payload.sale_ends_at,
                artists: payload.artist_ids.map(|ids| {
                    ids.iter()
                        .map(|id| RecordId::from_table_key("artist", *id))
                        .collect()
                }),
                updated_at: time::now_millis(),
            },
        )
        .await?;

    Ok(ok(updated))
}

/// Apply an organizer-driven status transition and persist the result
async fn transition(
    state: &ServerState,
    user: &CurrentUser,
    event_id: i64,
    apply: impl Fn(EventStatus) -> Result<EventStatus, crate::db::models::EventTransitionError>,
) -> AppResult<Event> {
    let organizer_id = user.require_organizer()?;
    require_approved_organizer(state, organizer_id).await?;
    let event = find_owned_event(state, organizer_id, event_id).await?;

    let next = apply(event.status).map_err(|e| AppError::conflict(e.to_string()))?;
    let updated = EventRepository::new(state.db.clone())
        .set_status(event_id, next, event.rejection_reason.clone())
        .await?;

    tracing::info!(event_id, status = next.as_str(), "event status changed");
    Ok(updated)
}

/// POST /api/events/{id}/submit - draft -> pending
pub async fn submit(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(event_id): Path<i64>,
) -> AppResult<Json<AppResponse<Event>>> {
    let event = transition(&state, &user, event_id, EventStatus::submit).await?;
    Ok(ok_with_message(event, "Event submitted for review"))
}

/// POST /api/events/{id}/live - approved -> live
pub async fn go_live(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(event_id): Path<i64>,
) -> AppResult<Json<AppResponse<Event>>> {
    let event = transition(&state, &user, event_id, EventStatus::go_live).await?;
    Ok(ok_with_message(event, "Event is live"))
}

/// POST /api/events/{id}/complete - live -> completed
pub async fn complete(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(event_id): Path<i64>,
) -> AppResult<Json<AppResponse<Event>>> {
    let event = transition(&state, &user, event_id, EventStatus::complete).await?;
    Ok(ok_with_message(event, "Event completed"))
}

/// Per-event analytics for the organizer
#[derive(Debug, Serialize)]
pub struct EventAnalytics {
    pub event_id: i64,
    pub title: String,
    pub sales: analytics::EventSales,
    pub total_capacity: i64,
    pub sold_percentage: rust_decimal::Decimal,
    pub by_ticket_type: Vec<analytics::TicketTypeSales>,
}

/// GET /api/events/{id}/analytics
pub async fn event_analytics(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(event_id): Path<i64>,
) -> AppResult<Json<AppResponse<EventAnalytics>>> {
    let organizer_id = user.require_organizer()?;
    require_approved_organizer(&state, organizer_id).await?;
    let event = find_owned_event(&state, organizer_id, event_id).await?;

    let orders = ReportRepository::new(state.db.clone())
        .completed_orders_for_event(event_id)
        .await?;
    let sales = analytics::sales_for_event(&orders, event_id);
    let by_ticket_type = analytics::ticket_type_breakdown(&orders, event_id);
    let total_capacity = event.total_capacity();

    Ok(ok(EventAnalytics {
        event_id,
        title: event.title,
        sold_percentage: analytics::sold_percentage(sales.tickets_sold, total_capacity),
        total_capacity,
        sales,
        by_ticket_type,
    }))
}

/// GET /api/events/{id}/tickets - issued tickets for an owned event
pub async fn list_tickets(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(event_id): Path<i64>,
) -> AppResult<Json<AppResponse<Vec<Ticket>>>> {
    let organizer_id = user.require_organizer()?;
    require_approved_organizer(&state, organizer_id).await?;
    find_owned_event(&state, organizer_id, event_id).await?;

    let tickets = TicketRepository::new(state.db.clone())
        .list_by_event(event_id)
        .await?;
    Ok(ok(tickets))
}
