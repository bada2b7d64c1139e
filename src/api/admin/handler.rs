//! Admin handlers
//!
//! Moderation decisions run through the status state machines; an illegal
//! (state, action) pair surfaces as a conflict with the state named in the
//! message. Rejection reasons are persisted on the record and echoed back.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

use crate::analytics;
use crate::auth::{CurrentUser, password};
use crate::core::ServerState;
use crate::db::models::{
    AdminProfile, Artist, Event, EventStatus, Genre, Location, MasterAccount, OrganizerProfile,
    OrganizerStatus, Role,
};
use crate::db::repository::{
    AccountRepository, AdminRepository, ArtistRepository, EventRepository, GenreRepository,
    LocationRepository, OrganizerRepository, ReportRepository, UserRepository,
};
use crate::db::sequence::sequences;
use crate::utils::validation::{MAX_NAME_LEN, MAX_TEXT_LEN, validate_optional_text, validate_required_text};
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message, time};

// ============================================================================
// Moderation queues
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub status: Option<String>,
}

fn parse_organizer_status(s: &str) -> AppResult<OrganizerStatus> {
    match s {
        "pending" => Ok(OrganizerStatus::Pending),
        "approved" => Ok(OrganizerStatus::Approved),
        "rejected" => Ok(OrganizerStatus::Rejected),
        other => Err(AppError::validation(format!(
            "unknown organizer status '{other}'"
        ))),
    }
}

fn parse_event_status(s: &str) -> AppResult<EventStatus> {
    match s {
        "draft" => Ok(EventStatus::Draft),
        "pending" => Ok(EventStatus::Pending),
        "approved" => Ok(EventStatus::Approved),
        "live" => Ok(EventStatus::Live),
        "completed" => Ok(EventStatus::Completed),
        "cancelled" => Ok(EventStatus::Cancelled),
        other => Err(AppError::validation(format!("unknown event status '{other}'"))),
    }
}

/// GET /api/admin/organizers?status=pending
pub async fn list_organizers(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<StatusQuery>,
) -> AppResult<Json<AppResponse<Vec<OrganizerProfile>>>> {
    user.require_admin()?;
    let status = query
        .status
        .as_deref()
        .map(parse_organizer_status)
        .transpose()?;
    let repo = OrganizerRepository::new(state.db.clone());
    let mut organizers = repo.list_by_status(status).await?;

    // The stored event_count is a cache; recompute it for the queue view
    for organizer in &mut organizers {
        if let Ok(count) = repo.recompute_event_count(organizer.organizer_id).await {
            organizer.event_count = count;
        }
    }

    Ok(ok(organizers))
}

/// GET /api/admin/events?status=pending
pub async fn list_events(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<StatusQuery>,
) -> AppResult<Json<AppResponse<Vec<Event>>>> {
    user.require_admin()?;
    let status = query.status.as_deref().map(parse_event_status).transpose()?;
    let events = EventRepository::new(state.db.clone())
        .list_by_status(status)
        .await?;
    Ok(ok(events))
}

// ============================================================================
// Moderation decisions
// ============================================================================

/// Optional free-text reason accompanying a moderation decision
#[derive(Debug, Default, Deserialize)]
pub struct ModerationRequest {
    pub reason: Option<String>,
}

/// Decision response: the updated record plus the echoed reason
#[derive(Debug, Serialize)]
pub struct Moderated<T> {
    #[serde(flatten)]
    pub record: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// POST /api/admin/organizers/{id}/approve
pub async fn approve_organizer(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(organizer_id): Path<i64>,
) -> AppResult<Json<AppResponse<OrganizerProfile>>> {
    user.require_admin()?;
    let organizers = OrganizerRepository::new(state.db.clone());

    let organizer = organizers
        .find_by_id(organizer_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("organizer {organizer_id} not found")))?;

    let next = organizer
        .status
        .approve()
        .map_err(|e| AppError::conflict(e.to_string()))?;

    let updated = organizers.set_status(organizer_id, next, None).await?;
    tracing::info!(organizer_id, "organizer approved");
    Ok(ok_with_message(updated, "Organizer approved"))
}

/// POST /api/admin/organizers/{id}/reject
pub async fn reject_organizer(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(organizer_id): Path<i64>,
    Json(payload): Json<ModerationRequest>,
) -> AppResult<Json<AppResponse<Moderated<OrganizerProfile>>>> {
    user.require_admin()?;
    validate_optional_text(&payload.reason, "reason", MAX_TEXT_LEN)?;
    let organizers = OrganizerRepository::new(state.db.clone());

    let organizer = organizers
        .find_by_id(organizer_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("organizer {organizer_id} not found")))?;

    let next = organizer
        .status
        .reject()
        .map_err(|e| AppError::conflict(e.to_string()))?;

    let updated = organizers
        .set_status(organizer_id, next, payload.reason.clone())
        .await?;
    tracing::info!(organizer_id, "organizer rejected");
    Ok(ok_with_message(
        Moderated {
            record: updated,
            reason: payload.reason,
        },
        "Organizer rejected",
    ))
}

/// POST /api/admin/events/{id}/approve
pub async fn approve_event(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(event_id): Path<i64>,
) -> AppResult<Json<AppResponse<Event>>> {
    user.require_admin()?;
    let events = EventRepository::new(state.db.clone());

    let event = events
        .find_by_id(event_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("event {event_id} not found")))?;

    let next = event
        .status
        .approve()
        .map_err(|e| AppError::conflict(e.to_string()))?;

    let updated = events.set_status(event_id, next, None).await?;
    tracing::info!(event_id, "event approved");
    Ok(ok_with_message(updated, "Event approved"))
}

/// POST /api/admin/events/{id}/reject - modeled as a transition to cancelled
pub async fn reject_event(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(event_id): Path<i64>,
    Json(payload): Json<ModerationRequest>,
) -> AppResult<Json<AppResponse<Moderated<Event>>>> {
    user.require_admin()?;
    validate_optional_text(&payload.reason, "reason", MAX_TEXT_LEN)?;
    let events = EventRepository::new(state.db.clone());

    let event = events
        .find_by_id(event_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("event {event_id} not found")))?;

    let next = event
        .status
        .cancel()
        .map_err(|e| AppError::conflict(e.to_string()))?;

    let updated = events
        .set_status(event_id, next, payload.reason.clone())
        .await?;
    tracing::info!(event_id, "event rejected");
    Ok(ok_with_message(
        Moderated {
            record: updated,
            reason: payload.reason,
        },
        "Event rejected",
    ))
}

// ============================================================================
// Platform dashboard
// ============================================================================

#[derive(Debug, Serialize)]
pub struct PlatformDashboard {
    pub total_accounts: i64,
    pub total_events: i64,
    pub total_orders: i64,
    pub total_tickets: i64,
    pub pending_organizers: usize,
    pub pending_events: usize,
    pub total_revenue: Decimal,
    pub month_over_month: Decimal,
    pub monthly: Vec<analytics::MonthBucket>,
}

/// GET /api/admin/dashboard - platform-wide rollup
pub async fn dashboard(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<AppResponse<PlatformDashboard>>> {
    user.require_admin()?;
    let reports = ReportRepository::new(state.db.clone());

    let completed = reports.completed_orders().await?;
    let total_revenue: Decimal = completed.iter().map(|o| o.total_amount).sum();
    let monthly = analytics::monthly_buckets(&completed, Utc::now(), state.config.analytics_months);
    let month_over_month = match monthly.as_slice() {
        [.., previous, current] => analytics::change_percentage(current.revenue, previous.revenue),
        _ => Decimal::ZERO,
    };

    let pending_organizers = OrganizerRepository::new(state.db.clone())
        .list_by_status(Some(OrganizerStatus::Pending))
        .await?
        .len();
    let pending_events = EventRepository::new(state.db.clone())
        .list_by_status(Some(EventStatus::Pending))
        .await?
        .len();

    Ok(ok(PlatformDashboard {
        total_accounts: reports.count_table("account").await?,
        total_events: reports.count_table("event").await?,
        total_orders: reports.count_table("order").await?,
        total_tickets: reports.count_table("ticket").await?,
        pending_organizers,
        pending_events,
        total_revenue,
        month_over_month,
        monthly,
    }))
}

// ============================================================================
// Accounts
// ============================================================================

/// DELETE /api/admin/accounts/{id} - remove an account and its profile
pub async fn remove_account(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(account_id): Path<i64>,
) -> AppResult<Json<AppResponse<bool>>> {
    user.require_admin()?;

    let accounts = AccountRepository::new(state.db.clone());
    let account = accounts
        .find_by_id(account_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("account {account_id} not found")))?;

    match account.role {
        Role::User => {
            UserRepository::new(state.db.clone())
                .delete(account.role_id)
                .await?;
        }
        Role::Organizer => {
            OrganizerRepository::new(state.db.clone())
                .delete(account.role_id)
                .await?;
        }
        Role::Admin => {
            AdminRepository::new(state.db.clone())
                .delete(account.role_id)
                .await?;
        }
    }

    let removed = accounts.delete(account_id).await?;
    tracing::info!(account_id, role = account.role.as_str(), "account removed");
    Ok(ok_with_message(removed, "Account removed"))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateAdminRequest {
    #[validate(email)]
    pub email: String,
    pub password: String,
    pub display_name: String,
}

/// POST /api/admin/admins - create another admin account
pub async fn create_admin(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<CreateAdminRequest>,
) -> AppResult<Json<AppResponse<MasterAccount>>> {
    user.require_admin()?;
    payload
        .validate()
        .map_err(|e| AppError::validation(format!("email: {e}")))?;
    password::validate_new_password(&payload.password)?;
    validate_required_text(&payload.display_name, "display_name", MAX_NAME_LEN)?;

    let accounts = AccountRepository::new(state.db.clone());
    if accounts.find_by_email(&payload.email).await?.is_some() {
        return Err(AppError::conflict(format!(
            "account with email '{}' already exists",
            payload.email
        )));
    }

    let now = time::now_millis();
    let account_id = state.sequences.next_value(sequences::ACCOUNTS).await?;
    let admin_id = state.sequences.next_value(sequences::ADMINS).await?;

    AdminRepository::new(state.db.clone())
        .create(AdminProfile {
            id: None,
            admin_id,
            account: RecordId::from_table_key("account", account_id),
            display_name: payload.display_name.clone(),
            created_at: now,
        })
        .await?;

    let account = accounts
        .create(MasterAccount {
            id: None,
            account_id,
            email: payload.email.clone(),
            password_hash: Some(password::hash_password(&payload.password)?),
            role: Role::Admin,
            role_id: admin_id,
            email_verified: true,
            last_login: None,
            created_at: now,
        })
        .await?;

    tracing::info!(account_id, admin_id, "admin account created");
    Ok(ok_with_message(account, "Admin created"))
}

// ============================================================================
// Catalogs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CatalogRequest {
    pub name: String,
    pub country: Option<String>,
    pub image: Option<String>,
}

/// POST /api/admin/genres
pub async fn create_genre(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<CatalogRequest>,
) -> AppResult<Json<AppResponse<Genre>>> {
    user.require_admin()?;
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;

    let genre_id = state.sequences.next_value(sequences::GENRES).await?;
    let genre = GenreRepository::new(state.db.clone())
        .create(Genre {
            id: None,
            genre_id,
            name: payload.name,
            created_at: time::now_millis(),
        })
        .await?;
    Ok(ok(genre))
}

/// DELETE /api/admin/genres/{id}
pub async fn delete_genre(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(genre_id): Path<i64>,
) -> AppResult<Json<AppResponse<bool>>> {
    user.require_admin()?;
    let removed = GenreRepository::new(state.db.clone()).delete(genre_id).await?;
    Ok(ok(removed))
}

/// POST /api/admin/locations
pub async fn create_location(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<CatalogRequest>,
) -> AppResult<Json<AppResponse<Location>>> {
    user.require_admin()?;
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;

    let location_id = state.sequences.next_value(sequences::LOCATIONS).await?;
    let location = LocationRepository::new(state.db.clone())
        .create(Location {
            id: None,
            location_id,
            name: payload.name,
            country: payload.country,
            created_at: time::now_millis(),
        })
        .await?;
    Ok(ok(location))
}

/// DELETE /api/admin/locations/{id}
pub async fn delete_location(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(location_id): Path<i64>,
) -> AppResult<Json<AppResponse<bool>>> {
    user.require_admin()?;
    let removed = LocationRepository::new(state.db.clone())
        .delete(location_id)
        .await?;
    Ok(ok(removed))
}

/// POST /api/admin/artists
pub async fn create_artist(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<CatalogRequest>,
) -> AppResult<Json<AppResponse<Artist>>> {
    user.require_admin()?;
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;

    let artist_id = state.sequences.next_value(sequences::ARTISTS).await?;
    let artist = ArtistRepository::new(state.db.clone())
        .create(Artist {
            id: None,
            artist_id,
            name: payload.name,
            image: payload.image,
            created_at: time::now_millis(),
        })
        .await?;
    Ok(ok(artist))
}

/// DELETE /api/admin/artists/{id}
pub async fn delete_artist(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(artist_id): Path<i64>,
) -> AppResult<Json<AppResponse<bool>>> {
    user.require_admin()?;
    let removed = ArtistRepository::new(state.db.clone())
        .delete(artist_id)
        .await?;
    Ok(ok(removed))
}
