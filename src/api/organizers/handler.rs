//! Organizer profile and revenue dashboard handlers

use std::collections::{HashMap, HashSet};

use axum::{Extension, Json, extract::State};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::analytics;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{OrganizerProfile, OrganizerUpdate};
use crate::db::repository::{
    EventRepository, GenreRepository, OrganizerRepository, ReportRepository,
};
use crate::utils::validation::{MAX_NAME_LEN, validate_optional_text};
use crate::utils::{AppError, AppResponse, AppResult, ok};

/// GET /api/organizers/me
pub async fn profile(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<AppResponse<OrganizerProfile>>> {
    let organizer_id = user.require_organizer()?;
    let organizers = OrganizerRepository::new(state.db.clone());

    let mut profile = organizers
        .find_by_id(organizer_id)
        .await?
        .ok_or_else(|| AppError::not_found("organizer profile not found"))?;

    // The stored event_count is a cache; recompute on read
    profile.event_count = organizers.recompute_event_count(organizer_id).await?;

    Ok(ok(profile))
}

/// PUT /api/organizers/me
pub async fn update_profile(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<OrganizerUpdate>,
) -> AppResult<Json<AppResponse<OrganizerProfile>>> {
    let organizer_id = user.require_organizer()?;

    validate_optional_text(&payload.organization_name, "organization_name", MAX_NAME_LEN)?;

    let profile = OrganizerRepository::new(state.db.clone())
        .update(organizer_id, payload)
        .await?;
    Ok(ok(profile))
}

#[derive(Debug, Serialize)]
pub struct TopEvent {
    pub event_id: i64,
    pub title: String,
    pub revenue: Decimal,
    pub tickets_sold: i64,
}

/// Organizer revenue dashboard
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub summary: analytics::OrganizerSummary,
    /// Revenue change of the current month vs the previous one (percent)
    pub month_over_month: Decimal,
    /// Trailing monthly series, oldest first, zero-filled
    pub monthly: Vec<analytics::MonthBucket>,
    /// Events ranked by revenue, best first
    pub top_events: Vec<TopEvent>,
    pub genre_split: Vec<analytics::GenreRevenue>,
    pub event_count: i64,
}

/// GET /api/organizers/dashboard
///
/// Revenue analytics across all owned events; approval required.
pub async fn dashboard(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<AppResponse<DashboardResponse>>> {
    let organizer_id = user.require_organizer()?;
    crate::api::require_approved_organizer(&state, organizer_id).await?;
    let organizers = OrganizerRepository::new(state.db.clone());

    let events = EventRepository::new(state.db.clone())
        .list_by_organizer(organizer_id)
        .await?;
    let owned: HashSet<i64> = events.iter().map(|e| e.event_id).collect();

    let all_completed = ReportRepository::new(state.db.clone()).completed_orders().await?;
    let orders = analytics::filter_orders_to_events(&all_completed, &owned);

    let by_event = analytics::aggregate_by_event(&orders);
    let summary = analytics::organizer_summary(&by_event);

    let monthly = analytics::monthly_buckets(&orders, Utc::now(), state.config.analytics_months);
    let month_over_month = match monthly.as_slice() {
        [.., previous, current] => {
            analytics::change_percentage(current.revenue, previous.revenue)
        }
        _ => Decimal::ZERO,
    };

    let mut top_events: Vec<TopEvent> = by_event
        .iter()
        .map(|(event_id, sales)| TopEvent {
            event_id: *event_id,
            title: events
                .iter()
                .find(|e| e.event_id == *event_id)
                .map(|e| e.title.clone())
                .unwrap_or_default(),
            revenue: sales.revenue,
            tickets_sold: sales.tickets_sold,
        })
        .collect();
    top_events.sort_by(|a, b| b.revenue.cmp(&a.revenue));
    top_events.truncate(10);

    // Map owned events to genre names for the split
    let genres = GenreRepository::new(state.db.clone()).find_all().await?;
    let genre_names: HashMap<String, String> = genres
        .into_iter()
        .map(|g| (g.genre_id.to_string(), g.name))
        .collect();
    let event_genres: HashMap<i64, String> = events
        .iter()
        .filter_map(|e| {
            let genre_key = e.genre.as_ref()?.key().to_string();
            Some((e.event_id, genre_names.get(&genre_key)?.clone()))
        })
        .collect();
    let genre_split = analytics::aggregate_by_genre(&orders, &event_genres);

    let event_count = organizers.recompute_event_count(organizer_id).await?;

    Ok(ok(DashboardResponse {
        summary,
        month_over_month,
        monthly,
        top_events,
        genre_split,
        event_count,
    }))
}
