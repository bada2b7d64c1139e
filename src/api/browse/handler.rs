//! Public browse handlers
//!
//! Discovery is limited to approved/live events. Sales summaries on list
//! entries are best-effort: a failing sub-query degrades that entry to
//! zeros instead of failing the whole response.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::analytics;
use crate::core::ServerState;
use crate::db::models::{Artist, Event, Genre, Location, OrganizerProfile};
use crate::db::repository::{
    ArtistRepository, EventRepository, GenreRepository, LocationRepository, OrganizerRepository,
    ReportRepository,
};
use crate::utils::{AppError, AppResponse, AppResult, ok, time};

#[derive(Debug, Deserialize)]
pub struct BrowseQuery {
    pub genre_id: Option<i64>,
    pub location_id: Option<i64>,
    /// Title search
    pub q: Option<String>,
    /// Only events that have not started yet
    #[serde(default)]
    pub upcoming: bool,
}

/// Public list entry with availability and sales context
#[derive(Debug, Serialize)]
pub struct EventSummary {
    #[serde(flatten)]
    pub event: Event,
    pub tickets_sold: i64,
    pub sold_percentage: rust_decimal::Decimal,
}

/// Full public detail with joined references
#[derive(Debug, Serialize)]
pub struct EventDetail {
    #[serde(flatten)]
    pub event: Event,
    pub organizer_name: Option<String>,
    pub genre_name: Option<String>,
    pub location_name: Option<String>,
    pub artist_names: Vec<String>,
    pub tickets_sold: i64,
    pub sold_percentage: rust_decimal::Decimal,
}

/// GET /api/browse/events - public discovery with filters
pub async fn list_events(
    State(state): State<ServerState>,
    Query(query): Query<BrowseQuery>,
) -> AppResult<Json<AppResponse<Vec<EventSummary>>>> {
    let filter = crate::db::repository::event::EventFilter {
        genre_id: query.genre_id,
        location_id: query.location_id,
        q: query.q.clone(),
        upcoming_after: query.upcoming.then(time::now_millis),
    };

    let events = EventRepository::new(state.db.clone()).list_public(&filter).await?;
    let reports = ReportRepository::new(state.db.clone());

    let mut out = Vec::with_capacity(events.len());
    for event in events {
        // Degrade to zero sales rather than failing the list
        let sales = match reports.completed_orders_for_event(event.event_id).await {
            Ok(orders) => analytics::sales_for_event(&orders, event.event_id),
            Err(e) => {
                tracing::warn!(event_id = event.event_id, error = %e, "sales rollup failed");
                analytics::EventSales::default()
            }
        };
        let sold_percentage =
            analytics::sold_percentage(sales.tickets_sold, event.total_capacity());
        out.push(EventSummary {
            event,
            tickets_sold: sales.tickets_sold,
            sold_percentage,
        });
    }

    Ok(ok(out))
}

/// GET /api/browse/events/{id} - public detail with joined references
pub async fn event_detail(
    State(state): State<ServerState>,
    Path(event_id): Path<i64>,
) -> AppResult<Json<AppResponse<EventDetail>>> {
    let event = EventRepository::new(state.db.clone())
        .find_by_id(event_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("event {event_id} not found")))?;

    if !event.status.is_public() {
        return Err(AppError::not_found(format!("event {event_id} not found")));
    }

    let organizer_name = OrganizerRepository::new(state.db.clone())
        .find_by_id(event.organizer_id)
        .await
        .ok()
        .flatten()
        .map(|o: OrganizerProfile| o.organization_name);

    let genre_name = match &event.genre {
        Some(genre) => lookup_genre_name(&state, genre).await,
        None => None,
    };
    let location_name = match &event.location {
        Some(location) => lookup_location_name(&state, location).await,
        None => None,
    };

    let mut artist_names = Vec::new();
    let artists = ArtistRepository::new(state.db.clone());
    for artist_ref in &event.artists {
        if let Ok(id) = artist_ref.key().to_string().parse::<i64>()
            && let Ok(Some(artist)) = artists.find_by_id(id).await
        {
            artist_names.push(artist.name);
        }
    }

    let sales = match ReportRepository::new(state.db.clone())
        .completed_orders_for_event(event_id)
        .await
    {
        Ok(orders) => analytics::sales_for_event(&orders, event_id),
        Err(_) => analytics::EventSales::default(),
    };
    let sold_percentage = analytics::sold_percentage(sales.tickets_sold, event.total_capacity());

    Ok(ok(EventDetail {
        organizer_name,
        genre_name,
        location_name,
        artist_names,
        tickets_sold: sales.tickets_sold,
        sold_percentage,
        event,
    }))
}

async fn lookup_genre_name(state: &ServerState, genre: &surrealdb::RecordId) -> Option<String> {
    let id = genre.key().to_string().parse::<i64>().ok()?;
    GenreRepository::new(state.db.clone())
        .find_by_id(id)
        .await
        .ok()
        .flatten()
        .map(|g| g.name)
}

async fn lookup_location_name(
    state: &ServerState,
    location: &surrealdb::RecordId,
) -> Option<String> {
    let id = location.key().to_string().parse::<i64>().ok()?;
    LocationRepository::new(state.db.clone())
        .find_by_id(id)
        .await
        .ok()
        .flatten()
        .map(|l| l.name)
}

/// GET /api/browse/genres
pub async fn list_genres(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<Vec<Genre>>>> {
    Ok(ok(GenreRepository::new(state.db.clone()).find_all().await?))
}

/// GET /api/browse/locations
pub async fn list_locations(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<Vec<Location>>>> {
    Ok(ok(LocationRepository::new(state.db.clone()).find_all().await?))
}

/// GET /api/browse/artists
pub async fn list_artists(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<Vec<Artist>>>> {
    Ok(ok(ArtistRepository::new(state.db.clone()).find_all().await?))
}
