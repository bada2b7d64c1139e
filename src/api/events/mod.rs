//! Organizer event management API module

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/events", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", get(handler::get_by_id).put(handler::update))
        .route("/{id}/submit", post(handler::submit))
        .route("/{id}/live", post(handler::go_live))
        .route("/{id}/complete", post(handler::complete))
        .route("/{id}/analytics", get(handler::event_analytics))
        .route("/{id}/tickets", get(handler::list_tickets))
}
