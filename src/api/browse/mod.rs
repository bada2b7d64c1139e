//! Public browse API module
//!
//! Unauthenticated event discovery and catalog reads; the auth middleware
//! skips everything under /api/browse/.

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/browse", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/events", get(handler::list_events))
        .route("/events/{id}", get(handler::event_detail))
        .route("/genres", get(handler::list_genres))
        .route("/locations", get(handler::list_locations))
        .route("/artists", get(handler::list_artists))
}
