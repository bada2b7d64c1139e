//! Admin API module
//!
//! Moderation queues, platform dashboard, account removal and catalog
//! management. Every route requires the admin role.

mod handler;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/admin", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/dashboard", get(handler::dashboard))
        .route("/organizers", get(handler::list_organizers))
        .route("/organizers/{id}/approve", post(handler::approve_organizer))
        .route("/organizers/{id}/reject", post(handler::reject_organizer))
        .route("/events", get(handler::list_events))
        .route("/events/{id}/approve", post(handler::approve_event))
        .route("/events/{id}/reject", post(handler::reject_event))
        .route("/accounts/{id}", delete(handler::remove_account))
        .route("/admins", post(handler::create_admin))
        .route("/genres", post(handler::create_genre))
        .route("/genres/{id}", delete(handler::delete_genre))
        .route("/locations", post(handler::create_location))
        .route("/locations/{id}", delete(handler::delete_location))
        .route("/artists", post(handler::create_artist))
        .route("/artists/{id}", delete(handler::delete_artist))
}
