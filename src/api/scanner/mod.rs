//! Ticket scanner API module

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/scanner", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/{pass_id}", get(handler::lookup))
        .route("/{pass_id}/validate", post(handler::validate))
}
