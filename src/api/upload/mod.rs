//! Upload API module
//!
//! POST /api/upload accepts multipart image uploads; GET /uploads/{file}
//! serves the stored files (public, skipped by the auth middleware).

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/upload", post(handler::upload))
        .route("/uploads/{filename}", get(handler::serve))
}
