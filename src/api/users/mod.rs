//! User profile API module

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/users", routes())
}

fn routes() -> Router<ServerState> {
    Router::new().route("/me", get(handler::profile).put(handler::update_profile))
}
