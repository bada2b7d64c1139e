//! Auth API module

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/auth", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/register", post(handler::register))
        .route("/login", post(handler::login))
        .route("/me", get(handler::me))
        .route("/password", put(handler::change_password))
        .route("/email", put(handler::change_email))
}
