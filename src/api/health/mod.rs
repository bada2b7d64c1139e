//! Health check

use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::core::ServerState;

#[derive(Serialize)]
struct Health {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<Health> {
    Json(Health {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/health", get(health))
}
