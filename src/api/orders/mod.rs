//! Order API module

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        // Static segment before /{id} so "tickets" never parses as an id
        .route("/tickets", get(handler::my_tickets))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/payment/complete", post(handler::complete_payment))
        .route("/{id}/payment/fail", post(handler::fail_payment))
}
