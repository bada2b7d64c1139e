//! HTTP server
//!
//! Router assembly and startup/shutdown handling.

use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::require_auth;
use crate::core::{Config, ServerState};

/// HTTP server
pub struct Server {
    config: Config,
    state: Option<ServerState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Create a server with pre-built state
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    /// Assemble the full application router
    pub fn build_router(state: ServerState) -> Router {
        Router::new()
            .merge(crate::api::health::router())
            .merge(crate::api::auth::router())
            .merge(crate::api::browse::router())
            .merge(crate::api::users::router())
            .merge(crate::api::organizers::router())
            .merge(crate::api::events::router())
            .merge(crate::api::orders::router())
            .merge(crate::api::scanner::router())
            .merge(crate::api::admin::router())
            .merge(crate::api::upload::router())
            .layer(middleware::from_fn_with_state(state.clone(), require_auth))
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    pub async fn run(&self) -> anyhow::Result<()> {
        let state = match &self.state {
            Some(s) => s.clone(),
            None => ServerState::initialize(&self.config).await?,
        };

        let app = Self::build_router(state);

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Gatepass server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                tracing::info!("Shutting down...");
            })
            .await?;

        Ok(())
    }
}
