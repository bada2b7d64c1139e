//! Authentication middleware
//!
//! Extracts and validates the JWT from `Authorization: Bearer <token>`,
//! then injects [`CurrentUser`] into request extensions.
//!
//! # Paths that skip authentication
//!
//! - `OPTIONS *` (CORS preflight)
//! - non-`/api/` paths (static uploads, 404s)
//! - `/api/health`
//! - `/api/auth/login`, `/api/auth/register`
//! - `/api/browse/*` (public event discovery)

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::{CurrentUser, JwtService};
use crate::core::ServerState;
use crate::utils::AppError;

fn is_public_api_route(path: &str) -> bool {
    path == "/api/health"
        || path == "/api/auth/login"
        || path == "/api/auth/register"
        || path.starts_with("/api/browse/")
}

/// Require a valid access token on protected API routes
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    // CORS preflight requests pass through
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    // Non-API routes (e.g. /uploads/*) are served without identity
    if !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    if is_public_api_route(path) {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => {
            JwtService::extract_from_header(header).ok_or(AppError::InvalidToken)?
        }
        None => {
            tracing::warn!(target: "security", uri = %req.uri(), "missing authorization header");
            return Err(AppError::Unauthorized);
        }
    };

    match state.jwt_service.validate_token(token) {
        Ok(claims) => {
            let user = CurrentUser::try_from(claims).map_err(|_| AppError::InvalidToken)?;
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        Err(e) => {
            tracing::warn!(target: "security", error = %e, uri = %req.uri(), "auth failed");
            match e {
                crate::auth::JwtError::ExpiredToken => Err(AppError::TokenExpired),
                _ => Err(AppError::InvalidToken),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_route_list() {
        assert!(is_public_api_route("/api/auth/login"));
        assert!(is_public_api_route("/api/auth/register"));
        assert!(is_public_api_route("/api/browse/events"));
        assert!(is_public_api_route("/api/health"));
        assert!(!is_public_api_route("/api/events"));
        assert!(!is_public_api_route("/api/orders"));
        assert!(!is_public_api_route("/api/auth/me"));
    }
}
