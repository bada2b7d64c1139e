//! API route modules
//!
//! One module per resource, each exposing `router()`:
//!
//! - [`health`] - liveness check
//! - [`auth`] - registration, login, account management
//! - [`browse`] - public event discovery and catalogs
//! - [`users`] - user profile
//! - [`organizers`] - organizer profile and revenue dashboard
//! - [`events`] - organizer event management and per-event analytics
//! - [`orders`] - checkout, payment confirmation, purchased tickets
//! - [`scanner`] - ticket validation by pass id
//! - [`admin`] - moderation queues, platform dashboard, catalogs
//! - [`upload`] - image uploads and serving

pub mod admin;
pub mod auth;
pub mod browse;
pub mod events;
pub mod health;
pub mod orders;
pub mod organizers;
pub mod scanner;
pub mod upload;
pub mod users;

pub use crate::utils::{AppResponse, AppResult};

use crate::core::ServerState;
use crate::db::models::OrganizerProfile;
use crate::db::repository::{OrganizerRepository, RepoError};
use crate::utils::AppError;

/// Fetch an organizer profile, failing with 403 unless it is approved.
///
/// Event management, analytics and scanning are all gated on approval.
pub(crate) async fn require_approved_organizer(
    state: &ServerState,
    organizer_id: i64,
) -> AppResult<OrganizerProfile> {
    OrganizerRepository::new(state.db.clone())
        .find_approved(organizer_id)
        .await
        .map_err(|e| match e {
            RepoError::Validation(msg) => AppError::forbidden(msg),
            other => other.into(),
        })
}
