//! User profile handlers

use axum::{Extension, Json, extract::State};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{UserProfile, UserUpdate};
use crate::db::repository::UserRepository;
use crate::utils::validation::{MAX_NAME_LEN, validate_optional_text};
use crate::utils::{AppError, AppResponse, AppResult, ok};

/// GET /api/users/me
pub async fn profile(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<AppResponse<UserProfile>>> {
    let user_id = user.require_user()?;
    let profile = UserRepository::new(state.db.clone())
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::not_found("user profile not found"))?;
    Ok(ok(profile))
}

/// PUT /api/users/me
pub async fn update_profile(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<UserUpdate>,
) -> AppResult<Json<AppResponse<UserProfile>>> {
    let user_id = user.require_user()?;

    validate_optional_text(&payload.first_name, "first_name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.last_name, "last_name", MAX_NAME_LEN)?;

    let profile = UserRepository::new(state.db.clone())
        .update(user_id, payload)
        .await?;
    Ok(ok(profile))
}
