//! Auth API handlers
//!
//! Registration creates a master account plus its role profile in one
//! request; login verifies credentials and issues the access token the
//! rest of the API trusts.

use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

use crate::auth::{CurrentUser, password};
use crate::core::ServerState;
use crate::db::models::{
    MasterAccount, OrganizerProfile, OrganizerStatus, Role, UserProfile,
};
use crate::db::repository::{AccountRepository, OrganizerRepository, UserRepository};
use crate::db::sequence::sequences;
use crate::utils::validation::{MAX_NAME_LEN, validate_optional_text, validate_required_text};
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message, time};

/// Registration payload; `role` selects which profile is created
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    pub password: String,
    /// "user" or "organizer"; admin accounts are created by admins
    pub role: String,
    // User profile fields
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    // Organizer profile fields
    pub organization_name: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Identity summary returned by register/login/me
#[derive(Debug, Serialize)]
pub struct IdentityResponse {
    pub account_id: i64,
    pub email: String,
    pub role: String,
    pub role_id: i64,
    pub email_verified: bool,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub identity: IdentityResponse,
}

fn identity(account: &MasterAccount) -> IdentityResponse {
    IdentityResponse {
        account_id: account.account_id,
        email: account.email.clone(),
        role: account.role.as_str().to_string(),
        role_id: account.role_id,
        email_verified: account.email_verified,
    }
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<Json<AppResponse<TokenResponse>>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(format!("email: {e}")))?;
    password::validate_registration_password(&payload.password)?;

    let role = match Role::parse(&payload.role) {
        Some(Role::Admin) | None => {
            return Err(AppError::validation("role must be 'user' or 'organizer'"));
        }
        Some(role) => role,
    };

    let accounts = AccountRepository::new(state.db.clone());
    if accounts.find_by_email(&payload.email).await?.is_some() {
        return Err(AppError::conflict(format!(
            "account with email '{}' already exists",
            payload.email
        )));
    }

    let now = time::now_millis();
    let account_id = state.sequences.next_value(sequences::ACCOUNTS).await?;
    let account_ref = RecordId::from_table_key("account", account_id);

    // Create the role profile first, then the fronting account
    let role_id = if role == Role::User {
        let first_name = payload.first_name.clone().unwrap_or_default();
        validate_required_text(&first_name, "first_name", MAX_NAME_LEN)?;
        validate_optional_text(&payload.last_name, "last_name", MAX_NAME_LEN)?;

        let user_id = state.sequences.next_value(sequences::USERS).await?;
        UserRepository::new(state.db.clone())
            .create(UserProfile {
                id: None,
                user_id,
                account: account_ref.clone(),
                first_name,
                last_name: payload.last_name.clone().unwrap_or_default(),
                phone: payload.phone.clone(),
                profile_image: None,
                gender: None,
                date_of_birth: None,
                created_at: now,
            })
            .await?;
        user_id
    } else {
        let organization_name = payload.organization_name.clone().unwrap_or_default();
        validate_required_text(&organization_name, "organization_name", MAX_NAME_LEN)?;

        let organizer_id = state.sequences.next_value(sequences::ORGANIZERS).await?;
        OrganizerRepository::new(state.db.clone())
            .create(OrganizerProfile {
                id: None,
                organizer_id,
                account: account_ref.clone(),
                organization_name,
                contact_phone: payload.phone.clone(),
                website: payload.website.clone(),
                social_links: None,
                logo: None,
                status: OrganizerStatus::Pending,
                rejection_reason: None,
                event_count: 0,
                created_at: now,
            })
            .await?;
        organizer_id
    };

    let account = accounts
        .create(MasterAccount {
            id: None,
            account_id,
            email: payload.email.clone(),
            password_hash: Some(password::hash_password(&payload.password)?),
            role,
            role_id,
            email_verified: false,
            last_login: None,
            created_at: now,
        })
        .await?;

    let token = state
        .jwt_service
        .generate_token(account_id, &account.email, role, role_id)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    tracing::info!(account_id, role = role.as_str(), "account registered");

    Ok(ok_with_message(
        TokenResponse {
            token,
            identity: identity(&account),
        },
        "Account created",
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<AppResponse<TokenResponse>>> {
    let accounts = AccountRepository::new(state.db.clone());

    let account = accounts
        .find_by_email(&req.email)
        .await?
        .ok_or_else(AppError::invalid_credentials)?;

    let stored_hash = account
        .password_hash
        .as_deref()
        .ok_or_else(AppError::invalid_credentials)?;

    if !password::verify_password(&req.password, stored_hash)? {
        tracing::warn!(target: "security", email = %req.email, "failed login attempt");
        return Err(AppError::invalid_credentials());
    }

    let now = time::now_millis();
    accounts.update_last_login(account.account_id, now).await?;

    let token = state
        .jwt_service
        .generate_token(account.account_id, &account.email, account.role, account.role_id)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    tracing::info!(
        account_id = account.account_id,
        role = account.role.as_str(),
        "login"
    );

    Ok(ok(TokenResponse {
        token,
        identity: identity(&account),
    }))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<AppResponse<IdentityResponse>>> {
    let account = AccountRepository::new(state.db.clone())
        .find_by_id(user.account_id)
        .await?
        .ok_or_else(|| AppError::not_found("account not found"))?;

    Ok(ok(identity(&account)))
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

/// PUT /api/auth/password
pub async fn change_password(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<ChangePasswordRequest>,
) -> AppResult<Json<AppResponse<bool>>> {
    password::validate_new_password(&req.new_password)?;

    let accounts = AccountRepository::new(state.db.clone());
    let account = accounts
        .find_by_id(user.account_id)
        .await?
        .ok_or_else(|| AppError::not_found("account not found"))?;

    let stored_hash = account
        .password_hash
        .as_deref()
        .ok_or_else(|| AppError::validation("account has no password set"))?;

    if !password::verify_password(&req.old_password, stored_hash)? {
        return Err(AppError::invalid_credentials());
    }

    let new_hash = password::hash_password(&req.new_password)?;
    accounts.update_password(user.account_id, &new_hash).await?;

    Ok(ok_with_message(true, "Password updated"))
}

#[derive(Debug, Deserialize, Validate)]
pub struct ChangeEmailRequest {
    #[validate(email)]
    pub email: String,
}

/// PUT /api/auth/email
pub async fn change_email(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<ChangeEmailRequest>,
) -> AppResult<Json<AppResponse<bool>>> {
    req.validate()
        .map_err(|e| AppError::validation(format!("email: {e}")))?;

    AccountRepository::new(state.db.clone())
        .update_email(user.account_id, &req.email)
        .await?;

    Ok(ok_with_message(true, "Email updated"))
}
