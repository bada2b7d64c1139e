//! JWT token service
//!
//! Issues and validates the access tokens that front every authenticated
//! request. Claims carry the account id plus the role tag and role-specific
//! profile id supplied at login.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::models::Role;

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Signing secret (at least 32 bytes)
    pub secret: String,
    /// Token lifetime in minutes
    pub expiration_minutes: i64,
    /// Token issuer
    pub issuer: String,
    /// Token audience
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: load_jwt_secret(),
            expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1440),
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "gatepass".to_string()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "gatepass-clients".to_string()),
        }
    }
}

/// Claims stored in the token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Account id (subject)
    pub sub: String,
    /// Account email
    pub email: String,
    /// Role tag: user | organizer | admin
    pub role: String,
    /// Role-specific profile id
    pub role_id: i64,
    /// Token type
    pub token_type: String,
    /// Expiration timestamp
    pub exp: i64,
    /// Issued-at timestamp
    pub iat: i64,
    /// Issuer
    pub iss: String,
    /// Audience
    pub aud: String,
}

/// JWT errors
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    ExpiredToken,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Token generation failed: {0}")]
    GenerationFailed(String),
}

/// Load the signing secret from the environment.
///
/// In debug builds a random printable secret is generated when `JWT_SECRET`
/// is absent or too short; release builds refuse to start without one.
fn load_jwt_secret() -> String {
    match std::env::var("JWT_SECRET") {
        Ok(secret) if secret.len() >= 32 => secret,
        Ok(_) | Err(_) => {
            #[cfg(debug_assertions)]
            {
                tracing::warn!(
                    "JWT_SECRET not set or too short; generating temporary key for development"
                );
                generate_printable_secret()
            }
            #[cfg(not(debug_assertions))]
            {
                panic!("JWT_SECRET must be set to at least 32 characters in production");
            }
        }
    }
}

/// Generate a 64-character printable secret
fn generate_printable_secret() -> String {
    const ALLOWED: &[u8] =
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*()-_=+";

    let rng = SystemRandom::new();
    let mut key = String::with_capacity(64);
    for _ in 0..64 {
        let mut byte = [0u8; 1];
        if rng.fill(&mut byte).is_err() {
            return "GatepassDevelopmentFallbackKey-ReplaceBeforeDeploy".to_string();
        }
        let idx = (byte[0] as usize) % ALLOWED.len();
        key.push(ALLOWED[idx] as char);
    }
    key
}

/// JWT token service
#[derive(Debug, Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new() -> Self {
        Self::with_config(JwtConfig::default())
    }

    pub fn with_config(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Generate an access token for an authenticated account
    pub fn generate_token(
        &self,
        account_id: i64,
        email: &str,
        role: Role,
        role_id: i64,
    ) -> Result<String, JwtError> {
        let now = Utc::now();
        let expiration = now + Duration::minutes(self.config.expiration_minutes);

        let claims = Claims {
            sub: account_id.to_string(),
            email: email.to_string(),
            role: role.as_str().to_string(),
            role_id,
            token_type: "access".to_string(),
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// Validate and decode a token
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                ErrorKind::InvalidToken => JwtError::InvalidToken(e.to_string()),
                _ => JwtError::InvalidToken(format!("Token validation failed: {}", e)),
            }
        })?;

        Ok(token_data.claims)
    }

    /// Extract the bearer token from an Authorization header value
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}

impl Default for JwtService {
    fn default() -> Self {
        Self::new()
    }
}

/// Current authenticated identity, parsed from JWT claims.
///
/// Created by the auth middleware and injected into request extensions.
/// The server trusts this identity without re-verifying credentials.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// Master account id
    pub account_id: i64,
    /// Account email
    pub email: String,
    /// Role tag
    pub role: Role,
    /// Role-specific profile id (user/organizer/admin id)
    pub role_id: i64,
}

impl TryFrom<Claims> for CurrentUser {
    type Error = JwtError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let account_id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| JwtError::InvalidToken(format!("bad subject: {}", claims.sub)))?;
        let role = Role::parse(&claims.role)
            .ok_or_else(|| JwtError::InvalidToken(format!("unknown role: {}", claims.role)))?;

        Ok(Self {
            account_id,
            email: claims.email,
            role,
            role_id: claims.role_id,
        })
    }
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// The admin id, or 403
    pub fn require_admin(&self) -> Result<i64, crate::utils::AppError> {
        if self.is_admin() {
            Ok(self.role_id)
        } else {
            Err(crate::utils::AppError::forbidden("Admin role required"))
        }
    }

    /// The organizer id, or 403
    pub fn require_organizer(&self) -> Result<i64, crate::utils::AppError> {
        if self.role == Role::Organizer {
            Ok(self.role_id)
        } else {
            Err(crate::utils::AppError::forbidden("Organizer role required"))
        }
    }

    /// The user id, or 403
    pub fn require_user(&self) -> Result<i64, crate::utils::AppError> {
        if self.role == Role::User {
            Ok(self.role_id)
        } else {
            Err(crate::utils::AppError::forbidden("User role required"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> JwtService {
        JwtService::with_config(JwtConfig {
            secret: "test-secret-test-secret-test-secret-42".to_string(),
            expiration_minutes: 60,
            issuer: "gatepass".to_string(),
            audience: "gatepass-clients".to_string(),
        })
    }

    #[test]
    fn test_jwt_generation_and_validation() {
        let service = test_service();

        let token = service
            .generate_token(7, "organizer@example.com", Role::Organizer, 3)
            .expect("Failed to generate test token");

        let claims = service
            .validate_token(&token)
            .expect("Failed to validate test token");

        assert_eq!(claims.sub, "7");
        assert_eq!(claims.email, "organizer@example.com");
        assert_eq!(claims.role, "organizer");
        assert_eq!(claims.role_id, 3);
    }

    #[test]
    fn test_current_user_from_claims() {
        let service = test_service();
        let token = service
            .generate_token(11, "admin@example.com", Role::Admin, 1)
            .expect("Failed to generate test token");
        let claims = service.validate_token(&token).expect("validate");

        let user = CurrentUser::try_from(claims).expect("parse claims");
        assert_eq!(user.account_id, 11);
        assert!(user.is_admin());
        assert_eq!(user.require_admin().expect("admin id"), 1);
        assert!(user.require_organizer().is_err());
    }

    #[test]
    fn test_tampered_token_rejected() {
        let service = test_service();
        let token = service
            .generate_token(1, "user@example.com", Role::User, 1)
            .expect("generate");

        let mut tampered = token.clone();
        tampered.push('x');
        assert!(service.validate_token(&tampered).is_err());
    }
}
