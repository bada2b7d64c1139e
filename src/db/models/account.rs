//! Master account model
//!
//! One authentication identity per person, fronting exactly one
//! role-specific profile (user, organizer, or admin). Email is globally
//! unique; `role` + `role_id` resolves to exactly one profile record.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Role tag discriminating the profile a master account fronts
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Organizer,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Organizer => "organizer",
            Role::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "user" => Some(Role::User),
            "organizer" => Some(Role::Organizer),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    /// Table name of the profile record this role points at
    pub fn profile_table(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Organizer => "organizer",
            Role::Admin => "admin",
        }
    }
}

/// Master account record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MasterAccount {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub account_id: i64,
    pub email: String,
    /// Argon2 hash; None for external-identity-provider-only accounts
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub role: Role,
    /// Id of the role-specific profile record
    pub role_id: i64,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub email_verified: bool,
    /// Epoch millis of the most recent login
    pub last_login: Option<i64>,
    pub created_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrip() {
        for role in [Role::User, Role::Organizer, Role::Admin] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("superuser"), None);
    }
}
