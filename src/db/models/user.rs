//! User profile model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// User profile record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub user_id: i64,
    /// Owning master account
    #[serde(with = "serde_helpers::record_id")]
    pub account: RecordId,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub profile_image: Option<String>,
    pub gender: Option<String>,
    /// Epoch millis
    pub date_of_birth: Option<i64>,
    pub created_at: i64,
}

/// User profile update payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<i64>,
}
