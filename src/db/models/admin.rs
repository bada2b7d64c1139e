//! Admin profile model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Admin profile record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminProfile {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub admin_id: i64,
    /// Owning master account
    #[serde(with = "serde_helpers::record_id")]
    pub account: RecordId,
    pub display_name: String,
    pub created_at: i64,
}
