//! Ticket model
//!
//! One record per purchased unit, materialized when an order's payment
//! completes. The pass id is the external-facing lookup key used by the
//! scanner; it is distinct from the ticket id and unique across the system.
//! `is_validated` is monotonic (false -> true) and `validation_time` is set
//! exactly once.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Ticket record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub ticket_id: i64,
    /// Owning order
    #[serde(with = "serde_helpers::record_id")]
    pub order: RecordId,
    pub order_id: i64,
    /// Event reference, for reporting only; validation never mutates the
    /// event
    #[serde(with = "serde_helpers::record_id")]
    pub event: RecordId,
    pub event_id: i64,
    pub ticket_type_id: i64,
    pub ticket_type_name: String,
    /// External-facing lookup key (unique, indexed)
    pub pass_id: String,
    /// QR payload encoded on the printed ticket
    pub qr_code: String,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_validated: bool,
    /// Epoch millis of the validation transition
    pub validation_time: Option<i64>,
    pub attendee_name: String,
    pub attendee_email: String,
    pub attendee_phone: Option<String>,
    /// Generated ticket document, if one has been rendered
    pub document: Option<String>,
    pub created_at: i64,
}
