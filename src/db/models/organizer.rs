//! Organizer profile model and moderation state machine

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use thiserror::Error;

/// Moderation status gating an organizer's visible actions.
///
/// Creating events and viewing analytics require `Approved`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrganizerStatus {
    Pending,
    Approved,
    Rejected,
}

impl OrganizerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrganizerStatus::Pending => "pending",
            OrganizerStatus::Approved => "approved",
            OrganizerStatus::Rejected => "rejected",
        }
    }
}

/// Illegal organizer status transitions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrganizerTransitionError {
    #[error("organizer is already approved")]
    AlreadyApproved,

    #[error("organizer is already rejected")]
    AlreadyRejected,

    #[error("cannot approve a rejected organizer")]
    ApproveRejected,
}

impl OrganizerStatus {
    /// Admin approval: pending -> approved.
    ///
    /// Approving an already-approved organizer is a conflict, not a silent
    /// no-op; rejected is terminal.
    pub fn approve(self) -> Result<OrganizerStatus, OrganizerTransitionError> {
        match self {
            OrganizerStatus::Pending => Ok(OrganizerStatus::Approved),
            OrganizerStatus::Approved => Err(OrganizerTransitionError::AlreadyApproved),
            OrganizerStatus::Rejected => Err(OrganizerTransitionError::ApproveRejected),
        }
    }

    /// Admin rejection: pending|approved -> rejected.
    pub fn reject(self) -> Result<OrganizerStatus, OrganizerTransitionError> {
        match self {
            OrganizerStatus::Pending | OrganizerStatus::Approved => Ok(OrganizerStatus::Rejected),
            OrganizerStatus::Rejected => Err(OrganizerTransitionError::AlreadyRejected),
        }
    }
}

/// Organizer profile record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizerProfile {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub organizer_id: i64,
    /// Owning master account
    #[serde(with = "serde_helpers::record_id")]
    pub account: RecordId,
    pub organization_name: String,
    pub contact_phone: Option<String>,
    pub website: Option<String>,
    pub social_links: Option<Vec<String>>,
    pub logo: Option<String>,
    pub status: OrganizerStatus,
    /// Reason supplied with the most recent rejection, if any
    pub rejection_reason: Option<String>,
    /// Denormalized count of owned events. Eventually consistent; list and
    /// read paths recompute it from the event table.
    #[serde(default)]
    pub event_count: i64,
    pub created_at: i64,
}

/// Organizer profile update payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizerUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social_links: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approve_from_pending() {
        assert_eq!(
            OrganizerStatus::Pending.approve(),
            Ok(OrganizerStatus::Approved)
        );
    }

    #[test]
    fn test_approve_already_approved_conflicts() {
        assert_eq!(
            OrganizerStatus::Approved.approve(),
            Err(OrganizerTransitionError::AlreadyApproved)
        );
    }

    #[test]
    fn test_rejected_is_terminal() {
        assert_eq!(
            OrganizerStatus::Rejected.approve(),
            Err(OrganizerTransitionError::ApproveRejected)
        );
        assert_eq!(
            OrganizerStatus::Rejected.reject(),
            Err(OrganizerTransitionError::AlreadyRejected)
        );
    }

    #[test]
    fn test_reject_from_pending_and_approved() {
        assert_eq!(
            OrganizerStatus::Pending.reject(),
            Ok(OrganizerStatus::Rejected)
        );
        assert_eq!(
            OrganizerStatus::Approved.reject(),
            Ok(OrganizerStatus::Rejected)
        );
    }
}
