//! Event model: embedded ticket inventory and the moderation state machine
//!
//! Ticket categories and ticket types are embedded in the event document and
//! are not separately addressable rows; their ids are unique within the
//! parent event. `quantity_available` is decremented only by ticket
//! issuance, never through event updates.

use super::serde_helpers;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use thiserror::Error;

/// Event lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventStatus {
    Draft,
    Pending,
    Approved,
    Live,
    Completed,
    Cancelled,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Draft => "draft",
            EventStatus::Pending => "pending",
            EventStatus::Approved => "approved",
            EventStatus::Live => "live",
            EventStatus::Completed => "completed",
            EventStatus::Cancelled => "cancelled",
        }
    }

    /// Whether the event is visible in public discovery
    pub fn is_public(&self) -> bool {
        matches!(self, EventStatus::Approved | EventStatus::Live)
    }
}

/// Illegal event status transitions, one variant per distinct rejection
/// reason
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventTransitionError {
    #[error("event is already approved")]
    AlreadyApproved,

    #[error("event is already cancelled")]
    AlreadyCancelled,

    #[error("cannot approve a {0} event")]
    ApproveFrom(&'static str),

    #[error("cannot cancel a {0} event")]
    CancelFrom(&'static str),

    #[error("cannot submit a {0} event for review")]
    SubmitFrom(&'static str),

    #[error("only an approved event can go live, not a {0} one")]
    LiveFrom(&'static str),

    #[error("only a live event can be completed, not a {0} one")]
    CompleteFrom(&'static str),
}

impl EventStatus {
    /// Organizer submission for moderation: draft -> pending
    pub fn submit(self) -> Result<EventStatus, EventTransitionError> {
        match self {
            EventStatus::Draft => Ok(EventStatus::Pending),
            other => Err(EventTransitionError::SubmitFrom(other.as_str())),
        }
    }

    /// Admin approval: draft|pending -> approved
    pub fn approve(self) -> Result<EventStatus, EventTransitionError> {
        match self {
            EventStatus::Draft | EventStatus::Pending => Ok(EventStatus::Approved),
            EventStatus::Approved => Err(EventTransitionError::AlreadyApproved),
            other => Err(EventTransitionError::ApproveFrom(other.as_str())),
        }
    }

    /// Rejection / cancellation: draft|pending|approved -> cancelled.
    ///
    /// Live and completed events refuse cancellation.
    pub fn cancel(self) -> Result<EventStatus, EventTransitionError> {
        match self {
            EventStatus::Draft | EventStatus::Pending | EventStatus::Approved => {
                Ok(EventStatus::Cancelled)
            }
            EventStatus::Cancelled => Err(EventTransitionError::AlreadyCancelled),
            other => Err(EventTransitionError::CancelFrom(other.as_str())),
        }
    }

    /// Organizer go-live: approved -> live
    pub fn go_live(self) -> Result<EventStatus, EventTransitionError> {
        match self {
            EventStatus::Approved => Ok(EventStatus::Live),
            other => Err(EventTransitionError::LiveFrom(other.as_str())),
        }
    }

    /// Organizer completion: live -> completed
    pub fn complete(self) -> Result<EventStatus, EventTransitionError> {
        match self {
            EventStatus::Live => Ok(EventStatus::Completed),
            other => Err(EventTransitionError::CompleteFrom(other.as_str())),
        }
    }
}

/// A priced ticket offering with its own inventory counter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketType {
    /// Unique within the parent event
    pub ticket_type_id: i64,
    pub name: String,
    pub price: Decimal,
    /// Capacity set at creation; immutable afterwards
    pub quantity_total: i64,
    /// Remaining inventory; decremented by issuance only, never negative
    pub quantity_available: i64,
    pub max_per_order: i64,
    pub banner: Option<String>,
    pub pdf_template: Option<String>,
}

/// A named partition of an event's ticket offering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketCategory {
    /// Unique within the parent event
    pub category_id: i64,
    pub name: String,
    /// Category kind, e.g. "seated" / "standing"
    pub kind: Option<String>,
    pub ticket_types: Vec<TicketType>,
}

/// Event record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub event_id: i64,
    /// Owning organizer profile
    #[serde(with = "serde_helpers::record_id")]
    pub organizer: RecordId,
    pub organizer_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub banner: Option<String>,
    /// Epoch millis
    pub starts_at: i64,
    pub ends_at: i64,
    pub venue: String,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "serde_helpers::option_record_id")]
    pub location: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "serde_helpers::option_record_id")]
    pub genre: Option<RecordId>,
    pub status: EventStatus,
    /// Reason supplied with an admin rejection, if any
    pub rejection_reason: Option<String>,
    /// Ticket-sale window (epoch millis)
    pub sale_starts_at: i64,
    pub sale_ends_at: i64,
    pub categories: Vec<TicketCategory>,
    #[serde(default, with = "serde_helpers::vec_record_id")]
    pub artists: Vec<RecordId>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Event {
    /// Find a ticket type embedded in this event
    pub fn ticket_type(&self, ticket_type_id: i64) -> Option<(&TicketCategory, &TicketType)> {
        self.categories.iter().find_map(|c| {
            c.ticket_types
                .iter()
                .find(|t| t.ticket_type_id == ticket_type_id)
                .map(|t| (c, t))
        })
    }

    /// Mutable lookup used by issuance to decrement availability
    pub fn ticket_type_mut(&mut self, ticket_type_id: i64) -> Option<&mut TicketType> {
        self.categories.iter_mut().find_map(|c| {
            c.ticket_types
                .iter_mut()
                .find(|t| t.ticket_type_id == ticket_type_id)
        })
    }

    /// Total capacity across all ticket types
    pub fn total_capacity(&self) -> i64 {
        self.categories
            .iter()
            .flat_map(|c| c.ticket_types.iter())
            .map(|t| t.quantity_total)
            .sum()
    }
}

// ========== Create / update payloads ==========

#[derive(Debug, Clone, Deserialize)]
pub struct TicketTypeCreate {
    pub name: String,
    pub price: Decimal,
    pub quantity: i64,
    pub max_per_order: Option<i64>,
    pub banner: Option<String>,
    pub pdf_template: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TicketCategoryCreate {
    pub name: String,
    pub kind: Option<String>,
    pub ticket_types: Vec<TicketTypeCreate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventCreate {
    pub title: String,
    pub description: Option<String>,
    pub banner: Option<String>,
    pub starts_at: i64,
    pub ends_at: i64,
    pub venue: String,
    pub location_id: Option<i64>,
    pub genre_id: Option<i64>,
    pub sale_starts_at: i64,
    pub sale_ends_at: i64,
    pub categories: Vec<TicketCategoryCreate>,
    #[serde(default)]
    pub artist_ids: Vec<i64>,
}

/// Field-level event update; inventory counters are not writable here
#[derive(Debug, Clone, Deserialize)]
pub struct EventUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub banner: Option<String>,
    pub starts_at: Option<i64>,
    pub ends_at: Option<i64>,
    pub venue: Option<String>,
    pub location_id: Option<i64>,
    pub genre_id: Option<i64>,
    pub sale_starts_at: Option<i64>,
    pub sale_ends_at: Option<i64>,
    pub artist_ids: Option<Vec<i64>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    // The full (state, action) transition table for approve and cancel.

    #[test]
    fn test_approve_transition_table() {
        assert_eq!(EventStatus::Draft.approve(), Ok(EventStatus::Approved));
        assert_eq!(EventStatus::Pending.approve(), Ok(EventStatus::Approved));
        assert_eq!(
            EventStatus::Approved.approve(),
            Err(EventTransitionError::AlreadyApproved)
        );
        assert_eq!(
            EventStatus::Live.approve(),
            Err(EventTransitionError::ApproveFrom("live"))
        );
        assert_eq!(
            EventStatus::Completed.approve(),
            Err(EventTransitionError::ApproveFrom("completed"))
        );
        assert_eq!(
            EventStatus::Cancelled.approve(),
            Err(EventTransitionError::ApproveFrom("cancelled"))
        );
    }

    #[test]
    fn test_cancel_transition_table() {
        assert_eq!(EventStatus::Draft.cancel(), Ok(EventStatus::Cancelled));
        assert_eq!(EventStatus::Pending.cancel(), Ok(EventStatus::Cancelled));
        assert_eq!(EventStatus::Approved.cancel(), Ok(EventStatus::Cancelled));
        assert_eq!(
            EventStatus::Live.cancel(),
            Err(EventTransitionError::CancelFrom("live"))
        );
        assert_eq!(
            EventStatus::Completed.cancel(),
            Err(EventTransitionError::CancelFrom("completed"))
        );
        assert_eq!(
            EventStatus::Cancelled.cancel(),
            Err(EventTransitionError::AlreadyCancelled)
        );
    }

    #[test]
    fn test_distinct_rejection_reasons_name_the_state() {
        let live = EventStatus::Live.approve().unwrap_err().to_string();
        let done = EventStatus::Completed.approve().unwrap_err().to_string();
        assert_ne!(live, done);
        assert!(live.contains("live"));
        assert!(done.contains("completed"));
    }

    #[test]
    fn test_forward_progression() {
        let status = EventStatus::Draft;
        let status = status.submit().expect("draft submits");
        let status = status.approve().expect("pending approves");
        let status = status.go_live().expect("approved goes live");
        let status = status.complete().expect("live completes");
        assert_eq!(status, EventStatus::Completed);
    }

    #[test]
    fn test_go_live_requires_approved() {
        assert_eq!(
            EventStatus::Draft.go_live(),
            Err(EventTransitionError::LiveFrom("draft"))
        );
        assert_eq!(
            EventStatus::Pending.go_live(),
            Err(EventTransitionError::LiveFrom("pending"))
        );
        assert_eq!(EventStatus::Approved.go_live(), Ok(EventStatus::Live));
    }

    #[test]
    fn test_complete_requires_live() {
        assert_eq!(
            EventStatus::Approved.complete(),
            Err(EventTransitionError::CompleteFrom("approved"))
        );
        assert_eq!(EventStatus::Live.complete(), Ok(EventStatus::Completed));
    }

    #[test]
    fn test_submit_requires_draft() {
        assert_eq!(EventStatus::Draft.submit(), Ok(EventStatus::Pending));
        assert_eq!(
            EventStatus::Pending.submit(),
            Err(EventTransitionError::SubmitFrom("pending"))
        );
    }
}
