//! Ticket scanner handlers
//!
//! Lookup and validation by pass id. Validation is idempotent in the
//! failure-signalling sense: the first scan succeeds, every later scan of
//! the same pass returns a distinct already-validated conflict and leaves
//! the original validation_time untouched.

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::Serialize;

use crate::api::require_approved_organizer;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Event, Role, Ticket};
use crate::db::repository::{EventRepository, TicketRepository};
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message, time};

/// Scanner view of a ticket with its event and ticket-type context
#[derive(Debug, Serialize)]
pub struct ScanView {
    pub ticket: Ticket,
    pub event_title: String,
    pub event_starts_at: i64,
    pub venue: String,
    pub ticket_type_name: String,
}

/// Resolve the ticket for a pass id and authorize the caller: only an
/// approved organizer owning the ticket's event (or an admin) may see or
/// validate it.
async fn authorized_ticket(
    state: &ServerState,
    user: &CurrentUser,
    pass_id: &str,
) -> AppResult<(Ticket, Event)> {
    let ticket = TicketRepository::new(state.db.clone())
        .find_by_pass_id(pass_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("no ticket for pass {pass_id}")))?;

    let event = EventRepository::new(state.db.clone())
        .find_by_id(ticket.event_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("event {} not found", ticket.event_id)))?;

    match user.role {
        Role::Admin => {}
        Role::Organizer => {
            require_approved_organizer(state, user.role_id).await?;
            if event.organizer_id != user.role_id {
                return Err(AppError::forbidden(
                    "ticket belongs to another organizer's event",
                ));
            }
        }
        Role::User => {
            return Err(AppError::forbidden("Organizer role required"));
        }
    }

    Ok((ticket, event))
}

fn scan_view(ticket: Ticket, event: &Event) -> ScanView {
    let ticket_type_name = event
        .ticket_type(ticket.ticket_type_id)
        .map(|(_, tt)| tt.name.clone())
        .unwrap_or_else(|| ticket.ticket_type_name.clone());

    ScanView {
        event_title: event.title.clone(),
        event_starts_at: event.starts_at,
        venue: event.venue.clone(),
        ticket_type_name,
        ticket,
    }
}

/// GET /api/scanner/{pass_id} - resolve a pass to its ticket context
pub async fn lookup(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(pass_id): Path<String>,
) -> AppResult<Json<AppResponse<ScanView>>> {
    let (ticket, event) = authorized_ticket(&state, &user, &pass_id).await?;
    Ok(ok(scan_view(ticket, &event)))
}

/// POST /api/scanner/{pass_id}/validate - mark a ticket used, exactly once
pub async fn validate(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(pass_id): Path<String>,
) -> AppResult<Json<AppResponse<ScanView>>> {
    let (ticket, event) = authorized_ticket(&state, &user, &pass_id).await?;

    if ticket.is_validated {
        return Err(AppError::conflict(format!(
            "ticket already validated at {}",
            ticket.validation_time.unwrap_or_default()
        )));
    }

    // Conditional update; a concurrent scan between the check above and
    // this statement loses here and reports already-validated.
    let validated = TicketRepository::new(state.db.clone())
        .mark_validated(&pass_id, time::now_millis())
        .await?
        .ok_or_else(|| AppError::conflict("ticket already validated"))?;

    tracing::info!(
        ticket_id = validated.ticket_id,
        event_id = event.event_id,
        "ticket validated"
    );

    Ok(ok_with_message(scan_view(validated, &event), "Ticket valid"))
}
