//! Ticket repository
//!
//! Scanner lookups go through the unique `pass_id` index. The validation
//! transition is a single conditional UPDATE, so a ticket can never be
//! validated twice even under concurrent scans.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::Ticket;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const TABLE: &str = "ticket";

#[derive(Clone)]
pub struct TicketRepository {
    base: BaseRepository,
}

impl TicketRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_id(&self, ticket_id: i64) -> RepoResult<Option<Ticket>> {
        let ticket: Option<Ticket> = self
            .base
            .db()
            .select(RecordId::from_table_key(TABLE, ticket_id))
            .await?;
        Ok(ticket)
    }

    pub async fn find_by_pass_id(&self, pass_id: &str) -> RepoResult<Option<Ticket>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM ticket WHERE pass_id = $pass LIMIT 1")
            .bind(("pass", pass_id.to_string()))
            .await?;
        let tickets: Vec<Ticket> = result.take(0)?;
        Ok(tickets.into_iter().next())
    }

    pub async fn create(&self, ticket: Ticket) -> RepoResult<Ticket> {
        let created: Option<Ticket> = self
            .base
            .db()
            .create(RecordId::from_table_key(TABLE, ticket.ticket_id))
            .content(ticket)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create ticket".to_string()))
    }

    /// Mark a ticket validated, exactly once.
    ///
    /// Returns the updated ticket, or None when the ticket was already
    /// validated (the caller distinguishes that from an unknown pass id by
    /// looking the ticket up first). The `is_validated = false` guard keeps
    /// `validation_time` write-once.
    pub async fn mark_validated(&self, pass_id: &str, at: i64) -> RepoResult<Option<Ticket>> {
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE ticket SET is_validated = true, validation_time = $at \
                 WHERE pass_id = $pass AND is_validated = false RETURN AFTER",
            )
            .bind(("pass", pass_id.to_string()))
            .bind(("at", at))
            .await?;
        let updated: Vec<Ticket> = result.take(0)?;
        Ok(updated.into_iter().next())
    }

    pub async fn list_by_order(&self, order_id: i64) -> RepoResult<Vec<Ticket>> {
        let tickets: Vec<Ticket> = self
            .base
            .db()
            .query("SELECT * FROM ticket WHERE order_id = $oid ORDER BY ticket_id")
            .bind(("oid", order_id))
            .await?
            .take(0)?;
        Ok(tickets)
    }

    pub async fn list_by_event(&self, event_id: i64) -> RepoResult<Vec<Ticket>> {
        let tickets: Vec<Ticket> = self
            .base
            .db()
            .query("SELECT * FROM ticket WHERE event_id = $eid ORDER BY ticket_id")
            .bind(("eid", event_id))
            .await?
            .take(0)?;
        Ok(tickets)
    }
}
