//! Event repository
//!
//! Events embed their ticket categories and types; inventory counters are
//! only rewritten through [`EventRepository::save`], which the issuance
//! manager calls while holding the event's issuance lock.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Event, EventStatus};
use serde::Serialize;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const TABLE: &str = "event";

/// Public browse filters
#[derive(Debug, Default, Clone)]
pub struct EventFilter {
    pub genre_id: Option<i64>,
    pub location_id: Option<i64>,
    /// Case-insensitive title search
    pub q: Option<String>,
    /// Only events starting at or after this instant (epoch millis)
    pub upcoming_after: Option<i64>,
}

#[derive(Clone)]
pub struct EventRepository {
    base: BaseRepository,
}

impl EventRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_id(&self, event_id: i64) -> RepoResult<Option<Event>> {
        let event: Option<Event> = self
            .base
            .db()
            .select(RecordId::from_table_key(TABLE, event_id))
            .await?;
        Ok(event)
    }

    pub async fn create(&self, event: Event) -> RepoResult<Event> {
        let created: Option<Event> = self
            .base
            .db()
            .create(RecordId::from_table_key(TABLE, event.event_id))
            .content(event)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create event".to_string()))
    }

    /// Replace the stored document with `event` (id field excluded).
    ///
    /// Used by issuance to persist decremented availability counters.
    pub async fn save(&self, event: &Event) -> RepoResult<()> {
        let mut data = serde_json::to_value(event)
            .map_err(|e| RepoError::Database(format!("serialize event: {e}")))?;
        if let Some(obj) = data.as_object_mut() {
            obj.remove("id");
        }

        self.base
            .db()
            .query("UPDATE $thing CONTENT $data")
            .bind(("thing", RecordId::from_table_key(TABLE, event.event_id)))
            .bind(("data", data))
            .await?;
        Ok(())
    }

    /// Merge non-structural field updates; never touches categories
    pub async fn merge_fields<T: Serialize + 'static>(
        &self,
        event_id: i64,
        data: T,
    ) -> RepoResult<Event> {
        self.base
            .db()
            .query("UPDATE $thing MERGE $data")
            .bind(("thing", RecordId::from_table_key(TABLE, event_id)))
            .bind(("data", data))
            .await?;

        self.find_by_id(event_id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("event {} not found", event_id)))
    }

    /// Persist a status transition with its optional rejection reason
    pub async fn set_status(
        &self,
        event_id: i64,
        status: EventStatus,
        rejection_reason: Option<String>,
    ) -> RepoResult<Event> {
        self.base
            .db()
            .query("UPDATE $thing SET status = $status, rejection_reason = $reason, updated_at = $now")
            .bind(("thing", RecordId::from_table_key(TABLE, event_id)))
            .bind(("status", status))
            .bind(("reason", rejection_reason))
            .bind(("now", crate::utils::time::now_millis()))
            .await?;

        self.find_by_id(event_id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("event {} not found", event_id)))
    }

    pub async fn list_by_organizer(&self, organizer_id: i64) -> RepoResult<Vec<Event>> {
        let events: Vec<Event> = self
            .base
            .db()
            .query("SELECT * FROM event WHERE organizer_id = $oid ORDER BY created_at DESC")
            .bind(("oid", organizer_id))
            .await?
            .take(0)?;
        Ok(events)
    }

    pub async fn list_by_status(&self, status: Option<EventStatus>) -> RepoResult<Vec<Event>> {
        let events: Vec<Event> = match status {
            Some(status) => self
                .base
                .db()
                .query("SELECT * FROM event WHERE status = $status ORDER BY created_at DESC")
                .bind(("status", status))
                .await?
                .take(0)?,
            None => self
                .base
                .db()
                .query("SELECT * FROM event ORDER BY created_at DESC")
                .await?
                .take(0)?,
        };
        Ok(events)
    }

    /// Public discovery: approved/live events with optional filters
    pub async fn list_public(&self, filter: &EventFilter) -> RepoResult<Vec<Event>> {
        let mut conditions = vec!["status IN ['APPROVED', 'LIVE']".to_string()];
        if filter.genre_id.is_some() {
            conditions.push("genre = $genre".to_string());
        }
        if filter.location_id.is_some() {
            conditions.push("location = $location".to_string());
        }
        if filter.q.is_some() {
            conditions.push("string::contains(string::lowercase(title), $q)".to_string());
        }
        if filter.upcoming_after.is_some() {
            conditions.push("starts_at >= $after".to_string());
        }

        let sql = format!(
            "SELECT * FROM event WHERE {} ORDER BY starts_at",
            conditions.join(" AND ")
        );

        let mut query = self.base.db().query(sql);
        if let Some(genre_id) = filter.genre_id {
            query = query.bind(("genre", RecordId::from_table_key("genre", genre_id)));
        }
        if let Some(location_id) = filter.location_id {
            query = query.bind(("location", RecordId::from_table_key("location", location_id)));
        }
        if let Some(q) = &filter.q {
            query = query.bind(("q", q.to_lowercase()));
        }
        if let Some(after) = filter.upcoming_after {
            query = query.bind(("after", after));
        }

        let events: Vec<Event> = query.await?.take(0)?;
        Ok(events)
    }

    pub async fn count_by_organizer(&self, organizer_id: i64) -> RepoResult<i64> {
        let mut result = self
            .base
            .db()
            .query("SELECT count() FROM event WHERE organizer_id = $oid GROUP ALL")
            .bind(("oid", organizer_id))
            .await?;
        let count: Option<i64> = result.take((0, "count"))?;
        Ok(count.unwrap_or(0))
    }
}
