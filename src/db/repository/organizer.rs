//! Organizer profile repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{OrganizerProfile, OrganizerStatus, OrganizerUpdate};
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const TABLE: &str = "organizer";

#[derive(Clone)]
pub struct OrganizerRepository {
    base: BaseRepository,
}

impl OrganizerRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_id(&self, organizer_id: i64) -> RepoResult<Option<OrganizerProfile>> {
        let organizer: Option<OrganizerProfile> = self
            .base
            .db()
            .select(RecordId::from_table_key(TABLE, organizer_id))
            .await?;
        Ok(organizer)
    }

    /// Fetch an organizer and fail unless the profile is approved.
    ///
    /// Visible organizer actions (creating events, analytics, scanning) are
    /// gated on approval.
    pub async fn find_approved(&self, organizer_id: i64) -> RepoResult<OrganizerProfile> {
        let organizer = self
            .find_by_id(organizer_id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("organizer {} not found", organizer_id)))?;

        if organizer.status != OrganizerStatus::Approved {
            return Err(RepoError::Validation(format!(
                "organizer is {}, approval required",
                organizer.status.as_str()
            )));
        }
        Ok(organizer)
    }

    pub async fn create(&self, profile: OrganizerProfile) -> RepoResult<OrganizerProfile> {
        let created: Option<OrganizerProfile> = self
            .base
            .db()
            .create(RecordId::from_table_key(TABLE, profile.organizer_id))
            .content(profile)
            .await?;
        created
            .ok_or_else(|| RepoError::Database("Failed to create organizer profile".to_string()))
    }

    pub async fn update(
        &self,
        organizer_id: i64,
        data: OrganizerUpdate,
    ) -> RepoResult<OrganizerProfile> {
        self.base
            .db()
            .query("UPDATE $thing MERGE $data")
            .bind(("thing", RecordId::from_table_key(TABLE, organizer_id)))
            .bind(("data", data))
            .await?;

        self.find_by_id(organizer_id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("organizer {} not found", organizer_id)))
    }

    /// Persist a moderation decision with its optional reason
    pub async fn set_status(
        &self,
        organizer_id: i64,
        status: OrganizerStatus,
        rejection_reason: Option<String>,
    ) -> RepoResult<OrganizerProfile> {
        self.base
            .db()
            .query("UPDATE $thing SET status = $status, rejection_reason = $reason")
            .bind(("thing", RecordId::from_table_key(TABLE, organizer_id)))
            .bind(("status", status))
            .bind(("reason", rejection_reason))
            .await?;

        self.find_by_id(organizer_id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("organizer {} not found", organizer_id)))
    }

    pub async fn list_by_status(
        &self,
        status: Option<OrganizerStatus>,
    ) -> RepoResult<Vec<OrganizerProfile>> {
        let organizers: Vec<OrganizerProfile> = match status {
            Some(status) => self
                .base
                .db()
                .query("SELECT * FROM organizer WHERE status = $status ORDER BY created_at DESC")
                .bind(("status", status))
                .await?
                .take(0)?,
            None => self
                .base
                .db()
                .query("SELECT * FROM organizer ORDER BY created_at DESC")
                .await?
                .take(0)?,
        };
        Ok(organizers)
    }

    /// Recompute the denormalized event count from the event table.
    ///
    /// The stored field is a cache; correctness-sensitive reads go through
    /// this instead of trusting it.
    pub async fn recompute_event_count(&self, organizer_id: i64) -> RepoResult<i64> {
        let mut result = self
            .base
            .db()
            .query("SELECT count() FROM event WHERE organizer_id = $oid GROUP ALL")
            .bind(("oid", organizer_id))
            .await?;
        let count: Option<i64> = result.take((0, "count"))?;
        let count = count.unwrap_or(0);

        self.base
            .db()
            .query("UPDATE $thing SET event_count = $count")
            .bind(("thing", RecordId::from_table_key(TABLE, organizer_id)))
            .bind(("count", count))
            .await?;

        Ok(count)
    }

    pub async fn delete(&self, organizer_id: i64) -> RepoResult<bool> {
        let deleted: Option<OrganizerProfile> = self
            .base
            .db()
            .delete(RecordId::from_table_key(TABLE, organizer_id))
            .await?;
        Ok(deleted.is_some())
    }
}
