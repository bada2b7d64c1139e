//! Admin profile repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::AdminProfile;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const TABLE: &str = "admin";

#[derive(Clone)]
pub struct AdminRepository {
    base: BaseRepository,
}

impl AdminRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_id(&self, admin_id: i64) -> RepoResult<Option<AdminProfile>> {
        let admin: Option<AdminProfile> = self
            .base
            .db()
            .select(RecordId::from_table_key(TABLE, admin_id))
            .await?;
        Ok(admin)
    }

    pub async fn create(&self, profile: AdminProfile) -> RepoResult<AdminProfile> {
        let created: Option<AdminProfile> = self
            .base
            .db()
            .create(RecordId::from_table_key(TABLE, profile.admin_id))
            .content(profile)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create admin profile".to_string()))
    }

    pub async fn delete(&self, admin_id: i64) -> RepoResult<bool> {
        let deleted: Option<AdminProfile> = self
            .base
            .db()
            .delete(RecordId::from_table_key(TABLE, admin_id))
            .await?;
        Ok(deleted.is_some())
    }
}
