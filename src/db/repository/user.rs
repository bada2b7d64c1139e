//! User profile repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{UserProfile, UserUpdate};
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const TABLE: &str = "user";

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_id(&self, user_id: i64) -> RepoResult<Option<UserProfile>> {
        let user: Option<UserProfile> = self
            .base
            .db()
            .select(RecordId::from_table_key(TABLE, user_id))
            .await?;
        Ok(user)
    }

    pub async fn create(&self, profile: UserProfile) -> RepoResult<UserProfile> {
        let created: Option<UserProfile> = self
            .base
            .db()
            .create(RecordId::from_table_key(TABLE, profile.user_id))
            .content(profile)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create user profile".to_string()))
    }

    pub async fn update(&self, user_id: i64, data: UserUpdate) -> RepoResult<UserProfile> {
        self.base
            .db()
            .query("UPDATE $thing MERGE $data")
            .bind(("thing", RecordId::from_table_key(TABLE, user_id)))
            .bind(("data", data))
            .await?;

        self.find_by_id(user_id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("user {} not found", user_id)))
    }

    pub async fn delete(&self, user_id: i64) -> RepoResult<bool> {
        let deleted: Option<UserProfile> = self
            .base
            .db()
            .delete(RecordId::from_table_key(TABLE, user_id))
            .await?;
        Ok(deleted.is_some())
    }
}
