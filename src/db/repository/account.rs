//! Master account repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::MasterAccount;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const TABLE: &str = "account";

#[derive(Clone)]
pub struct AccountRepository {
    base: BaseRepository,
}

impl AccountRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_id(&self, account_id: i64) -> RepoResult<Option<MasterAccount>> {
        let account: Option<MasterAccount> = self
            .base
            .db()
            .select(RecordId::from_table_key(TABLE, account_id))
            .await?;
        Ok(account)
    }

    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<MasterAccount>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM account WHERE email = $email LIMIT 1")
            .bind(("email", email.to_string()))
            .await?;
        let accounts: Vec<MasterAccount> = result.take(0)?;
        Ok(accounts.into_iter().next())
    }

    /// Create an account; email must be globally unique.
    ///
    /// The unique index on email is the arbiter under concurrent
    /// registration; this pre-check only shapes the error message.
    pub async fn create(&self, account: MasterAccount) -> RepoResult<MasterAccount> {
        if self.find_by_email(&account.email).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "account with email '{}' already exists",
                account.email
            )));
        }

        let created: Option<MasterAccount> = self
            .base
            .db()
            .create(RecordId::from_table_key(TABLE, account.account_id))
            .content(account)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create account".to_string()))
    }

    pub async fn update_last_login(&self, account_id: i64, at: i64) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE $thing SET last_login = $at")
            .bind(("thing", RecordId::from_table_key(TABLE, account_id)))
            .bind(("at", at))
            .await?;
        Ok(())
    }

    pub async fn update_password(&self, account_id: i64, password_hash: &str) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE $thing SET password_hash = $hash")
            .bind(("thing", RecordId::from_table_key(TABLE, account_id)))
            .bind(("hash", password_hash.to_string()))
            .await?;
        Ok(())
    }

    pub async fn update_email(&self, account_id: i64, email: &str) -> RepoResult<()> {
        if let Some(existing) = self.find_by_email(email).await?
            && existing.account_id != account_id
        {
            return Err(RepoError::Duplicate(format!(
                "account with email '{}' already exists",
                email
            )));
        }

        self.base
            .db()
            .query("UPDATE $thing SET email = $email, email_verified = false")
            .bind(("thing", RecordId::from_table_key(TABLE, account_id)))
            .bind(("email", email.to_string()))
            .await?;
        Ok(())
    }

    /// Hard delete, used by admin account removal alongside the profile
    pub async fn delete(&self, account_id: i64) -> RepoResult<bool> {
        let deleted: Option<MasterAccount> = self
            .base
            .db()
            .delete(RecordId::from_table_key(TABLE, account_id))
            .await?;
        Ok(deleted.is_some())
    }
}
