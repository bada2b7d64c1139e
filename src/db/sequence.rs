//! Sequence generator
//!
//! Mints monotonically increasing integer identifiers per logical entity
//! type, used in lieu of database-native surrogate keys. The counter record
//! is incremented with a single atomic statement, so two concurrent calls
//! for the same sequence never observe the same value. Gaps are acceptable
//! (no rollback on caller failure); duplicates are not.

use serde::Deserialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::repository::{RepoError, RepoResult};

/// Sequence names, one per entity type
pub mod sequences {
    pub const ACCOUNTS: &str = "accounts";
    pub const USERS: &str = "users";
    pub const ORGANIZERS: &str = "organizers";
    pub const ADMINS: &str = "admins";
    pub const EVENTS: &str = "events";
    pub const CATEGORIES: &str = "categories";
    pub const TICKET_TYPES: &str = "ticket_types";
    pub const ORDERS: &str = "orders";
    pub const TICKETS: &str = "tickets";
    pub const GENRES: &str = "genres";
    pub const LOCATIONS: &str = "locations";
    pub const ARTISTS: &str = "artists";
}

#[derive(Debug, Deserialize)]
struct Counter {
    value: i64,
}

/// Issues identifiers from persisted per-name counters
#[derive(Clone)]
pub struct SequenceService {
    db: Surreal<Db>,
}

impl SequenceService {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    /// Atomically increment and read the counter for `sequence`.
    ///
    /// An absent counter starts at 0, so the first call returns 1.
    pub async fn next_value(&self, sequence: &str) -> RepoResult<i64> {
        let mut result = self
            .db
            .query("UPSERT type::thing('counter', $name) SET value = (value OR 0) + 1 RETURN AFTER")
            .bind(("name", sequence.to_string()))
            .await?;

        let counter: Option<Counter> = result.take(0)?;
        counter
            .map(|c| c.value)
            .ok_or_else(|| RepoError::Database(format!("counter '{sequence}' did not update")))
    }
}
