//! Database module
//!
//! Owns the embedded SurrealDB store and applies the schema at startup.

pub mod models;
pub mod repository;
pub mod sequence;

use std::path::Path;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

use crate::utils::AppError;

/// Schema applied at startup. Tables are schemaless documents; the indexes
/// back the unique-email invariant, the scanner's pass-id lookup, and the
/// windowed aggregation scans.
const SCHEMA: &str = r#"
DEFINE TABLE IF NOT EXISTS account SCHEMALESS;
DEFINE INDEX IF NOT EXISTS account_email ON account FIELDS email UNIQUE;

DEFINE TABLE IF NOT EXISTS user SCHEMALESS;
DEFINE TABLE IF NOT EXISTS organizer SCHEMALESS;
DEFINE TABLE IF NOT EXISTS admin SCHEMALESS;

DEFINE TABLE IF NOT EXISTS event SCHEMALESS;
DEFINE INDEX IF NOT EXISTS event_organizer ON event FIELDS organizer_id;
DEFINE INDEX IF NOT EXISTS event_status ON event FIELDS status;

DEFINE TABLE IF NOT EXISTS order SCHEMALESS;
DEFINE INDEX IF NOT EXISTS order_account ON order FIELDS account_id;
DEFINE INDEX IF NOT EXISTS order_created_at ON order FIELDS created_at;

DEFINE TABLE IF NOT EXISTS ticket SCHEMALESS;
DEFINE INDEX IF NOT EXISTS ticket_pass_id ON ticket FIELDS pass_id UNIQUE;
DEFINE INDEX IF NOT EXISTS ticket_event ON ticket FIELDS event_id;

DEFINE TABLE IF NOT EXISTS genre SCHEMALESS;
DEFINE TABLE IF NOT EXISTS location SCHEMALESS;
DEFINE TABLE IF NOT EXISTS artist SCHEMALESS;

DEFINE TABLE IF NOT EXISTS counter SCHEMALESS;
"#;

/// Database service owning the embedded store handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the store under `db_dir` and apply the schema
    pub async fn new(db_dir: &Path) -> Result<Self, AppError> {
        let path = db_dir.join("gatepass.db");
        let db: Surreal<Db> = Surreal::new::<RocksDb>(path.as_path())
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        db.use_ns("gatepass")
            .use_db("gatepass")
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        db.query(SCHEMA)
            .await
            .map_err(|e| AppError::database(format!("Failed to apply schema: {e}")))?;

        tracing::info!(path = %path.display(), "Database ready (embedded, schema applied)");

        Ok(Self { db })
    }
}
