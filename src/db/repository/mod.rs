//! Repository module
//!
//! CRUD access to the document store, one repository per entity. Record
//! keys are the integer ids minted by the sequence generator, in the
//! "table:id" form.

pub mod account;
pub mod admin;
pub mod catalog;
pub mod event;
pub mod order;
pub mod organizer;
pub mod report;
pub mod ticket;
pub mod user;

pub use account::AccountRepository;
pub use admin::AdminRepository;
pub use catalog::{ArtistRepository, GenreRepository, LocationRepository};
pub use event::EventRepository;
pub use order::OrderRepository;
pub use organizer::OrganizerRepository;
pub use report::ReportRepository;
pub use ticket::TicketRepository;
pub use user::UserRepository;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

use crate::utils::AppError;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) => AppError::Conflict(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Base repository holding the shared database handle
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}
