//! Reference catalogs: genres, locations, artists
//!
//! Admin-managed lookup tables referenced by events.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Music/event genre
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Genre {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub genre_id: i64,
    pub name: String,
    pub created_at: i64,
}

/// City / venue locality
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub location_id: i64,
    pub name: String,
    pub country: Option<String>,
    pub created_at: i64,
}

/// Performing artist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artist {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub artist_id: i64,
    pub name: String,
    pub image: Option<String>,
    pub created_at: i64,
}

/// Shared create payload for the simple catalogs
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogCreate {
    pub name: String,
    /// Country for locations, image URL for artists
    pub country: Option<String>,
    pub image: Option<String>,
}
