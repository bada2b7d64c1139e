//! Reference catalog repositories: genres, locations, artists

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Artist, Genre, Location};
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct GenreRepository {
    base: BaseRepository,
}

impl GenreRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Genre>> {
        let genres: Vec<Genre> = self
            .base
            .db()
            .query("SELECT * FROM genre ORDER BY name")
            .await?
            .take(0)?;
        Ok(genres)
    }

    pub async fn find_by_id(&self, genre_id: i64) -> RepoResult<Option<Genre>> {
        let genre: Option<Genre> = self
            .base
            .db()
            .select(RecordId::from_table_key("genre", genre_id))
            .await?;
        Ok(genre)
    }

    pub async fn create(&self, genre: Genre) -> RepoResult<Genre> {
        let created: Option<Genre> = self
            .base
            .db()
            .create(RecordId::from_table_key("genre", genre.genre_id))
            .content(genre)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create genre".to_string()))
    }

    pub async fn delete(&self, genre_id: i64) -> RepoResult<bool> {
        let deleted: Option<Genre> = self
            .base
            .db()
            .delete(RecordId::from_table_key("genre", genre_id))
            .await?;
        Ok(deleted.is_some())
    }
}

#[derive(Clone)]
pub struct LocationRepository {
    base: BaseRepository,
}

impl LocationRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Location>> {
        let locations: Vec<Location> = self
            .base
            .db()
            .query("SELECT * FROM location ORDER BY name")
            .await?
            .take(0)?;
        Ok(locations)
    }

    pub async fn find_by_id(&self, location_id: i64) -> RepoResult<Option<Location>> {
        let location: Option<Location> = self
            .base
            .db()
            .select(RecordId::from_table_key("location", location_id))
            .await?;
        Ok(location)
    }

    pub async fn create(&self, location: Location) -> RepoResult<Location> {
        let created: Option<Location> = self
            .base
            .db()
            .create(RecordId::from_table_key("location", location.location_id))
            .content(location)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create location".to_string()))
    }

    pub async fn delete(&self, location_id: i64) -> RepoResult<bool> {
        let deleted: Option<Location> = self
            .base
            .db()
            .delete(RecordId::from_table_key("location", location_id))
            .await?;
        Ok(deleted.is_some())
    }
}

#[derive(Clone)]
pub struct ArtistRepository {
    base: BaseRepository,
}

impl ArtistRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Artist>> {
        let artists: Vec<Artist> = self
            .base
            .db()
            .query("SELECT * FROM artist ORDER BY name")
            .await?
            .take(0)?;
        Ok(artists)
    }

    pub async fn find_by_id(&self, artist_id: i64) -> RepoResult<Option<Artist>> {
        let artist: Option<Artist> = self
            .base
            .db()
            .select(RecordId::from_table_key("artist", artist_id))
            .await?;
        Ok(artist)
    }

    pub async fn create(&self, artist: Artist) -> RepoResult<Artist> {
        let created: Option<Artist> = self
            .base
            .db()
            .create(RecordId::from_table_key("artist", artist.artist_id))
            .content(artist)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create artist".to_string()))
    }

    pub async fn delete(&self, artist_id: i64) -> RepoResult<bool> {
        let deleted: Option<Artist> = self
            .base
            .db()
            .delete(RecordId::from_table_key("artist", artist_id))
            .await?;
        Ok(deleted.is_some())
    }
}
