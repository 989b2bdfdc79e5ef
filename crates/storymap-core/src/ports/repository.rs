use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Post, User};
use crate::error::RepoError;

/// Aggregate row for the per-country post counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountryCount {
    pub country: String,
    pub country_code: String,
    pub count: i64,
}

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or update).
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Update an existing entity.
    ///
    /// Unlike `save`, never inserts: reports `RepoError::NotFound` when
    /// the entity no longer exists, so callers racing a concurrent
    /// delete can tell who won instead of resurrecting the row.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    ///
    /// Reports `RepoError::NotFound` when no row was affected, so
    /// callers racing a concurrent delete can tell who won. Callers
    /// that want idempotent semantics ignore that variant.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their unique username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    /// All users, newest first.
    async fn find_all(&self) -> Result<Vec<User>, RepoError>;

    /// Total number of users.
    async fn count_all(&self) -> Result<i64, RepoError>;
}

/// Post repository with the geospatial and moderation queries.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// All posts, newest first.
    async fn find_all(&self) -> Result<Vec<Post>, RepoError>;

    /// Approved posts only (`is_pending == false`), newest first.
    async fn find_approved(&self) -> Result<Vec<Post>, RepoError>;

    /// Posts whose location lies within `radius_m` metres of the given
    /// point, geodesic distance, nearest first. Callers must not rely
    /// on the ordering.
    async fn find_near(&self, lat: f64, lng: f64, radius_m: f64) -> Result<Vec<Post>, RepoError>;

    /// Post counts grouped by country, descending by count with ties
    /// broken by country name, capped at `limit`.
    async fn count_by_country(&self, limit: u64) -> Result<Vec<CountryCount>, RepoError>;

    /// Up to `batch` posts that have coordinates but no country yet.
    async fn find_missing_country(&self, batch: u64) -> Result<Vec<Post>, RepoError>;

    /// Total number of posts.
    async fn count_all(&self) -> Result<i64, RepoError>;

    /// Number of posts still awaiting moderation.
    async fn count_pending(&self) -> Result<i64, RepoError>;
}
