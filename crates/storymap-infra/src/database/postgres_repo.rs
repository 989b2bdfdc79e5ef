//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::sea_query::{Alias, Expr};
use sea_orm::{
    ColumnTrait, EntityTrait, FromQueryResult, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

use storymap_core::domain::{GeoPoint, Post, User};
use storymap_core::error::RepoError;
use storymap_core::ports::{CountryCount, PostRepository, UserRepository};

use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::PostgresBaseRepository;

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

// Metres per degree of latitude at its smallest, so the bounding box
// always covers the full radius.
const MIN_METRES_PER_DEG_LAT: f64 = 110_574.0;
const METRES_PER_DEG_LNG_EQUATOR: f64 = 111_320.0;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(result.map(Into::into))
    }

    async fn find_all(&self) -> Result<Vec<User>, RepoError> {
        let result = UserEntity::find()
            .order_by_desc(user::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn count_all(&self) -> Result<i64, RepoError> {
        let count = UserEntity::find()
            .count(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;
        Ok(count as i64)
    }
}

/// Aggregate row for the country grouping query.
#[derive(Debug, FromQueryResult)]
struct CountryRow {
    country: String,
    country_code: Option<String>,
    count: i64,
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_all(&self) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .order_by_desc(post::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_approved(&self) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::IsPending.eq(false))
            .order_by_desc(post::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_near(&self, lat: f64, lng: f64, radius_m: f64) -> Result<Vec<Post>, RepoError> {
        // Bounding-box prefilter in SQL, exact haversine in Rust.
        let lat_delta = radius_m / MIN_METRES_PER_DEG_LAT;
        let lng_scale = (lat.to_radians().cos().abs()).max(0.01);
        let lng_delta = radius_m / (METRES_PER_DEG_LNG_EQUATOR * lng_scale);

        let candidates = PostEntity::find()
            .filter(post::Column::Lat.between(lat - lat_delta, lat + lat_delta))
            .filter(post::Column::Lng.between(lng - lng_delta, lng + lng_delta))
            .all(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        let center = GeoPoint { lng, lat };
        let mut hits: Vec<(f64, Post)> = candidates
            .into_iter()
            .map(Post::from)
            .map(|p| (p.location.haversine_distance_m(&center), p))
            .filter(|(d, _)| *d <= radius_m)
            .collect();
        hits.sort_by(|a, b| a.0.total_cmp(&b.0));

        Ok(hits.into_iter().map(|(_, p)| p).collect())
    }

    async fn count_by_country(&self, limit: u64) -> Result<Vec<CountryCount>, RepoError> {
        let rows = PostEntity::find()
            .select_only()
            .column(post::Column::Country)
            .column(post::Column::CountryCode)
            .column_as(post::Column::Id.count(), "count")
            .filter(post::Column::Country.is_not_null())
            .group_by(post::Column::Country)
            .group_by(post::Column::CountryCode)
            .order_by_desc(Expr::col(Alias::new("count")))
            .order_by_asc(post::Column::Country)
            .limit(limit)
            .into_model::<CountryRow>()
            .all(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|r| CountryCount {
                country: r.country,
                country_code: r.country_code.unwrap_or_default(),
                count: r.count,
            })
            .collect())
    }

    async fn find_missing_country(&self, batch: u64) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::Country.is_null())
            .order_by_asc(post::Column::CreatedAt)
            .limit(batch)
            .all(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn count_all(&self) -> Result<i64, RepoError> {
        let count = PostEntity::find()
            .count(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;
        Ok(count as i64)
    }

    async fn count_pending(&self) -> Result<i64, RepoError> {
        let count = PostEntity::find()
            .filter(post::Column::IsPending.eq(true))
            .count(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;
        Ok(count as i64)
    }
}
