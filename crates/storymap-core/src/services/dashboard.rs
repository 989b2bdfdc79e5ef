//! Admin dashboard aggregates.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::Actor;
use crate::error::DomainError;
use crate::ports::{PostRepository, UserRepository};
use crate::services::BackfillService;

/// Backfill batch run inline with a dashboard read. Bounded so a slow
/// geocoder cannot stall the page.
pub const DASHBOARD_BACKFILL_BATCH: u64 = 10;

const TOP_COUNTRIES_LIMIT: u64 = 10;

/// One country's share of the top-countries table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountryShare {
    /// Lowercase ISO code, used for flag rendering.
    pub code: String,
    pub name: String,
    pub count: i64,
    /// Percentage of the posts within the top-countries table.
    pub percentage: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStats {
    pub user_count: i64,
    pub post_count: i64,
    pub pending_count: i64,
    pub approved_count: i64,
    pub top_countries: Vec<CountryShare>,
}

pub struct DashboardService {
    users: Arc<dyn UserRepository>,
    posts: Arc<dyn PostRepository>,
    backfill: Arc<BackfillService>,
}

impl DashboardService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
        backfill: Arc<BackfillService>,
    ) -> Self {
        Self {
            users,
            posts,
            backfill,
        }
    }

    /// Admin-only aggregates. Runs a bounded country backfill first so
    /// the top-countries table converges over time; a backfill failure
    /// only logs, the dashboard still renders.
    pub async fn stats(&self, actor: Actor) -> Result<DashboardStats, DomainError> {
        if !actor.is_admin {
            return Err(DomainError::Unauthorized);
        }

        if let Err(e) = self
            .backfill
            .backfill_missing_country(DASHBOARD_BACKFILL_BATCH)
            .await
        {
            tracing::warn!(error = %e, "inline country backfill failed");
        }

        let user_count = self.users.count_all().await.map_err(internal)?;
        let post_count = self.posts.count_all().await.map_err(internal)?;
        let pending_count = self.posts.count_pending().await.map_err(internal)?;

        let counts = self
            .posts
            .count_by_country(TOP_COUNTRIES_LIMIT)
            .await
            .map_err(internal)?;
        let total: i64 = counts.iter().map(|c| c.count).sum();
        let top_countries = counts
            .into_iter()
            .map(|c| CountryShare {
                code: c.country_code.to_lowercase(),
                name: c.country,
                count: c.count,
                percentage: if total > 0 {
                    (c.count as f64 / total as f64 * 100.0).round() as i64
                } else {
                    0
                },
            })
            .collect();

        Ok(DashboardStats {
            user_count,
            post_count,
            pending_count,
            approved_count: post_count - pending_count,
            top_countries,
        })
    }
}

fn internal(e: crate::error::RepoError) -> DomainError {
    tracing::error!(error = %e, "dashboard aggregate query failed");
    DomainError::Internal("failed to load dashboard data".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GeoPoint, Post, User};
    use crate::error::RepoError;
    use crate::ports::BaseRepository;
    use crate::services::testing::{FixedGeocoder, MemoryPosts};
    use async_trait::async_trait;
    use uuid::Uuid;

    struct TwoUsers;

    #[async_trait]
    impl BaseRepository<User, Uuid> for TwoUsers {
        async fn find_by_id(&self, _id: Uuid) -> Result<Option<User>, RepoError> {
            Ok(None)
        }
        async fn save(&self, user: User) -> Result<User, RepoError> {
            Ok(user)
        }
        async fn update(&self, user: User) -> Result<User, RepoError> {
            Ok(user)
        }
        async fn delete(&self, _id: Uuid) -> Result<(), RepoError> {
            Ok(())
        }
    }

    #[async_trait]
    impl crate::ports::UserRepository for TwoUsers {
        async fn find_by_username(&self, _username: &str) -> Result<Option<User>, RepoError> {
            Ok(None)
        }
        async fn find_all(&self) -> Result<Vec<User>, RepoError> {
            Ok(Vec::new())
        }
        async fn count_all(&self) -> Result<i64, RepoError> {
            Ok(2)
        }
    }

    fn post_with_country(country: Option<(&str, &str)>, pending: bool) -> Post {
        let mut post = Post::new(
            Uuid::new_v4(),
            "title".to_string(),
            "content".to_string(),
            GeoPoint::new(21.0278, 105.8342).unwrap(),
            None,
        );
        if let Some((name, code)) = country {
            post.country = Some(name.to_string());
            post.country_code = Some(code.to_string());
        }
        post.is_pending = pending;
        post
    }

    #[tokio::test]
    async fn aggregates_counts_and_country_shares() {
        let posts = Arc::new(MemoryPosts::new());
        posts
            .save(post_with_country(Some(("Việt Nam", "VN")), false))
            .await
            .unwrap();
        posts
            .save(post_with_country(Some(("Việt Nam", "VN")), false))
            .await
            .unwrap();
        posts
            .save(post_with_country(Some(("Nhật Bản", "JP")), true))
            .await
            .unwrap();

        let backfill = Arc::new(BackfillService::new(
            posts.clone(),
            Arc::new(FixedGeocoder::unavailable()),
        ));
        let service = DashboardService::new(Arc::new(TwoUsers), posts, backfill);

        let stats = service.stats(Actor::admin(Uuid::new_v4())).await.unwrap();

        assert_eq!(stats.user_count, 2);
        assert_eq!(stats.post_count, 3);
        assert_eq!(stats.pending_count, 1);
        assert_eq!(stats.approved_count, 2);

        assert_eq!(stats.top_countries.len(), 2);
        assert_eq!(stats.top_countries[0].code, "vn");
        assert_eq!(stats.top_countries[0].count, 2);
        assert_eq!(stats.top_countries[0].percentage, 67);
        assert_eq!(stats.top_countries[1].code, "jp");
    }

    #[tokio::test]
    async fn dashboard_backfills_missing_countries_inline() {
        let posts = Arc::new(MemoryPosts::new());
        let bare = posts.save(post_with_country(None, false)).await.unwrap();

        let backfill = Arc::new(BackfillService::new(
            posts.clone(),
            Arc::new(FixedGeocoder::returning("Việt Nam", "VN")),
        ));
        let service = DashboardService::new(Arc::new(TwoUsers), posts.clone(), backfill);

        let stats = service.stats(Actor::admin(Uuid::new_v4())).await.unwrap();

        let stored = posts.find_by_id(bare.id).await.unwrap().unwrap();
        assert_eq!(stored.country_code.as_deref(), Some("VN"));
        assert_eq!(stats.top_countries[0].code, "vn");
    }

    #[tokio::test]
    async fn non_admin_is_refused() {
        let posts = Arc::new(MemoryPosts::new());
        let backfill = Arc::new(BackfillService::new(
            posts.clone(),
            Arc::new(FixedGeocoder::unavailable()),
        ));
        let service = DashboardService::new(Arc::new(TwoUsers), posts, backfill);

        let err = service
            .stats(Actor::user(Uuid::new_v4()))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized));
    }
}
