//! Visibility filter: which posts a given viewer may list.

use std::sync::Arc;

use crate::domain::{Actor, Post};
use crate::error::DomainError;
use crate::ports::PostRepository;

/// Default radius for proximity search, in metres.
pub const DEFAULT_SEARCH_RADIUS_M: f64 = 5_000.0;

/// Wraps every read path: admins see everything, everyone else sees
/// only approved posts. No path may leak pending posts to non-admins.
pub struct VisibilityFilter {
    posts: Arc<dyn PostRepository>,
}

impl VisibilityFilter {
    pub fn new(posts: Arc<dyn PostRepository>) -> Self {
        Self { posts }
    }

    /// All posts the viewer may see, newest first.
    pub async fn list_posts(&self, viewer: Actor) -> Result<Vec<Post>, DomainError> {
        let result = if viewer.is_admin {
            self.posts.find_all().await
        } else {
            self.posts.find_approved().await
        };
        result.map_err(|e| {
            tracing::error!(error = %e, "failed to list posts");
            DomainError::Internal("failed to fetch posts".to_string())
        })
    }

    /// Posts within `radius_m` metres of the given point that the
    /// viewer may see.
    pub async fn search_near(
        &self,
        viewer: Actor,
        lat: f64,
        lng: f64,
        radius_m: f64,
    ) -> Result<Vec<Post>, DomainError> {
        if !lat.is_finite() || !lng.is_finite() || !radius_m.is_finite() || radius_m < 0.0 {
            return Err(DomainError::Validation("invalid coordinates".to_string()));
        }

        let nearby = self.posts.find_near(lat, lng, radius_m).await.map_err(|e| {
            tracing::error!(error = %e, lat, lng, radius_m, "proximity search failed");
            DomainError::Internal("failed to search posts".to_string())
        })?;

        Ok(nearby
            .into_iter()
            .filter(|p| viewer.is_admin || !p.is_pending)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::GeoPoint;
    use crate::ports::BaseRepository;
    use crate::services::testing::MemoryPosts;
    use uuid::Uuid;

    async fn seeded() -> (Arc<MemoryPosts>, VisibilityFilter, Post, Post) {
        let posts = Arc::new(MemoryPosts::new());
        let pending = posts
            .save(Post::new(
                Uuid::new_v4(),
                "Pending story".to_string(),
                "...".to_string(),
                GeoPoint::new(21.0278, 105.8342).unwrap(),
                None,
            ))
            .await
            .unwrap();

        let mut approved_post = Post::new(
            Uuid::new_v4(),
            "Approved story".to_string(),
            "...".to_string(),
            GeoPoint::new(21.0279, 105.8342).unwrap(),
            None,
        );
        approved_post.is_pending = false;
        let approved = posts.save(approved_post).await.unwrap();

        let filter = VisibilityFilter::new(posts.clone());
        (posts, filter, pending, approved)
    }

    #[tokio::test]
    async fn non_admin_sees_only_approved_posts() {
        let (_, filter, pending, approved) = seeded().await;

        let visible = filter.list_posts(Actor::user(Uuid::new_v4())).await.unwrap();
        assert!(visible.iter().any(|p| p.id == approved.id));
        assert!(!visible.iter().any(|p| p.id == pending.id));
    }

    #[tokio::test]
    async fn admin_sees_everything() {
        let (_, filter, pending, approved) = seeded().await;

        let visible = filter
            .list_posts(Actor::admin(Uuid::new_v4()))
            .await
            .unwrap();
        assert!(visible.iter().any(|p| p.id == approved.id));
        assert!(visible.iter().any(|p| p.id == pending.id));
    }

    #[tokio::test]
    async fn search_filters_pending_for_non_admins() {
        let (_, filter, pending, approved) = seeded().await;

        let hits = filter
            .search_near(
                Actor::user(Uuid::new_v4()),
                21.0278,
                105.8342,
                DEFAULT_SEARCH_RADIUS_M,
            )
            .await
            .unwrap();
        assert!(hits.iter().any(|p| p.id == approved.id));
        assert!(!hits.iter().any(|p| p.id == pending.id));
    }

    #[tokio::test]
    async fn search_radius_boundary_excludes_far_posts() {
        let (_, filter, _, approved) = seeded().await;
        let admin = Actor::admin(Uuid::new_v4());

        // Both seeded posts sit ~10m from the search point; a 1m radius
        // must exclude them, a 5km radius includes them.
        let tight = filter
            .search_near(admin, 21.02785, 105.8342, 1.0)
            .await
            .unwrap();
        assert!(tight.is_empty());

        let wide = filter
            .search_near(admin, 21.02785, 105.8342, 5_000.0)
            .await
            .unwrap();
        assert!(wide.iter().any(|p| p.id == approved.id));
    }

    #[tokio::test]
    async fn search_rejects_bad_coordinates() {
        let (_, filter, _, _) = seeded().await;

        let err = filter
            .search_near(Actor::user(Uuid::new_v4()), f64::NAN, 105.8, 5_000.0)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
