//! Moderation engine: Pending -> Approved (terminal) or Deleted (terminal).
//!
//! Rejection deletes the post outright; the reason only travels back to
//! the moderator in the confirmation, for out-of-band notification.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Actor, Post};
use crate::error::{DomainError, RepoError};
use crate::ports::{BaseRepository, PostRepository};

/// Confirmation returned by a successful rejection, echoing the reason.
#[derive(Debug, Clone)]
pub struct Rejection {
    pub post_id: Uuid,
    pub reason: String,
}

pub struct ModerationService {
    posts: Arc<dyn PostRepository>,
}

impl ModerationService {
    pub fn new(posts: Arc<dyn PostRepository>) -> Self {
        Self { posts }
    }

    /// Approve a pending post, making it publicly visible.
    pub async fn approve(&self, actor: Actor, post_id: Uuid) -> Result<Post, DomainError> {
        require_admin(actor)?;

        let mut post = self.find_post(post_id).await?;
        post.is_pending = false;

        // `update`, not `save`: a concurrent delete between the lookup
        // and here must surface as NotFound, not re-insert the post.
        let updated = self.posts.update(post).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::post_not_found(post_id),
            other => storage_failure("approve", post_id, other),
        })?;

        tracing::info!(post_id = %post_id, admin_id = %actor.user_id, "post approved");
        Ok(updated)
    }

    /// Reject a pending post. Requires a non-blank reason; deletes the
    /// post and returns a confirmation carrying the reason.
    pub async fn reject(
        &self,
        actor: Actor,
        post_id: Uuid,
        reason: &str,
    ) -> Result<Rejection, DomainError> {
        require_admin(actor)?;

        let reason = reason.trim();
        if reason.is_empty() {
            return Err(DomainError::Validation(
                "rejection reason required".to_string(),
            ));
        }

        // Re-checked by the delete below; the lookup gives a clean 404
        // before any mutation.
        self.find_post(post_id).await?;
        self.delete_post("reject", post_id).await?;

        tracing::info!(post_id = %post_id, admin_id = %actor.user_id, reason, "post rejected");
        Ok(Rejection {
            post_id,
            reason: reason.to_string(),
        })
    }

    /// Delete a post unconditionally, whatever its state.
    pub async fn delete(&self, actor: Actor, post_id: Uuid) -> Result<(), DomainError> {
        require_admin(actor)?;
        self.delete_post("delete", post_id).await?;
        tracing::info!(post_id = %post_id, admin_id = %actor.user_id, "post deleted");
        Ok(())
    }

    async fn find_post(&self, post_id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(post_id)
            .await
            .map_err(|e| storage_failure("find", post_id, e))?
            .ok_or_else(|| DomainError::post_not_found(post_id))
    }

    async fn delete_post(&self, op: &'static str, post_id: Uuid) -> Result<(), DomainError> {
        self.posts.delete(post_id).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::post_not_found(post_id),
            other => storage_failure(op, post_id, other),
        })
    }
}

fn require_admin(actor: Actor) -> Result<(), DomainError> {
    if actor.is_admin {
        Ok(())
    } else {
        Err(DomainError::Unauthorized)
    }
}

fn storage_failure(op: &'static str, post_id: Uuid, err: RepoError) -> DomainError {
    tracing::error!(operation = op, post_id = %post_id, error = %err, "post store failure");
    DomainError::Internal(format!("failed to {op} post"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::GeoPoint;
    use crate::ports::{BaseRepository, CountryCount};
    use crate::services::testing::MemoryPosts;
    use async_trait::async_trait;

    /// Drops the post right after handing it out, standing in for a
    /// delete landing between an approve's lookup and its write.
    struct VanishingPosts(Arc<MemoryPosts>);

    #[async_trait]
    impl BaseRepository<Post, Uuid> for VanishingPosts {
        async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
            let found = self.0.find_by_id(id).await?;
            self.0.delete(id).await.ok();
            Ok(found)
        }
        async fn save(&self, post: Post) -> Result<Post, RepoError> {
            self.0.save(post).await
        }
        async fn update(&self, post: Post) -> Result<Post, RepoError> {
            self.0.update(post).await
        }
        async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
            self.0.delete(id).await
        }
    }

    #[async_trait]
    impl PostRepository for VanishingPosts {
        async fn find_all(&self) -> Result<Vec<Post>, RepoError> {
            self.0.find_all().await
        }
        async fn find_approved(&self) -> Result<Vec<Post>, RepoError> {
            self.0.find_approved().await
        }
        async fn find_near(
            &self,
            lat: f64,
            lng: f64,
            radius_m: f64,
        ) -> Result<Vec<Post>, RepoError> {
            self.0.find_near(lat, lng, radius_m).await
        }
        async fn count_by_country(&self, limit: u64) -> Result<Vec<CountryCount>, RepoError> {
            self.0.count_by_country(limit).await
        }
        async fn find_missing_country(&self, batch: u64) -> Result<Vec<Post>, RepoError> {
            self.0.find_missing_country(batch).await
        }
        async fn count_all(&self) -> Result<i64, RepoError> {
            self.0.count_all().await
        }
        async fn count_pending(&self) -> Result<i64, RepoError> {
            self.0.count_pending().await
        }
    }

    fn pending_post() -> Post {
        Post::new(
            Uuid::new_v4(),
            "Hanoi trip".to_string(),
            "Walked the Old Quarter at dawn.".to_string(),
            GeoPoint::new(21.0278, 105.8342).unwrap(),
            None,
        )
    }

    async fn seeded() -> (Arc<MemoryPosts>, ModerationService, Post) {
        let posts = Arc::new(MemoryPosts::new());
        let post = posts.save(pending_post()).await.unwrap();
        let service = ModerationService::new(posts.clone());
        (posts, service, post)
    }

    #[tokio::test]
    async fn approve_clears_pending() {
        let (posts, service, post) = seeded().await;

        let updated = service
            .approve(Actor::admin(Uuid::new_v4()), post.id)
            .await
            .unwrap();

        assert!(!updated.is_pending);
        let stored = posts.find_by_id(post.id).await.unwrap().unwrap();
        assert!(!stored.is_pending);
    }

    #[tokio::test]
    async fn approve_losing_a_delete_race_is_not_found() {
        let posts = Arc::new(MemoryPosts::new());
        let post = posts.save(pending_post()).await.unwrap();
        let service = ModerationService::new(Arc::new(VanishingPosts(posts.clone())));

        let err = service
            .approve(Actor::admin(Uuid::new_v4()), post.id)
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::NotFound { .. }));
        // The deleted post must not come back approved.
        assert!(posts.find_by_id(post.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn approve_missing_post_is_not_found() {
        let (_, service, _) = seeded().await;

        let err = service
            .approve(Actor::admin(Uuid::new_v4()), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn reject_deletes_post_and_echoes_reason() {
        let (posts, service, post) = seeded().await;

        let rejection = service
            .reject(Actor::admin(Uuid::new_v4()), post.id, "off-topic")
            .await
            .unwrap();

        assert_eq!(rejection.post_id, post.id);
        assert_eq!(rejection.reason, "off-topic");
        assert!(posts.find_by_id(post.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn blank_reason_fails_and_leaves_post_untouched() {
        let (posts, service, post) = seeded().await;

        for reason in ["", "   "] {
            let err = service
                .reject(Actor::admin(Uuid::new_v4()), post.id, reason)
                .await
                .unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)));
        }

        let stored = posts.find_by_id(post.id).await.unwrap().unwrap();
        assert!(stored.is_pending);
    }

    #[tokio::test]
    async fn second_delete_reports_not_found() {
        let (_, service, post) = seeded().await;
        let admin = Actor::admin(Uuid::new_v4());

        service.delete(admin, post.id).await.unwrap();
        let err = service.delete(admin, post.id).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn non_admin_callers_are_rejected_before_any_lookup() {
        let (posts, service, post) = seeded().await;
        let user = Actor::user(Uuid::new_v4());

        assert!(matches!(
            service.approve(user, post.id).await.unwrap_err(),
            DomainError::Unauthorized
        ));
        assert!(matches!(
            service.reject(user, post.id, "spam").await.unwrap_err(),
            DomainError::Unauthorized
        ));
        assert!(matches!(
            service.delete(user, post.id).await.unwrap_err(),
            DomainError::Unauthorized
        ));

        // Post survives every refused call.
        assert!(posts.find_by_id(post.id).await.unwrap().is_some());
    }
}
