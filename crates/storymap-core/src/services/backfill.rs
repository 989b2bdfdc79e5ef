//! Country backfill: enrich posts the inline geocoding missed.

use std::sync::Arc;

use crate::error::{DomainError, RepoError};
use crate::ports::{BaseRepository, Geocoder, PostRepository};

/// Idempotent batch enrichment over posts lacking a country.
///
/// Shares the `Geocoder` contract with the submission pipeline; an
/// individual miss is logged and skipped, never aborting the batch.
pub struct BackfillService {
    posts: Arc<dyn PostRepository>,
    geocoder: Arc<dyn Geocoder>,
}

impl BackfillService {
    pub fn new(posts: Arc<dyn PostRepository>, geocoder: Arc<dyn Geocoder>) -> Self {
        Self { posts, geocoder }
    }

    /// Enrich up to `batch` posts; returns how many were updated.
    pub async fn backfill_missing_country(&self, batch: u64) -> Result<usize, DomainError> {
        let candidates = self.posts.find_missing_country(batch).await.map_err(|e| {
            tracing::error!(error = %e, "failed to select posts for country backfill");
            DomainError::Internal("failed to select backfill batch".to_string())
        })?;

        let mut enriched = 0;
        for mut post in candidates {
            let Some(info) = self
                .geocoder
                .reverse_geocode(post.location.lat, post.location.lng)
                .await
            else {
                tracing::warn!(post_id = %post.id, "country lookup unavailable, skipping");
                continue;
            };

            post.country = Some(info.country);
            post.country_code = info.country_code;
            // `update`, not `save`: a post deleted since selection must
            // not be re-inserted by its enrichment.
            match self.posts.update(post).await {
                Ok(saved) => {
                    tracing::info!(post_id = %saved.id, country = ?saved.country, "backfilled country");
                    enriched += 1;
                }
                Err(RepoError::NotFound) => {
                    tracing::debug!("post deleted mid-backfill, skipping");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "failed to persist backfilled country, skipping");
                }
            }
        }

        Ok(enriched)
    }
}
