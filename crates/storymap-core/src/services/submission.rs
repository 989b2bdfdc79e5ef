//! Submission pipeline: validate, enrich best-effort, persist pending.

use std::sync::Arc;

use crate::domain::{Actor, GeoPoint, Post};
use crate::error::DomainError;
use crate::ports::{BaseRepository, Geocoder, PostRepository};

/// A story submission as received from the transport layer.
///
/// Coordinates arrive as raw strings so the pipeline owns the
/// present-vs-parseable distinction the validation contract draws.
#[derive(Debug, Clone, Default)]
pub struct NewPost {
    pub title: Option<String>,
    pub content: Option<String>,
    pub lat: Option<String>,
    pub lng: Option<String>,
    pub image: Option<String>,
}

pub struct SubmissionService {
    posts: Arc<dyn PostRepository>,
    geocoder: Arc<dyn Geocoder>,
}

impl SubmissionService {
    pub fn new(posts: Arc<dyn PostRepository>, geocoder: Arc<dyn Geocoder>) -> Self {
        Self { posts, geocoder }
    }

    /// Create a pending post for `actor`.
    ///
    /// Reverse geocoding is best-effort: an unavailable geocoder leaves
    /// `country`/`country_code` unset and is not an error here.
    pub async fn create_post(&self, actor: Actor, req: NewPost) -> Result<Post, DomainError> {
        let (title, content, location) = validate(&req)?;

        let country = self
            .geocoder
            .reverse_geocode(location.lat, location.lng)
            .await;
        if country.is_none() {
            tracing::warn!(
                lat = location.lat,
                lng = location.lng,
                "reverse geocoding unavailable, creating post without country"
            );
        }

        let mut post = Post::new(actor.user_id, title, content, location, req.image.clone());
        if let Some(info) = country {
            post.country = Some(info.country);
            post.country_code = info.country_code;
        }

        let stored = self.posts.save(post).await.map_err(|e| {
            tracing::error!(error = %e, "failed to persist new post");
            DomainError::Internal("failed to create post".to_string())
        })?;

        tracing::info!(post_id = %stored.id, author_id = %actor.user_id, "post submitted for review");
        Ok(stored)
    }
}

fn validate(req: &NewPost) -> Result<(String, String, GeoPoint), DomainError> {
    let mut missing = Vec::new();
    if req.title.as_deref().is_none_or(|t| t.trim().is_empty()) {
        missing.push("title");
    }
    if req.content.as_deref().is_none_or(|c| c.trim().is_empty()) {
        missing.push("content");
    }
    if req.lat.is_none() {
        missing.push("lat");
    }
    if req.lng.is_none() {
        missing.push("lng");
    }
    if !missing.is_empty() {
        return Err(DomainError::Validation(format!(
            "missing required fields: {}",
            missing.join(", ")
        )));
    }

    let lat = req.lat.as_deref().unwrap_or_default().trim().parse::<f64>();
    let lng = req.lng.as_deref().unwrap_or_default().trim().parse::<f64>();
    let location = match (lat, lng) {
        (Ok(lat), Ok(lng)) => GeoPoint::new(lat, lng),
        _ => None,
    }
    .ok_or_else(|| DomainError::Validation("invalid coordinates".to_string()))?;

    Ok((
        req.title.clone().unwrap_or_default(),
        req.content.clone().unwrap_or_default(),
        location,
    ))
}
