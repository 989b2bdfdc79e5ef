use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::GeoPoint;

/// Post entity - a geotagged story submitted by a user.
///
/// Posts start pending and stay hidden from ordinary viewers until an
/// administrator approves them. Rejection deletes the post outright.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub location: GeoPoint,
    pub country: Option<String>,
    pub country_code: Option<String>,
    pub image: Option<String>,
    pub is_pending: bool,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Create a new pending post.
    pub fn new(
        author_id: Uuid,
        title: String,
        content: String,
        location: GeoPoint,
        image: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            author_id,
            title,
            content,
            location,
            country: None,
            country_code: None,
            image,
            is_pending: true,
            created_at: Utc::now(),
        }
    }
}
