//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterUserRequest {
    pub username: String,
    pub password: String,
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response containing a user's public information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub is_admin: bool,
}

/// Response containing authentication tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// Row in the admin user listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: String,
    pub username: String,
    pub is_admin: bool,
    pub is_active: bool,
    pub created_at: String,
}

/// Body for activating or deactivating a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStatusRequest {
    pub is_active: bool,
}

/// 200 body for a user status change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStatusResponse {
    pub success: bool,
    pub message: String,
    pub is_active: bool,
}

/// GeoJSON Point: coordinates are `[lng, lat]`, longitude first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationDto {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: [f64; 2],
}

impl LocationDto {
    pub fn point(lng: f64, lat: f64) -> Self {
        Self {
            kind: "Point".to_string(),
            coordinates: [lng, lat],
        }
    }
}

/// Form fields for submitting a story. Coordinates stay strings so the
/// server reports missing and malformed values distinctly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub lat: Option<String>,
    pub lng: Option<String>,
    /// Reference to an already-uploaded image, if any.
    pub image: Option<String>,
}

/// A post as returned by the listing and search endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: String,
    pub title: String,
    pub content: String,
    pub location: LocationDto,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub author: AuthorRef,
    pub is_pending: bool,
    pub created_at: String,
}

/// Minimal author info attached to listed posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorRef {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// 201 body for a successful submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostResponse {
    pub success: bool,
    pub message: String,
    pub post: CreatedPost,
}

/// The slice of the new post echoed back to the submitter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedPost {
    pub id: String,
    pub title: String,
    pub location: LocationDto,
}

/// Query string for the proximity search.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
    pub lat: f64,
    pub lng: f64,
    /// Radius in metres.
    pub radius: Option<f64>,
}

/// Body for rejecting a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectPostRequest {
    pub reason: Option<String>,
}

/// 200 body for moderation actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModerationResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}
