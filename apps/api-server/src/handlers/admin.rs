//! Admin endpoints: dashboard aggregates, post moderation, and user
//! account management.
//!
//! The admin capability check lives in the services; these handlers
//! only translate between HTTP and the moderation engine.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use storymap_shared::dto::{
    ModerationResponse, RejectPostRequest, UserStatusRequest, UserStatusResponse, UserSummary,
};

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/admin/dashboard
///
/// Runs a bounded country backfill, then returns the aggregates.
pub async fn dashboard(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let stats = state.dashboard.stats(identity.actor()).await?;
    Ok(HttpResponse::Ok().json(stats))
}

/// GET /api/admin/users
pub async fn list_users(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let users = state.accounts.list_users(identity.actor()).await?;

    let rows: Vec<UserSummary> = users
        .into_iter()
        .map(|u| UserSummary {
            id: u.id.to_string(),
            username: u.username,
            is_admin: u.is_admin,
            is_active: u.is_active,
            created_at: u.created_at.to_rfc3339(),
        })
        .collect();

    Ok(HttpResponse::Ok().json(rows))
}

/// POST /api/admin/users/{id}/status
///
/// Deactivation locks the account out of login; posts stay up.
pub async fn set_user_status(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UserStatusRequest>,
) -> AppResult<HttpResponse> {
    let active = body.into_inner().is_active;
    let user = state
        .accounts
        .set_active(identity.actor(), path.into_inner(), active)
        .await?;

    let message = if user.is_active {
        "User activated successfully"
    } else {
        "User deactivated successfully"
    };
    Ok(HttpResponse::Ok().json(UserStatusResponse {
        success: true,
        message: message.to_string(),
        is_active: user.is_active,
    }))
}

/// POST /api/admin/posts/{id}/approve
pub async fn approve_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .moderation
        .approve(identity.actor(), path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ModerationResponse {
        success: true,
        message: "Post approved successfully".to_string(),
        reason: None,
    }))
}

/// POST /api/admin/posts/{id}/reject
///
/// Requires a non-blank reason; deletes the post and echoes the reason
/// back for out-of-band author notification.
pub async fn reject_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<RejectPostRequest>,
) -> AppResult<HttpResponse> {
    let reason = body.into_inner().reason.unwrap_or_default();
    let rejection = state
        .moderation
        .reject(identity.actor(), path.into_inner(), &reason)
        .await?;

    Ok(HttpResponse::Ok().json(ModerationResponse {
        success: true,
        message: "Post rejected successfully".to_string(),
        reason: Some(rejection.reason),
    }))
}

/// POST /api/admin/posts/{id}/delete
pub async fn delete_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .moderation
        .delete(identity.actor(), path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ModerationResponse {
        success: true,
        message: "Post deleted successfully".to_string(),
        reason: None,
    }))
}
