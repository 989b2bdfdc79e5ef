//! Story endpoints: submit, list, proximity search.

use std::collections::HashMap;

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use storymap_core::domain::Post;
use storymap_core::ports::BaseRepository;
use storymap_core::services::{DEFAULT_SEARCH_RADIUS_M, NewPost};
use storymap_shared::dto::{
    AuthorRef, CreatePostRequest, CreatePostResponse, CreatedPost, LocationDto, PostResponse,
    SearchQuery,
};

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/posts/create
///
/// Accepts the submission form; the pipeline validates, geocodes
/// best-effort, and stores the post pending review.
pub async fn create_post(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Form<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let post = state
        .submission
        .create_post(
            identity.actor(),
            NewPost {
                title: req.title,
                content: req.content,
                lat: req.lat,
                lng: req.lng,
                image: req.image,
            },
        )
        .await?;

    Ok(HttpResponse::Created().json(CreatePostResponse {
        success: true,
        message: "Your story has been submitted and is awaiting review".to_string(),
        post: CreatedPost {
            id: post.id.to_string(),
            title: post.title,
            location: LocationDto::point(post.location.lng, post.location.lat),
        },
    }))
}

/// GET /api/posts
///
/// Posts visible to the caller: everything for admins, approved posts
/// for everyone else.
pub async fn list_posts(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let posts = state.visibility.list_posts(identity.actor()).await?;
    let responses = with_authors(&state, posts).await;
    Ok(HttpResponse::Ok().json(responses))
}

/// GET /api/posts/search?lat&lng&radius
///
/// Radius in metres, default 5000.
pub async fn search_posts(
    state: web::Data<AppState>,
    identity: Identity,
    query: web::Query<SearchQuery>,
) -> AppResult<HttpResponse> {
    let radius = query.radius.unwrap_or(DEFAULT_SEARCH_RADIUS_M);
    let posts = state
        .visibility
        .search_near(identity.actor(), query.lat, query.lng, radius)
        .await?;
    let responses = with_authors(&state, posts).await;
    Ok(HttpResponse::Ok().json(responses))
}

/// Attach minimal author info to listed posts. A missing author (user
/// deleted since) degrades to the bare id.
async fn with_authors(state: &AppState, posts: Vec<Post>) -> Vec<PostResponse> {
    let mut usernames: HashMap<Uuid, Option<String>> = HashMap::new();
    for post in &posts {
        if !usernames.contains_key(&post.author_id) {
            let username = match state.users.find_by_id(post.author_id).await {
                Ok(user) => user.map(|u| u.username),
                Err(e) => {
                    tracing::warn!(author_id = %post.author_id, error = %e, "author lookup failed");
                    None
                }
            };
            usernames.insert(post.author_id, username);
        }
    }

    posts
        .into_iter()
        .map(|post| PostResponse {
            id: post.id.to_string(),
            title: post.title,
            content: post.content,
            location: LocationDto::point(post.location.lng, post.location.lat),
            country: post.country,
            country_code: post.country_code,
            image: post.image,
            author: AuthorRef {
                id: post.author_id.to_string(),
                username: usernames.get(&post.author_id).cloned().flatten(),
            },
            is_pending: post.is_pending,
            created_at: post.created_at.to_rfc3339(),
        })
        .collect()
}
