//! Application state - shared across all handlers.

use std::sync::Arc;

use storymap_core::ports::{Geocoder, PostRepository, UserRepository};
use storymap_core::services::{
    AccountService, BackfillService, DashboardService, ModerationService, SubmissionService,
    VisibilityFilter,
};
use storymap_infra::database::{DatabaseConfig, InMemoryPostRepository, InMemoryUserRepository};

#[cfg(feature = "postgres")]
use storymap_infra::database::{
    DatabaseConnection, PostgresPostRepository, PostgresUserRepository,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub submission: Arc<SubmissionService>,
    pub moderation: Arc<ModerationService>,
    pub visibility: Arc<VisibilityFilter>,
    pub backfill: Arc<BackfillService>,
    pub dashboard: Arc<DashboardService>,
    pub accounts: Arc<AccountService>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(db_config: Option<&DatabaseConfig>, geocoder: Arc<dyn Geocoder>) -> Self {
        #[cfg(feature = "postgres")]
        let (users, posts): (Arc<dyn UserRepository>, Arc<dyn PostRepository>) = {
            if let Some(config) = db_config {
                match DatabaseConnection::init(config).await {
                    Ok(db) => (
                        Arc::new(PostgresUserRepository::new(db.conn.clone())),
                        Arc::new(PostgresPostRepository::new(db.conn)),
                    ),
                    Err(e) => {
                        tracing::error!(
                            "Failed to connect to database: {}. Using in-memory fallback.",
                            e
                        );
                        in_memory_repos()
                    }
                }
            } else {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                in_memory_repos()
            }
        };

        #[cfg(not(feature = "postgres"))]
        let (users, posts): (Arc<dyn UserRepository>, Arc<dyn PostRepository>) = {
            let _ = db_config;
            tracing::info!("Running without postgres feature - using in-memory repositories");
            in_memory_repos()
        };

        tracing::info!("Application state initialized");
        Self::with_repos(users, posts, geocoder)
    }

    /// Wire the services onto the given repositories.
    pub fn with_repos(
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
        geocoder: Arc<dyn Geocoder>,
    ) -> Self {
        let submission = Arc::new(SubmissionService::new(posts.clone(), geocoder.clone()));
        let moderation = Arc::new(ModerationService::new(posts.clone()));
        let visibility = Arc::new(VisibilityFilter::new(posts.clone()));
        let backfill = Arc::new(BackfillService::new(posts.clone(), geocoder));
        let dashboard = Arc::new(DashboardService::new(
            users.clone(),
            posts.clone(),
            backfill.clone(),
        ));
        let accounts = Arc::new(AccountService::new(users.clone()));

        Self {
            users,
            posts,
            submission,
            moderation,
            visibility,
            backfill,
            dashboard,
            accounts,
        }
    }
}

fn in_memory_repos() -> (Arc<dyn UserRepository>, Arc<dyn PostRepository>) {
    (
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(InMemoryPostRepository::new()),
    )
}
