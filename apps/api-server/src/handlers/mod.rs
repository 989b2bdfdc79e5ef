//! HTTP handlers and route configuration.

mod admin;
mod auth;
mod health;
mod posts;


use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Auth routes
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/me", web::get().to(auth::me)),
            )
            // Story routes (authenticated)
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::list_posts))
                    .route("/create", web::post().to(posts::create_post))
                    .route("/search", web::get().to(posts::search_posts)),
            )
            // Moderation routes (admin capability checked in the services)
            .service(
                web::scope("/admin")
                    .route("/dashboard", web::get().to(admin::dashboard))
                    .route("/users", web::get().to(admin::list_users))
                    .route("/users/{id}/status", web::post().to(admin::set_user_status))
                    .route("/posts/{id}/approve", web::post().to(admin::approve_post))
                    .route("/posts/{id}/reject", web::post().to(admin::reject_post))
                    .route("/posts/{id}/delete", web::post().to(admin::delete_post)),
            ),
    );
}
