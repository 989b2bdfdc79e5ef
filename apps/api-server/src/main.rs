//! # StoryMap API Server
//!
//! The main entry point for the Actix-web HTTP server.

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

mod config;
mod handlers;
mod middleware;
mod state;

#[cfg(feature = "scheduler")]
mod background;

use config::AppConfig;
use state::AppState;
use storymap_core::ports::Geocoder;
#[cfg(feature = "auth")]
use storymap_core::ports::{PasswordService, TokenService};
use storymap_infra::geocode::{NominatimConfig, NominatimGeocoder};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    init_tracing();

    // Load configuration
    let config = AppConfig::from_env();

    tracing::info!(
        "Starting StoryMap API Server on {}:{}",
        config.host,
        config.port
    );

    // Reverse-geocoding client (bounded timeout, fixed User-Agent)
    let geocoder: Arc<dyn Geocoder> = Arc::new(
        NominatimGeocoder::new(NominatimConfig::from_env())
            .map_err(|e| std::io::Error::other(format!("failed to build geocoder: {e}")))?,
    );

    // Build application state
    let state = AppState::new(config.database.as_ref(), geocoder).await;

    // Auth services
    #[cfg(feature = "auth")]
    let (token_service, password_service): (Arc<dyn TokenService>, Arc<dyn PasswordService>) = (
        Arc::new(storymap_infra::auth::JwtTokenService::from_env()),
        Arc::new(storymap_infra::auth::Argon2PasswordService::new()),
    );

    // Hourly country backfill
    #[cfg(feature = "scheduler")]
    let _scheduler = background::start_backfill_schedule(state.backfill.clone()).await;

    // Start HTTP server
    let app_state = state.clone();
    HttpServer::new(move || {
        let app = App::new()
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(app_state.clone()));

        #[cfg(feature = "auth")]
        let app = app
            .app_data(web::Data::new(token_service.clone()))
            .app_data(web::Data::new(password_service.clone()));

        app.configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,api_server=debug,storymap_infra=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().pretty())
        .init();
}
