//! # StoryMap Infrastructure
//!
//! Concrete implementations of the ports defined in `storymap-core`:
//! database repositories, the Nominatim reverse-geocoding client, and
//! the authentication services.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - In-memory repositories only, no external services
//! - `postgres` - PostgreSQL database support via SeaORM
//! - `auth` - JWT + Argon2 authentication

pub mod database;
pub mod geocode;

#[cfg(feature = "auth")]
pub mod auth;

// Re-exports - In-Memory
pub use database::{InMemoryPostRepository, InMemoryUserRepository};
pub use geocode::{NominatimConfig, NominatimGeocoder};

#[cfg(feature = "postgres")]
pub use database::DatabaseConnection;

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, JwtTokenService};
