//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod geocoder;
mod repository;

pub use auth::{AuthError, PasswordService, TokenClaims, TokenService};
pub use geocoder::{CountryInfo, Geocoder};
pub use repository::{BaseRepository, CountryCount, PostRepository, UserRepository};
