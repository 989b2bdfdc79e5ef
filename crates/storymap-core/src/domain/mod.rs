//! Domain entities - the core business objects.

mod actor;
mod geo;
mod post;
mod user;

pub use actor::Actor;
pub use geo::GeoPoint;
pub use post::Post;
pub use user::User;
