//! Domain services - the moderation workflow around the ports.

mod accounts;
mod backfill;
mod dashboard;
mod moderation;
mod submission;
mod visibility;

pub use accounts::AccountService;
pub use backfill::BackfillService;
pub use dashboard::{CountryShare, DashboardService, DashboardStats, DASHBOARD_BACKFILL_BATCH};
pub use moderation::{ModerationService, Rejection};
pub use submission::{NewPost, SubmissionService};
pub use visibility::{VisibilityFilter, DEFAULT_SEARCH_RADIUS_M};

#[cfg(test)]
pub(crate) mod testing;
