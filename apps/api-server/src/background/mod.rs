//! Background processing.

mod backfill_job;

pub use backfill_job::start_backfill_schedule;
