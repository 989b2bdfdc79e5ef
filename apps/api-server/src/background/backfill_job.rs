//! Scheduled country backfill.
//!
//! Registers an hourly cron job that enriches posts the inline
//! geocoding missed. The dashboard runs its own smaller batch, so a
//! scheduler failure is logged and the server keeps going.

use std::sync::Arc;

use tokio_cron_scheduler::{Job, JobScheduler};

use storymap_core::services::BackfillService;

/// Top of every hour.
const BACKFILL_SCHEDULE: &str = "0 0 * * * *";

/// Posts enriched per scheduled run.
const SCHEDULED_BACKFILL_BATCH: u64 = 50;

fn schedule_enabled() -> bool {
    std::env::var("SCHEDULER_ENABLED")
        .map(|v| v != "false" && v != "0")
        .unwrap_or(true)
}

/// Register and start the hourly backfill. Returns the scheduler handle
/// so it lives as long as the server; `None` means the schedule is
/// disabled or could not be set up.
pub async fn start_backfill_schedule(backfill: Arc<BackfillService>) -> Option<JobScheduler> {
    if !schedule_enabled() {
        tracing::info!("Backfill schedule disabled");
        return None;
    }

    let job = Job::new_async(BACKFILL_SCHEDULE, move |_id, _lock| {
        let backfill = backfill.clone();
        Box::pin(async move {
            match backfill
                .backfill_missing_country(SCHEDULED_BACKFILL_BATCH)
                .await
            {
                Ok(enriched) => tracing::info!(enriched, "scheduled country backfill completed"),
                Err(e) => tracing::warn!(error = %e, "scheduled country backfill failed"),
            }
        })
    });

    let job = match job {
        Ok(j) => j,
        Err(e) => {
            tracing::error!(error = %e, "failed to build backfill job");
            return None;
        }
    };

    let scheduler = match JobScheduler::new().await {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "failed to create scheduler");
            return None;
        }
    };

    if let Err(e) = scheduler.add(job).await {
        tracing::error!(error = %e, "failed to register backfill job");
        return None;
    }
    if let Err(e) = scheduler.start().await {
        tracing::error!(error = %e, "failed to start scheduler");
        return None;
    }

    tracing::info!(schedule = BACKFILL_SCHEDULE, "Hourly country backfill scheduled");
    Some(scheduler)
}
