//! Background job scheduler.
//!
//! Initialises a [`JobScheduler`] at server startup and registers the
//! limiter housekeeping job.

use std::{sync::Arc, time::Duration};

use menudeals_feed::SlidingWindowLimiter;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

/// Builds and starts the background job scheduler.
///
/// Returns the running [`JobScheduler`] handle, which must be kept alive
/// for the lifetime of the process. Dropping it shuts down all jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// the job cannot be registered, or the scheduler fails to start.
pub async fn build_scheduler(
    limiter: Arc<SlidingWindowLimiter>,
    every: Duration,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    register_cleanup_job(&scheduler, limiter, every).await?;

    scheduler.start().await?;
    Ok(scheduler)
}

/// Register the idle-caller sweep.
///
/// Drops limiter entries whose timestamps have all left the window so the
/// history map only holds callers seen recently.
async fn register_cleanup_job(
    scheduler: &JobScheduler,
    limiter: Arc<SlidingWindowLimiter>,
    every: Duration,
) -> Result<(), JobSchedulerError> {
    let job = Job::new_repeated_async(every, move |_uuid, _lock| {
        let limiter = Arc::clone(&limiter);

        Box::pin(async move {
            let removed = limiter.cleanup();
            if removed > 0 {
                tracing::debug!(
                    removed,
                    tracked = limiter.tracked_identities(),
                    "scheduler: pruned idle rate-limit callers"
                );
            }
        })
    })?;

    scheduler.add(job).await?;
    Ok(())
}
