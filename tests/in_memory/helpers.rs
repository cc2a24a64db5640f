//! Fixtures shared by the in-memory integration tests.

use caliper::config::TrackerConfig;
use caliper::job::{domain::Job, services::JobRequest};
use rstest::fixture;

use crate::test_helpers::Tracker;

/// Provides a tracker with the default configuration.
#[fixture]
pub fn tracker() -> Tracker {
    Tracker::with_config(TrackerConfig::default()).expect("default config is valid")
}

/// Requests a single job for `code` and returns it.
///
/// # Errors
///
/// Returns an error if the request is rejected or yields more than one job.
pub async fn request_single(tracker: &Tracker, code: &str, quantity: u32) -> eyre::Result<Job> {
    let jobs = tracker
        .requests()
        .request_job(JobRequest::new(code, quantity).with_author("홍길동"))
        .await?;
    let [job] = <[Job; 1]>::try_from(jobs)
        .map_err(|rest| eyre::eyre!("expected one job, got {}", rest.len()))?;
    Ok(job)
}

/// Requests a left/right pair for `code` and returns both halves.
///
/// # Errors
///
/// Returns an error if the request is rejected or does not yield a pair.
pub async fn request_pair(
    tracker: &Tracker,
    code: &str,
    quantity: u32,
) -> eyre::Result<(Job, Job)> {
    let jobs = tracker
        .requests()
        .request_job(
            JobRequest::new(code, quantity)
                .paired()
                .with_author("홍길동"),
        )
        .await?;
    let [left, right] = <[Job; 2]>::try_from(jobs)
        .map_err(|rest| eyre::eyre!("expected a pair, got {}", rest.len()))?;
    Ok((left, right))
}
