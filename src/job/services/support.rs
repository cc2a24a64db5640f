//! Helpers shared by the job services.

use super::{JobServiceError, JobServiceResult};
use crate::config::TrackerConfig;
use crate::job::{
    domain::{Job, JobId, StaffName},
    ports::{Collection, JobStore, Revision, StaffDirectory, StoredJob},
};

/// Loads an active job or reports it missing.
pub(super) async fn load_active<S>(store: &S, id: JobId) -> JobServiceResult<StoredJob>
where
    S: JobStore + ?Sized,
{
    store
        .get(Collection::Active, id)
        .await?
        .ok_or(JobServiceError::NotFound(id))
}

/// Removes repeated identifiers, keeping first occurrences in order.
pub(super) fn unique_ids(job_ids: &[JobId]) -> JobServiceResult<Vec<JobId>> {
    let mut unique: Vec<JobId> = Vec::with_capacity(job_ids.len());
    for id in job_ids {
        if !unique.contains(id) {
            unique.push(*id);
        }
    }
    if unique.is_empty() {
        return Err(JobServiceError::EmptySelection);
    }
    Ok(unique)
}

/// Rejects actors missing from the directory when the configuration asks
/// for it. The system actor is always accepted.
pub(super) fn check_actor<D>(
    staff: &D,
    config: &TrackerConfig,
    actor: &StaffName,
) -> JobServiceResult<()>
where
    D: StaffDirectory + ?Sized,
{
    if !config.enforce_staff_directory
        || *actor == config.system_staff_name()
        || staff.contains(actor)
    {
        return Ok(());
    }
    Err(JobServiceError::UnknownStaff(actor.clone()))
}

/// Writes already-validated jobs one by one.
///
/// Nothing is rolled back when a write fails; see [`BatchProgress::fail`].
pub(super) async fn write_updates<S>(
    store: &S,
    operation: &'static str,
    planned: Vec<(Revision, Job)>,
) -> JobServiceResult<Vec<Job>>
where
    S: JobStore + ?Sized,
{
    let mut progress = BatchProgress::new(operation);
    let mut written = Vec::with_capacity(planned.len());
    for (revision, job) in planned {
        if let Err(err) = store.update(Collection::Active, &job, revision).await {
            return Err(progress.fail(job.id(), err));
        }
        progress.record(job.id());
        written.push(job);
    }
    Ok(written)
}

/// Tracks which jobs of a sequential batch have been written.
pub(super) struct BatchProgress {
    operation: &'static str,
    applied: Vec<JobId>,
}

impl BatchProgress {
    pub(super) const fn new(operation: &'static str) -> Self {
        Self {
            operation,
            applied: Vec::new(),
        }
    }

    pub(super) fn record(&mut self, id: JobId) {
        self.applied.push(id);
    }

    /// Converts a failure into the batch result.
    ///
    /// A failure before any write surfaces unchanged. After at least one
    /// write it becomes [`JobServiceError::PartialBatch`] naming the jobs
    /// already written.
    pub(super) fn fail(
        self,
        failed: JobId,
        failure: impl Into<JobServiceError>,
    ) -> JobServiceError {
        let err = failure.into();
        if self.applied.is_empty() {
            return err;
        }
        tracing::warn!(
            operation = self.operation,
            %failed,
            applied = self.applied.len(),
            error = %err,
            "batch stopped part-way; applied writes stand"
        );
        JobServiceError::PartialBatch {
            applied: self.applied,
            failed,
            source: Box::new(err),
        }
    }
}
