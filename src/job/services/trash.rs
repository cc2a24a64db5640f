//! Service layer for the trash: soft deletion, restore, purge and retention.

use super::{
    JobServiceError, JobServiceResult,
    support::{BatchProgress, check_actor, load_active, unique_ids},
};
use crate::config::TrackerConfig;
use crate::job::{
    domain::{Job, JobId, StaffName},
    ports::{Collection, JobStore, Revision, StaffDirectory, StoredJob},
};
use mockable::Clock;
use std::cmp::Reverse;
use std::sync::Arc;

/// Trash orchestration service.
#[derive(Clone)]
pub struct TrashService<S, D, C>
where
    S: JobStore,
    D: StaffDirectory,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    staff: Arc<D>,
    clock: Arc<C>,
    config: Arc<TrackerConfig>,
}

impl<S, D, C> TrashService<S, D, C>
where
    S: JobStore,
    D: StaffDirectory,
    C: Clock + Send + Sync,
{
    /// Creates a new trash service.
    #[must_use]
    pub const fn new(
        store: Arc<S>,
        staff: Arc<D>,
        clock: Arc<C>,
        config: Arc<TrackerConfig>,
    ) -> Self {
        Self {
            store,
            staff,
            clock,
            config,
        }
    }

    /// Moves the selected jobs to the trash, returning the trash records.
    ///
    /// Each job is copied to the trash before its active record is removed.
    /// The removal only succeeds if the active record is still at the
    /// revision that was read; otherwise, or if the removal fails, the copy
    /// is withdrawn, so a job is never left in both collections by this call
    /// and a concurrent write is never discarded.
    ///
    /// # Errors
    ///
    /// Returns [`JobServiceError::NotFound`] before any write when a job is
    /// not active, a store conflict when a job changed after it was read,
    /// and [`JobServiceError::PartialBatch`] when a later job
    /// fails after earlier ones were moved.
    pub async fn soft_delete_jobs(
        &self,
        job_ids: &[JobId],
        actor: StaffName,
    ) -> JobServiceResult<Vec<Job>> {
        check_actor(&*self.staff, &self.config, &actor)?;
        let ids = unique_ids(job_ids)?;

        let mut loaded = Vec::with_capacity(ids.len());
        for id in ids {
            loaded.push(load_active(&*self.store, id).await?);
        }

        let mut progress = BatchProgress::new("soft_delete_jobs");
        let mut trashed = Vec::with_capacity(loaded.len());
        for StoredJob { revision, mut job } in loaded {
            let id = job.id();
            job.mark_deleted(actor.clone(), &*self.clock);
            if let Err(err) = self.move_to_trash(&job, revision).await {
                return Err(progress.fail(id, err));
            }
            progress.record(id);
            tracing::info!(job_id = %id, actor = %actor, "moved job to trash");
            trashed.push(job);
        }
        Ok(trashed)
    }

    /// Moves a trash record back to the active collection with its deletion
    /// mark stripped.
    ///
    /// Records past the retention window can still be restored until they
    /// are purged.
    ///
    /// # Errors
    ///
    /// Returns [`JobServiceError::NotInTrash`] when no trash record exists,
    /// or a store error when either write fails.
    pub async fn restore_job(&self, job_id: JobId) -> JobServiceResult<Job> {
        let StoredJob { revision, mut job } = self
            .store
            .get(Collection::Trash, job_id)
            .await?
            .ok_or(JobServiceError::NotInTrash(job_id))?;
        job.restore(&*self.clock);

        self.store.set(Collection::Active, &job).await?;
        if let Err(err) = self
            .store
            .remove_if_current(Collection::Trash, job_id, revision)
            .await
        {
            self.withdraw(Collection::Active, job_id).await;
            return Err(err.into());
        }
        tracing::info!(job_id = %job_id, "restored job from trash");
        Ok(job)
    }

    /// Permanently removes one trash record.
    ///
    /// # Errors
    ///
    /// Returns [`JobServiceError::NotInTrash`] when no trash record exists,
    /// or a store error when the removal fails.
    pub async fn purge_job(&self, job_id: JobId) -> JobServiceResult<()> {
        if self.store.get(Collection::Trash, job_id).await?.is_none() {
            return Err(JobServiceError::NotInTrash(job_id));
        }
        self.store.remove(Collection::Trash, job_id).await?;
        tracing::info!(job_id = %job_id, "purged job");
        Ok(())
    }

    /// Permanently removes every trash record.
    ///
    /// # Errors
    ///
    /// Returns [`JobServiceError::Store`] when the store rejects the clear.
    pub async fn clear_trash(&self) -> JobServiceResult<()> {
        self.store.clear(Collection::Trash).await?;
        tracing::info!("cleared trash");
        Ok(())
    }

    /// Lists trash records inside the retention window, most recently
    /// deleted first.
    ///
    /// Expired records are purged during the read when the configuration
    /// asks for it. A failed purge is logged and retried on a later read.
    ///
    /// # Errors
    ///
    /// Returns [`JobServiceError::Store`] when the read fails.
    pub async fn list_trash(&self) -> JobServiceResult<Vec<Job>> {
        let records: Vec<Job> = self
            .store
            .get_all(Collection::Trash)
            .await?
            .into_iter()
            .map(|stored| stored.job)
            .collect();
        let (mut visible, expired) = self
            .config
            .retention()
            .partition(records, self.clock.utc());

        if self.config.purge_expired_on_read {
            for job in &expired {
                match self.store.remove(Collection::Trash, job.id()).await {
                    Ok(()) => tracing::debug!(job_id = %job.id(), "purged expired trash record"),
                    Err(err) => tracing::warn!(
                        job_id = %job.id(),
                        error = %err,
                        "failed to purge expired trash record"
                    ),
                }
            }
        }

        visible.sort_by_key(|job| Reverse(job.deletion().map(|deletion| deletion.deleted_at)));
        Ok(visible)
    }

    async fn move_to_trash(&self, job: &Job, revision: Revision) -> JobServiceResult<()> {
        self.store.set(Collection::Trash, job).await?;
        if let Err(err) = self
            .store
            .remove_if_current(Collection::Active, job.id(), revision)
            .await
        {
            self.withdraw(Collection::Trash, job.id()).await;
            return Err(err.into());
        }
        Ok(())
    }

    async fn withdraw(&self, collection: Collection, job_id: JobId) {
        if let Err(err) = self.store.remove(collection, job_id).await {
            tracing::warn!(
                job_id = %job_id,
                collection = %collection,
                error = %err,
                "failed to withdraw copy after a move failed"
            );
        }
    }
}
