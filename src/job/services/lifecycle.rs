//! Service layer for stage changes, edits and job listings.

use super::{
    JobServiceError, JobServiceResult,
    support::{check_actor, load_active, unique_ids, write_updates},
};
use crate::config::TrackerConfig;
use crate::job::{
    domain::{
        DashboardSummary, GroupKey, Job, JobDomainError, JobEdit, JobFilter, JobGroup, JobId,
        Stage, StaffName, list_groups,
    },
    ports::{Collection, JobStore, StaffDirectory},
};
use mockable::Clock;
use std::sync::Arc;

/// Job lifecycle orchestration service.
#[derive(Clone)]
pub struct JobLifecycleService<S, D, C>
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

impl<S, D, C> JobLifecycleService<S, D, C>
where
    S: JobStore,
    D: StaffDirectory,
    C: Clock + Send + Sync,
{
    /// Creates a new job lifecycle service.
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

    /// Moves every selected job to `target`.
    ///
    /// All jobs are validated before anything is written. Repeated
    /// identifiers are applied once.
    ///
    /// # Errors
    ///
    /// Returns [`JobServiceError::Domain`] when any job cannot reach
    /// `target`, [`JobServiceError::NotFound`] for an unknown identifier,
    /// [`JobServiceError::UnknownStaff`] for a rejected actor, and
    /// [`JobServiceError::PartialBatch`] when a write fails after earlier
    /// writes were applied.
    pub async fn advance_stage(
        &self,
        job_ids: &[JobId],
        target: Stage,
        actor: StaffName,
    ) -> JobServiceResult<Vec<Job>> {
        self.plan_and_advance(job_ids, actor, "advance_stage", |_| Ok(target))
            .await
    }

    /// Moves every selected job to its own next stage.
    ///
    /// # Errors
    ///
    /// Returns [`JobDomainError::NoNextStage`] (wrapped) when a selected job
    /// is already complete; otherwise as [`Self::advance_stage`].
    pub async fn advance_to_next(
        &self,
        job_ids: &[JobId],
        actor: StaffName,
    ) -> JobServiceResult<Vec<Job>> {
        self.plan_and_advance(job_ids, actor, "advance_to_next", |job| {
            job.next_stage()
                .ok_or_else(|| JobDomainError::NoNextStage(job.id()))
        })
        .await
    }

    /// Moves every member of a group that is behind `target` up to it.
    ///
    /// Members already at or past `target` are left alone. Each member is an
    /// independent conditional write.
    ///
    /// # Errors
    ///
    /// Returns [`JobServiceError::EmptyGroup`] when no active job carries
    /// `key`; otherwise as [`Self::advance_stage`].
    pub async fn advance_group(
        &self,
        key: GroupKey,
        target: Stage,
        actor: StaffName,
    ) -> JobServiceResult<Vec<Job>> {
        check_actor(&*self.staff, &self.config, &actor)?;
        let members: Vec<_> = self
            .store
            .get_all(Collection::Active)
            .await?
            .into_iter()
            .filter(|stored| stored.job.group_key() == key)
            .collect();
        if members.is_empty() {
            return Err(JobServiceError::EmptyGroup(key));
        }

        let mut planned = Vec::with_capacity(members.len());
        for stored in members {
            if stored.job.current_stage() >= target {
                continue;
            }
            let mut job = stored.job;
            job.advance(target, actor.clone(), &*self.clock)?;
            planned.push((stored.revision, job));
        }

        let written = write_updates(&*self.store, "advance_group", planned).await?;
        tracing::info!(
            group = %key,
            stage = target.as_str(),
            actor = %actor,
            advanced = written.len(),
            "advanced group"
        );
        Ok(written)
    }

    /// Applies a metadata edit to one job.
    ///
    /// # Errors
    ///
    /// Returns [`JobServiceError::NotFound`], a wrapped domain validation
    /// error, or a store error such as a revision conflict.
    pub async fn edit_job(&self, job_id: JobId, edit: JobEdit) -> JobServiceResult<Job> {
        let stored = load_active(&*self.store, job_id).await?;
        let mut job = stored.job;
        job.apply_edit(edit, &*self.clock)?;
        self.store
            .update(Collection::Active, &job, stored.revision)
            .await?;
        tracing::debug!(job_id = %job_id, "edited job");
        Ok(job)
    }

    /// Retrieves an active job.
    ///
    /// Returns `Ok(None)` when no active job has the identifier.
    ///
    /// # Errors
    ///
    /// Returns [`JobServiceError::Store`] when the lookup fails.
    pub async fn find_job(&self, job_id: JobId) -> JobServiceResult<Option<Job>> {
        let stored = self.store.get(Collection::Active, job_id).await?;
        Ok(stored.map(|stored| stored.job))
    }

    /// Lists every active job, most recently updated first.
    ///
    /// # Errors
    ///
    /// Returns [`JobServiceError::Store`] when the read fails.
    pub async fn list_jobs(&self) -> JobServiceResult<Vec<Job>> {
        let mut jobs: Vec<Job> = self
            .store
            .get_all(Collection::Active)
            .await?
            .into_iter()
            .map(|stored| stored.job)
            .collect();
        jobs.sort_by(|a, b| {
            b.updated_at()
                .cmp(&a.updated_at())
                .then_with(|| a.id().cmp(&b.id()))
        });
        Ok(jobs)
    }

    /// Lists the active jobs passing `filter`, most recently updated first.
    ///
    /// # Errors
    ///
    /// Returns [`JobServiceError::Store`] when the read fails.
    pub async fn list_filtered(&self, filter: JobFilter) -> JobServiceResult<Vec<Job>> {
        Ok(filter.apply(&self.list_jobs().await?))
    }

    /// Groups the active jobs passing `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`JobServiceError::Store`] when the read fails.
    pub async fn list_groups(&self, filter: JobFilter) -> JobServiceResult<Vec<JobGroup>> {
        Ok(list_groups(&self.list_filtered(filter).await?))
    }

    /// Counts groups for the dashboard.
    ///
    /// # Errors
    ///
    /// Returns [`JobServiceError::Store`] when the read fails.
    pub async fn dashboard_summary(&self) -> JobServiceResult<DashboardSummary> {
        let groups = list_groups(&self.list_jobs().await?);
        Ok(DashboardSummary::from_groups(&groups))
    }

    /// Removes every active job. The trash is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`JobServiceError::Store`] when the store rejects the clear.
    pub async fn reset_jobs(&self) -> JobServiceResult<()> {
        self.store.clear(Collection::Active).await?;
        tracing::warn!("cleared every active job");
        Ok(())
    }

    /// Returns the staff names offered for attribution.
    #[must_use]
    pub fn staff_names(&self) -> Vec<StaffName> {
        self.staff.names()
    }

    async fn plan_and_advance<F>(
        &self,
        job_ids: &[JobId],
        actor: StaffName,
        operation: &'static str,
        target_for: F,
    ) -> JobServiceResult<Vec<Job>>
    where
        F: Fn(&Job) -> Result<Stage, JobDomainError> + Send,
    {
        check_actor(&*self.staff, &self.config, &actor)?;
        let ids = unique_ids(job_ids)?;

        let mut planned = Vec::with_capacity(ids.len());
        for id in ids {
            let stored = load_active(&*self.store, id).await?;
            let mut job = stored.job;
            let target = target_for(&job)?;
            job.advance(target, actor.clone(), &*self.clock)?;
            planned.push((stored.revision, job));
        }

        let written = write_updates(&*self.store, operation, planned).await?;
        for job in &written {
            tracing::info!(
                job_id = %job.id(),
                stage = job.current_stage().as_str(),
                actor = %actor,
                "advanced job"
            );
        }
        Ok(written)
    }
}
