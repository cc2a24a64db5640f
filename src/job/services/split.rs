//! Service layer for handing part of a job's quantity to a later stage.

use super::{
    JobServiceError, JobServiceResult,
    support::{BatchProgress, check_actor, load_active, unique_ids},
};
use crate::config::TrackerConfig;
use crate::job::{
    domain::{Job, JobDomainError, JobId, SplitOutcome, Stage, StaffName, split_batch},
    ports::{Collection, JobStore, Revision, StaffDirectory, StoredJob},
};
use mockable::Clock;
use std::collections::HashMap;
use std::sync::Arc;

/// Split orchestration service.
#[derive(Clone)]
pub struct SplitService<S, D, C>
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

impl<S, D, C> SplitService<S, D, C>
where
    S: JobStore,
    D: StaffDirectory,
    C: Clock + Send + Sync,
{
    /// Creates a new split service.
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

    /// Moves the quantity given for each selected job to `target`.
    ///
    /// Every job and quantity is validated before the first write. Pieces
    /// split off members of one group share a fresh group, and members of
    /// that group moved in full join it; see [`split_batch`].
    ///
    /// # Errors
    ///
    /// Returns [`JobDomainError::InvalidQuantity`] (wrapped) when a job has
    /// no quantity in `quantities` or one outside `1..=quantity`, the other
    /// domain errors of [`split_batch`], [`JobServiceError::NotFound`] for an
    /// unknown job, and [`JobServiceError::PartialBatch`] when a write
    /// fails after earlier jobs were split.
    pub async fn split_job(
        &self,
        job_ids: &[JobId],
        quantities: &HashMap<JobId, u32>,
        target: Stage,
        actor: StaffName,
    ) -> JobServiceResult<Vec<SplitOutcome>> {
        check_actor(&*self.staff, &self.config, &actor)?;
        let ids = unique_ids(job_ids)?;

        let mut sources: Vec<StoredJob> = Vec::with_capacity(ids.len());
        for id in ids {
            sources.push(load_active(&*self.store, id).await?);
        }
        let mut moves = Vec::with_capacity(sources.len());
        for stored in &sources {
            let id = stored.job.id();
            let move_quantity =
                quantities
                    .get(&id)
                    .copied()
                    .ok_or(JobDomainError::InvalidQuantity {
                        job_id: id,
                        requested: 0,
                        available: stored.job.quantity(),
                    })?;
            moves.push((&stored.job, move_quantity));
        }
        let outcomes = split_batch(moves, target, &actor, &*self.clock)?;
        let planned: Vec<(Revision, SplitOutcome)> = sources
            .iter()
            .map(|stored| stored.revision)
            .zip(outcomes)
            .collect();

        let mut progress = BatchProgress::new("split_job");
        let mut written = Vec::with_capacity(planned.len());
        for (revision, outcome) in planned {
            let id = outcome.original.id();
            if let Err(err) = self.write_outcome(revision, &outcome).await {
                return Err(progress.fail(id, err));
            }
            progress.record(id);
            let moved = outcome
                .piece
                .as_ref()
                .map_or(outcome.original.quantity(), Job::quantity);
            tracing::info!(
                job_id = %id,
                moved,
                stage = target.as_str(),
                actor = %actor,
                "split job"
            );
            written.push(outcome);
        }
        Ok(written)
    }

    /// Splits one job.
    ///
    /// # Errors
    ///
    /// As [`Self::split_job`].
    pub async fn split_one(
        &self,
        job_id: JobId,
        move_quantity: u32,
        target: Stage,
        actor: StaffName,
    ) -> JobServiceResult<SplitOutcome> {
        let quantities = HashMap::from([(job_id, move_quantity)]);
        let mut outcomes = self
            .split_job(&[job_id], &quantities, target, actor)
            .await?;
        outcomes
            .pop()
            .ok_or(JobServiceError::EmptySelection)
    }

    /// Writes the piece, then the reduced original. A failed original write
    /// removes the piece again so the quantity is never counted twice.
    async fn write_outcome(
        &self,
        revision: Revision,
        outcome: &SplitOutcome,
    ) -> JobServiceResult<()> {
        let Some(piece) = &outcome.piece else {
            self.store
                .update(Collection::Active, &outcome.original, revision)
                .await?;
            return Ok(());
        };

        self.store.set(Collection::Active, piece).await?;
        if let Err(err) = self
            .store
            .update(Collection::Active, &outcome.original, revision)
            .await
        {
            if let Err(cleanup) = self.store.remove(Collection::Active, piece.id()).await {
                tracing::warn!(
                    piece_id = %piece.id(),
                    error = %cleanup,
                    "failed to remove split piece after original write failed"
                );
            }
            return Err(err.into());
        }
        Ok(())
    }
}
