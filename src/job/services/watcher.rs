//! Stage-change detection by diffing successive store snapshots.

use crate::config::TrackerConfig;
use crate::job::{
    domain::{Job, JobId, Stage, StaffName},
    ports::{
        Collection, JobStore, JobStoreResult, StageChange, StageChangeNotifier, StoreSnapshot,
    },
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};

/// Turns active-collection snapshots into stage-change notifications.
///
/// [`StageChangeWatcher::attach`] primes the watcher from the store before
/// the first snapshot arrives. A notification is then sent for every known
/// job whose stage moved forward; new and removed jobs are not reported.
/// Stages never move backwards, so a backward difference only means a
/// snapshot older than the primed state and is skipped.
pub struct StageChangeWatcher<N>
where
    N: StageChangeNotifier,
{
    notifier: Arc<N>,
    system_actor: StaffName,
    previous: Option<HashMap<JobId, Stage>>,
}

impl<N> StageChangeWatcher<N>
where
    N: StageChangeNotifier,
{
    /// Creates a watcher delivering to `notifier`.
    #[must_use]
    pub fn new(notifier: Arc<N>, config: &TrackerConfig) -> Self {
        Self {
            notifier,
            system_actor: config.system_staff_name(),
            previous: None,
        }
    }

    /// Replaces the known stages with those of `jobs`.
    pub fn prime(&mut self, jobs: &[Job]) {
        self.previous = Some(stages_of(jobs));
    }

    /// Subscribes to `store` and primes the watcher from the current active
    /// collection, returning the receiver to hand to [`Self::run`].
    ///
    /// The subscription is taken before the read so no write between the two
    /// is missed.
    ///
    /// # Errors
    ///
    /// Returns the store error when the active collection cannot be read.
    pub async fn attach<S>(
        &mut self,
        store: &S,
    ) -> JobStoreResult<broadcast::Receiver<StoreSnapshot>>
    where
        S: JobStore + ?Sized,
    {
        let receiver = store.subscribe();
        let jobs: Vec<Job> = store
            .get_all(Collection::Active)
            .await?
            .into_iter()
            .map(|stored| stored.job)
            .collect();
        self.prime(&jobs);
        tracing::debug!(jobs = jobs.len(), "stage watcher primed");
        Ok(receiver)
    }

    /// Records `snapshot` and returns the stage changes since the previous
    /// one. Trash snapshots are ignored, and a watcher that was never primed
    /// treats its first snapshot as the baseline.
    pub fn observe(&mut self, snapshot: &StoreSnapshot) -> Vec<StageChange> {
        if snapshot.collection != Collection::Active {
            return Vec::new();
        }

        let Some(previous) = self.previous.replace(stages_of(&snapshot.jobs)) else {
            return Vec::new();
        };

        snapshot
            .jobs
            .iter()
            .filter_map(|job| {
                let from = *previous.get(&job.id())?;
                let to = job.current_stage();
                (to > from).then(|| StageChange {
                    job_id: job.id(),
                    model: job.model().to_owned(),
                    from,
                    to,
                    actor: job
                        .history()
                        .latest()
                        .map_or_else(|| self.system_actor.clone(), |entry| {
                            entry.staff_name.clone()
                        }),
                })
            })
            .collect()
    }

    /// Observes `snapshot` and delivers every change, returning how many
    /// were delivered. Delivery failures are logged and skipped.
    pub fn observe_and_notify(&mut self, snapshot: &StoreSnapshot) -> usize {
        let mut delivered = 0;
        for change in self.observe(snapshot) {
            match self.notifier.notify(&change) {
                Ok(()) => delivered += 1,
                Err(err) => tracing::warn!(
                    job_id = %change.job_id,
                    from = change.from.as_str(),
                    to = change.to.as_str(),
                    error = %err,
                    "stage change notification failed"
                ),
            }
        }
        delivered
    }

    /// Consumes snapshots until the store drops its sender.
    ///
    /// Missed snapshots are logged; the next snapshot received still carries
    /// the full collection, so changes made meanwhile are reported together.
    pub async fn run(mut self, mut receiver: broadcast::Receiver<StoreSnapshot>) {
        loop {
            match receiver.recv().await {
                Ok(snapshot) => {
                    self.observe_and_notify(&snapshot);
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "stage watcher lagged behind store snapshots");
                }
                Err(RecvError::Closed) => break,
            }
        }
        tracing::debug!("stage watcher stopped");
    }
}

fn stages_of(jobs: &[Job]) -> HashMap<JobId, Stage> {
    jobs.iter()
        .map(|job| (job.id(), job.current_stage()))
        .collect()
}
