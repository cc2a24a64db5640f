//! In-memory job document store.
//!
//! Jobs are kept as JSON documents so every read and write crosses the same
//! serialization boundary a remote document store would.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;

use crate::job::{
    domain::{Job, JobId},
    ports::{
        Collection, JobStore, JobStoreError, JobStoreResult, Revision, StoreSnapshot, StoredJob,
    },
};

const SNAPSHOT_CHANNEL_CAPACITY: usize = 64;

/// Write operations that can be made to fail for testing error paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    /// [`JobStore::set`].
    Set,
    /// [`JobStore::update`].
    Update,
    /// [`JobStore::remove`] and [`JobStore::remove_if_current`].
    Remove,
}

/// Thread-safe in-memory job store.
#[derive(Debug, Clone)]
pub struct InMemoryJobStore {
    state: Arc<RwLock<InMemoryStoreState>>,
    snapshots: broadcast::Sender<StoreSnapshot>,
}

#[derive(Debug, Default)]
struct InMemoryStoreState {
    collections: HashMap<Collection, HashMap<JobId, StoredDocument>>,
    retired: HashMap<(Collection, JobId), Revision>,
    failures: HashSet<(StoreOperation, Collection, JobId)>,
}

impl InMemoryStoreState {
    /// Revision the next write of `id` receives. Removed documents keep
    /// their last revision so a re-created document continues after it.
    fn next_revision(&self, collection: Collection, id: JobId) -> Revision {
        self.collections
            .get(&collection)
            .and_then(|documents| documents.get(&id))
            .map(|stored| stored.revision)
            .or_else(|| self.retired.get(&(collection, id)).copied())
            .map_or(Revision::INITIAL, Revision::next)
    }

    fn insert(&mut self, collection: Collection, id: JobId, document: Value) -> Revision {
        let revision = self.next_revision(collection, id);
        self.collections
            .entry(collection)
            .or_default()
            .insert(id, StoredDocument { revision, document });
        revision
    }

    fn take(&mut self, collection: Collection, id: JobId) -> Option<StoredDocument> {
        let removed = self
            .collections
            .get_mut(&collection)
            .and_then(|documents| documents.remove(&id))?;
        self.retired.insert((collection, id), removed.revision);
        Some(removed)
    }
}

#[derive(Debug, Clone)]
struct StoredDocument {
    revision: Revision,
    document: Value,
}

#[derive(Debug, thiserror::Error)]
#[error("injected {operation:?} failure for job {id} in {collection}")]
struct InjectedFailure {
    operation: StoreOperation,
    collection: Collection,
    id: JobId,
}

impl InMemoryJobStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        let (snapshots, _) = broadcast::channel(SNAPSHOT_CHANNEL_CAPACITY);
        Self {
            state: Arc::new(RwLock::new(InMemoryStoreState::default())),
            snapshots,
        }
    }

    /// Makes every future `operation` on `id` in `collection` fail with a
    /// persistence error until [`InMemoryJobStore::clear_failures`] is
    /// called.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when lock acquisition fails.
    pub fn fail_on(
        &self,
        operation: StoreOperation,
        collection: Collection,
        id: JobId,
    ) -> JobStoreResult<()> {
        let mut state = self.write_state()?;
        state.failures.insert((operation, collection, id));
        Ok(())
    }

    /// Removes every injected failure.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when lock acquisition fails.
    pub fn clear_failures(&self) -> JobStoreResult<()> {
        let mut state = self.write_state()?;
        state.failures.clear();
        Ok(())
    }

    /// Returns the raw stored document, for inspecting the stored shape.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when lock acquisition fails.
    pub fn raw_document(&self, collection: Collection, id: JobId) -> JobStoreResult<Option<Value>> {
        let state = self.read_state()?;
        Ok(state
            .collections
            .get(&collection)
            .and_then(|documents| documents.get(&id))
            .map(|stored| stored.document.clone()))
    }

    /// Writes a raw document, bypassing the domain encoding.
    ///
    /// # Errors
    ///
    /// Returns a serialization error when the document is not a valid job.
    pub fn insert_raw(&self, collection: Collection, document: Value) -> JobStoreResult<JobId> {
        let job: Job = serde_json::from_value(document.clone())?;
        let snapshot = {
            let mut state = self.write_state()?;
            state.insert(collection, job.id(), document);
            snapshot_of(&state, collection)?
        };
        self.publish(snapshot);
        Ok(job.id())
    }

    fn read_state(&self) -> JobStoreResult<std::sync::RwLockReadGuard<'_, InMemoryStoreState>> {
        self.state
            .read()
            .map_err(|err| JobStoreError::persistence(std::io::Error::other(err.to_string())))
    }

    fn write_state(&self) -> JobStoreResult<std::sync::RwLockWriteGuard<'_, InMemoryStoreState>> {
        self.state
            .write()
            .map_err(|err| JobStoreError::persistence(std::io::Error::other(err.to_string())))
    }

    fn publish(&self, snapshot: StoreSnapshot) {
        if self.snapshots.send(snapshot).is_err() {
            tracing::trace!("no snapshot subscribers");
        }
    }
}

impl Default for InMemoryJobStore {
    fn default() -> Self {
        Self::new()
    }
}

fn check_failure(
    state: &InMemoryStoreState,
    operation: StoreOperation,
    collection: Collection,
    id: JobId,
) -> JobStoreResult<()> {
    if state.failures.contains(&(operation, collection, id)) {
        return Err(JobStoreError::persistence(InjectedFailure {
            operation,
            collection,
            id,
        }));
    }
    Ok(())
}

fn decode(stored: &StoredDocument) -> JobStoreResult<StoredJob> {
    Ok(StoredJob {
        revision: stored.revision,
        job: serde_json::from_value(stored.document.clone())?,
    })
}

/// Decodes a collection, most recently updated first.
fn decode_all(state: &InMemoryStoreState, collection: Collection) -> JobStoreResult<Vec<StoredJob>> {
    let mut jobs = state
        .collections
        .get(&collection)
        .map(|documents| documents.values().map(decode).collect::<JobStoreResult<Vec<_>>>())
        .transpose()?
        .unwrap_or_default();
    jobs.sort_by(|a, b| {
        b.job
            .updated_at()
            .cmp(&a.job.updated_at())
            .then_with(|| a.job.id().cmp(&b.job.id()))
    });
    Ok(jobs)
}

fn snapshot_of(state: &InMemoryStoreState, collection: Collection) -> JobStoreResult<StoreSnapshot> {
    let jobs: Vec<Job> = decode_all(state, collection)?
        .into_iter()
        .map(|stored| stored.job)
        .collect();
    Ok(StoreSnapshot {
        collection,
        jobs: jobs.into(),
    })
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    async fn get(&self, collection: Collection, id: JobId) -> JobStoreResult<Option<StoredJob>> {
        let state = self.read_state()?;
        state
            .collections
            .get(&collection)
            .and_then(|documents| documents.get(&id))
            .map(decode)
            .transpose()
    }

    async fn get_all(&self, collection: Collection) -> JobStoreResult<Vec<StoredJob>> {
        let state = self.read_state()?;
        decode_all(&state, collection)
    }

    async fn set(&self, collection: Collection, job: &Job) -> JobStoreResult<Revision> {
        let document = serde_json::to_value(job)?;
        let (revision, snapshot) = {
            let mut state = self.write_state()?;
            check_failure(&state, StoreOperation::Set, collection, job.id())?;
            let revision = state.insert(collection, job.id(), document);
            (revision, snapshot_of(&state, collection)?)
        };
        self.publish(snapshot);
        Ok(revision)
    }

    async fn update(
        &self,
        collection: Collection,
        job: &Job,
        expected: Revision,
    ) -> JobStoreResult<Revision> {
        let document = serde_json::to_value(job)?;
        let (revision, snapshot) = {
            let mut state = self.write_state()?;
            check_failure(&state, StoreOperation::Update, collection, job.id())?;
            let stored = state
                .collections
                .get_mut(&collection)
                .and_then(|documents| documents.get_mut(&job.id()))
                .ok_or(JobStoreError::NotFound {
                    collection,
                    id: job.id(),
                })?;
            if stored.revision != expected {
                return Err(JobStoreError::Conflict {
                    id: job.id(),
                    expected,
                    found: stored.revision,
                });
            }
            stored.revision = stored.revision.next();
            stored.document = document;
            let revision = stored.revision;
            (revision, snapshot_of(&state, collection)?)
        };
        self.publish(snapshot);
        Ok(revision)
    }

    async fn remove(&self, collection: Collection, id: JobId) -> JobStoreResult<()> {
        let snapshot = {
            let mut state = self.write_state()?;
            check_failure(&state, StoreOperation::Remove, collection, id)?;
            if state.take(collection, id).is_none() {
                return Ok(());
            }
            snapshot_of(&state, collection)?
        };
        self.publish(snapshot);
        Ok(())
    }

    async fn remove_if_current(
        &self,
        collection: Collection,
        id: JobId,
        expected: Revision,
    ) -> JobStoreResult<()> {
        let snapshot = {
            let mut state = self.write_state()?;
            check_failure(&state, StoreOperation::Remove, collection, id)?;
            let found = state
                .collections
                .get(&collection)
                .and_then(|documents| documents.get(&id))
                .map(|stored| stored.revision)
                .ok_or(JobStoreError::NotFound { collection, id })?;
            if found != expected {
                return Err(JobStoreError::Conflict {
                    id,
                    expected,
                    found,
                });
            }
            state.take(collection, id);
            snapshot_of(&state, collection)?
        };
        self.publish(snapshot);
        Ok(())
    }

    async fn clear(&self, collection: Collection) -> JobStoreResult<()> {
        let snapshot = {
            let mut state = self.write_state()?;
            let ids: Vec<JobId> = state
                .collections
                .get(&collection)
                .map(|documents| documents.keys().copied().collect())
                .unwrap_or_default();
            for id in ids {
                state.take(collection, id);
            }
            snapshot_of(&state, collection)?
        };
        self.publish(snapshot);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<StoreSnapshot> {
        self.snapshots.subscribe()
    }
}
