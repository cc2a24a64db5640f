//! Store port for job documents and their change subscriptions.

use crate::job::domain::{Job, JobId};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::broadcast;

/// Result type for job store operations.
pub type JobStoreResult<T> = Result<T, JobStoreError>;

/// Collection a job document lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    /// Jobs in production.
    Active,
    /// Soft-deleted jobs awaiting restore or purge.
    Trash,
}

impl Collection {
    /// Returns the storage path of the collection.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "processes",
            Self::Trash => "deleted_processes",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Store-assigned revision of a document, bumped on every write.
///
/// Revisions of an identifier keep increasing across removal and
/// re-creation, so a revision read before a removal never matches again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Revision(u64);

impl Revision {
    /// Revision of a freshly written document.
    pub const INITIAL: Self = Self(1);

    /// Creates a revision from its numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the revision following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A job read from the store together with its revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredJob {
    /// Revision the job was read at.
    pub revision: Revision,
    /// Decoded job.
    pub job: Job,
}

/// Snapshot of a whole collection pushed to subscribers after each write.
#[derive(Debug, Clone)]
pub struct StoreSnapshot {
    /// Collection the snapshot describes.
    pub collection: Collection,
    /// Every job in the collection at the time of the write.
    pub jobs: Arc<[Job]>,
}

/// Job document store contract.
///
/// Implementations give document semantics keyed by [`JobId`]. Writes are
/// individually atomic; there are no multi-document transactions.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Reads one job.
    ///
    /// Returns `None` when no document exists under `id`.
    async fn get(&self, collection: Collection, id: JobId) -> JobStoreResult<Option<StoredJob>>;

    /// Reads every job in a collection.
    async fn get_all(&self, collection: Collection) -> JobStoreResult<Vec<StoredJob>>;

    /// Writes a job unconditionally, creating or overwriting the document.
    async fn set(&self, collection: Collection, job: &Job) -> JobStoreResult<Revision>;

    /// Replaces an existing job only if it is still at `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`JobStoreError::NotFound`] when the document does not exist,
    /// or [`JobStoreError::Conflict`] when another write landed first.
    async fn update(
        &self,
        collection: Collection,
        job: &Job,
        expected: Revision,
    ) -> JobStoreResult<Revision>;

    /// Removes a document. Removing a missing document succeeds.
    async fn remove(&self, collection: Collection, id: JobId) -> JobStoreResult<()>;

    /// Removes a document only if it is still at `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`JobStoreError::NotFound`] when the document does not exist,
    /// or [`JobStoreError::Conflict`] when another write landed first.
    async fn remove_if_current(
        &self,
        collection: Collection,
        id: JobId,
        expected: Revision,
    ) -> JobStoreResult<()>;

    /// Removes every document in a collection.
    async fn clear(&self, collection: Collection) -> JobStoreResult<()>;

    /// Subscribes to collection snapshots published after each write.
    fn subscribe(&self) -> broadcast::Receiver<StoreSnapshot>;
}

/// Errors returned by job store implementations.
#[derive(Debug, Clone, Error)]
pub enum JobStoreError {
    /// The document does not exist.
    #[error("job {id} not found in {collection}")]
    NotFound {
        /// Collection searched.
        collection: Collection,
        /// Missing identifier.
        id: JobId,
    },

    /// The document changed since it was read.
    #[error("job {id} was modified concurrently (expected revision {expected}, found {found})")]
    Conflict {
        /// Conflicting identifier.
        id: JobId,
        /// Revision the caller read.
        expected: Revision,
        /// Revision currently stored.
        found: Revision,
    },

    /// A document could not be encoded or decoded.
    #[error("job document serialization failed: {0}")]
    Serialization(Arc<serde_json::Error>),

    /// Persistence-layer failure (permission, connectivity, ...).
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl JobStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

impl From<serde_json::Error> for JobStoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(Arc::new(err))
    }
}
