//! Service-level errors shared by job services.

use crate::job::{
    domain::{GroupKey, JobDomainError, JobId, StaffName},
    ports::{CatalogError, JobStoreError},
};
use thiserror::Error;

/// Service-level errors for job operations.
#[derive(Debug, Error)]
pub enum JobServiceError {
    /// Domain validation failed; nothing was written.
    #[error(transparent)]
    Domain(#[from] JobDomainError),

    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] JobStoreError),

    /// Product lookup failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// No active job exists with the given identifier.
    #[error("job {0} not found")]
    NotFound(JobId),

    /// No trash record exists with the given identifier.
    #[error("job {0} is not in the trash")]
    NotInTrash(JobId),

    /// No active job belongs to the given group.
    #[error("no jobs in {0}")]
    EmptyGroup(GroupKey),

    /// The operation was called without any job identifiers.
    #[error("no jobs selected")]
    EmptySelection,

    /// The product code is not in the catalog.
    #[error("unknown product code: {0}")]
    UnknownProduct(String),

    /// The actor is not listed in the staff directory.
    #[error("staff member {0} is not in the directory")]
    UnknownStaff(StaffName),

    /// A batch stopped part-way; writes for `applied` jobs stand.
    #[error(
        "batch failed at job {failed} after {count} applied write(s)",
        count = .applied.len()
    )]
    PartialBatch {
        /// Jobs whose writes completed before the failure.
        applied: Vec<JobId>,
        /// Job whose write failed.
        failed: JobId,
        /// Underlying failure.
        #[source]
        source: Box<JobServiceError>,
    },
}

/// Result type for job service operations.
pub type JobServiceResult<T> = Result<T, JobServiceError>;
