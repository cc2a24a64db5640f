//! Error types for job domain validation and parsing.

use super::{JobId, Stage};
use thiserror::Error;

/// Errors returned while constructing or mutating domain job values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JobDomainError {
    /// The catalog code is empty after trimming.
    #[error("job code must not be empty")]
    EmptyCode,

    /// The model name is empty after trimming.
    #[error("job model must not be empty")]
    EmptyModel,

    /// The staff name is empty after trimming.
    #[error("staff name must not be empty")]
    EmptyStaffName,

    /// A new job was requested with no units.
    #[error("job quantity must be at least 1")]
    ZeroQuantity,

    /// The job has already reached the terminal stage.
    #[error("job {0} is complete and has no next stage")]
    NoNextStage(JobId),

    /// The requested stage is not ahead of the job's current stage.
    #[error("invalid stage transition for job {job_id}: {from} -> {to}")]
    InvalidTransition {
        /// Job being advanced.
        job_id: JobId,
        /// Stage the job is currently at.
        from: Stage,
        /// Requested target stage.
        to: Stage,
    },

    /// The split amount is outside `1..=available`.
    #[error("invalid split quantity {requested} for job {job_id} (available: {available})")]
    InvalidQuantity {
        /// Job being split.
        job_id: JobId,
        /// Quantity the caller asked to move.
        requested: u32,
        /// Quantity the job currently holds.
        available: u32,
    },
}

/// Error returned while parsing stage keys from persistence or user input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown stage: {0}")]
pub struct ParseStageError(pub String);

/// Error returned while parsing side tags.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown side: {0}, expected LH or RH")]
pub struct ParseSideError(pub String);
