//! Notification sink port for observed stage changes.

use crate::job::domain::{JobId, Stage, StaffName};
use std::sync::Arc;
use thiserror::Error;

/// Result type for notifier operations.
pub type NotifierResult<T> = Result<T, NotifierError>;

/// A stage change observed between two store snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageChange {
    /// Job that moved.
    pub job_id: JobId,
    /// Model name of the job.
    pub model: String,
    /// Stage in the previous snapshot.
    pub from: Stage,
    /// Stage in the new snapshot.
    pub to: Stage,
    /// Person attributed by the latest history entry.
    pub actor: StaffName,
}

impl StageChange {
    /// Returns the label of the stage the job left.
    #[must_use]
    pub const fn from_label(&self) -> &'static str {
        self.from.label()
    }

    /// Returns the label of the stage the job reached.
    #[must_use]
    pub const fn to_label(&self) -> &'static str {
        self.to.label()
    }
}

/// Receives one call per observed stage change.
#[cfg_attr(test, mockall::automock)]
pub trait StageChangeNotifier: Send + Sync {
    /// Delivers a change notification.
    ///
    /// # Errors
    ///
    /// Returns [`NotifierError`] when the sink cannot deliver.
    fn notify(&self, change: &StageChange) -> NotifierResult<()>;
}

/// Errors returned by notifier adapters.
#[derive(Debug, Clone, Error)]
pub enum NotifierError {
    /// The sink rejected or failed to deliver the notification.
    #[error("notification delivery failed: {0}")]
    Delivery(Arc<dyn std::error::Error + Send + Sync>),
}

impl NotifierError {
    /// Wraps a delivery error.
    pub fn delivery(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Delivery(Arc::new(err))
    }
}
