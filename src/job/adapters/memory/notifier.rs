//! Notifier that records every delivered change.

use std::sync::{Arc, RwLock};

use crate::job::ports::{NotifierError, NotifierResult, StageChange, StageChangeNotifier};

/// Thread-safe notifier keeping delivered changes in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    delivered: Arc<RwLock<Vec<StageChange>>>,
}

impl RecordingNotifier {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the changes delivered so far, oldest first.
    ///
    /// # Errors
    ///
    /// Returns a delivery error when lock acquisition fails.
    pub fn delivered(&self) -> NotifierResult<Vec<StageChange>> {
        let delivered = self
            .delivered
            .read()
            .map_err(|err| NotifierError::delivery(std::io::Error::other(err.to_string())))?;
        Ok(delivered.clone())
    }
}

impl StageChangeNotifier for RecordingNotifier {
    fn notify(&self, change: &StageChange) -> NotifierResult<()> {
        let mut delivered = self
            .delivered
            .write()
            .map_err(|err| NotifierError::delivery(std::io::Error::other(err.to_string())))?;
        delivered.push(change.clone());
        Ok(())
    }
}
