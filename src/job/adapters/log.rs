//! Notifier that reports stage changes through `tracing`.

use crate::job::ports::{NotifierResult, StageChange, StageChangeNotifier};

/// Emits one `info` event per stage change.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl StageChangeNotifier for TracingNotifier {
    fn notify(&self, change: &StageChange) -> NotifierResult<()> {
        tracing::info!(
            job_id = %change.job_id,
            model = %change.model,
            from = change.from_label(),
            to = change.to_label(),
            actor = %change.actor,
            "job stage changed"
        );
        Ok(())
    }
}
