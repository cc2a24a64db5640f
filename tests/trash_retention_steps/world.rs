//! Shared world state for trash retention BDD scenarios.

use caliper::config::TrackerConfig;
use caliper::job::domain::Job;
use rstest::fixture;

use crate::test_helpers::Tracker;

/// Scenario world for trash retention behaviour tests.
pub struct TrashWorld {
    pub tracker: Tracker,
    pub job: Option<Job>,
}

impl TrashWorld {
    /// Creates a world around a freshly wired tracker.
    #[must_use]
    pub fn new() -> Self {
        let tracker =
            Tracker::with_config(TrackerConfig::default()).expect("default config is valid");
        Self {
            tracker,
            job: None,
        }
    }

    /// Returns the job under test.
    ///
    /// # Errors
    ///
    /// Returns an error if no job was requested yet.
    pub fn job(&self) -> Result<&Job, eyre::Report> {
        self.job
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing requested job in scenario world"))
    }
}

impl Default for TrashWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TrashWorld {
    TrashWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
