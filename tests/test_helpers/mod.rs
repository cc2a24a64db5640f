//! Shared clock and service wiring for integration tests.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use caliper::config::TrackerConfig;
use caliper::job::{
    adapters::memory::{InMemoryJobStore, InMemoryProductCatalog, StaticStaffDirectory},
    domain::StaffName,
    ports::Product,
    services::{JobLifecycleService, JobRequestService, SplitService, TrashService},
};
use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;

/// Clock that only moves when a test advances it.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    /// Creates a clock stopped at `now`.
    pub fn starting_at(now: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    /// Moves the clock forward by `delta`.
    pub fn advance(&self, delta: TimeDelta) {
        *self.lock() += delta;
    }

    fn lock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::starting_at(
            Utc.with_ymd_and_hms(2024, 3, 4, 8, 30, 0)
                .single()
                .unwrap_or_default(),
        )
    }
}

impl Clock for ManualClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock()
    }
}

/// Lifecycle service wired to the in-memory adapters.
pub type Lifecycle = JobLifecycleService<InMemoryJobStore, StaticStaffDirectory, ManualClock>;
/// Split service wired to the in-memory adapters.
pub type Splitter = SplitService<InMemoryJobStore, StaticStaffDirectory, ManualClock>;
/// Trash service wired to the in-memory adapters.
pub type Trash = TrashService<InMemoryJobStore, StaticStaffDirectory, ManualClock>;
/// Request service wired to the in-memory adapters.
pub type Requests = JobRequestService<InMemoryJobStore, InMemoryProductCatalog, ManualClock>;

/// One tracker installation backed entirely by memory.
pub struct Tracker {
    /// Active and trash collections.
    pub store: Arc<InMemoryJobStore>,
    /// Staff directory built from the configured names.
    pub staff: Arc<StaticStaffDirectory>,
    /// Product catalogue used for requests.
    pub catalog: Arc<InMemoryProductCatalog>,
    /// Shared manual clock.
    pub clock: Arc<ManualClock>,
    /// Tracker settings.
    pub config: Arc<TrackerConfig>,
}

impl Tracker {
    /// Wires a tracker around `config` with the standard product catalogue.
    ///
    /// # Errors
    ///
    /// Returns an error when a configured staff name is blank.
    pub fn with_config(config: TrackerConfig) -> eyre::Result<Self> {
        let staff = StaticStaffDirectory::new(config.staff_names.clone())?;
        Ok(Self {
            store: Arc::new(InMemoryJobStore::new()),
            staff: Arc::new(staff),
            catalog: Arc::new(InMemoryProductCatalog::new([
                Product::new("HB-2210", "Door handle"),
                Product::new("TL-0410", "Tail lamp LH"),
                Product::new("GR-1180", "Radiator grille"),
            ])),
            clock: Arc::new(ManualClock::default()),
            config: Arc::new(config),
        })
    }

    /// Builds the lifecycle service.
    pub fn lifecycle(&self) -> Lifecycle {
        JobLifecycleService::new(
            Arc::clone(&self.store),
            Arc::clone(&self.staff),
            Arc::clone(&self.clock),
            Arc::clone(&self.config),
        )
    }

    /// Builds the split service.
    pub fn splitter(&self) -> Splitter {
        SplitService::new(
            Arc::clone(&self.store),
            Arc::clone(&self.staff),
            Arc::clone(&self.clock),
            Arc::clone(&self.config),
        )
    }

    /// Builds the trash service.
    pub fn trash(&self) -> Trash {
        TrashService::new(
            Arc::clone(&self.store),
            Arc::clone(&self.staff),
            Arc::clone(&self.clock),
            Arc::clone(&self.config),
        )
    }

    /// Builds the request service.
    pub fn requests(&self) -> Requests {
        JobRequestService::new(
            Arc::clone(&self.store),
            Arc::clone(&self.catalog),
            Arc::clone(&self.clock),
            Arc::clone(&self.config),
        )
    }
}

/// Parses a staff name, failing the test on blank input.
///
/// # Errors
///
/// Returns an error when `name` is blank.
pub fn staff(name: &str) -> eyre::Result<StaffName> {
    Ok(StaffName::new(name)?)
}
