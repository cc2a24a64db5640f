//! Shared fixtures for job tests.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;

use crate::config::TrackerConfig;
use crate::job::{
    adapters::memory::{InMemoryJobStore, InMemoryProductCatalog, StaticStaffDirectory},
    domain::{GroupId, Job, JobDraft, JobId, Stage, StaffName},
    ports::{Collection, JobStore},
    services::{JobLifecycleService, JobRequestService, SplitService, TrashService},
};

/// Clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl FixedClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    pub fn advance(&self, delta: TimeDelta) {
        let mut now = self.now.lock().expect("clock lock should not be poisoned");
        *now += delta;
    }
}

impl Default for FixedClock {
    fn default() -> Self {
        Self::at(
            Utc.with_ymd_and_hms(2024, 3, 4, 8, 30, 0)
                .single()
                .expect("valid start time"),
        )
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock lock should not be poisoned")
    }
}

pub fn staff(name: &str) -> StaffName {
    StaffName::new(name).expect("valid staff name")
}

pub fn draft(model: &str, quantity: u32) -> JobDraft {
    JobDraft::new("HB-2210", model, quantity)
}

pub fn new_job(model: &str, quantity: u32, clock: &FixedClock) -> Job {
    Job::new(draft(model, quantity), staff("홍길동"), clock).expect("valid draft")
}

pub fn job_at(model: &str, quantity: u32, stage: Stage, clock: &FixedClock) -> Job {
    let mut job = new_job(model, quantity, clock);
    if stage != Stage::NewAdded {
        job.advance(stage, staff("김철수"), clock)
            .expect("stage reachable from new_added");
    }
    job
}

pub fn grouped_job(model: &str, group_id: GroupId, stage: Stage, clock: &FixedClock) -> Job {
    let mut job_draft = draft(model, 4);
    job_draft.group_id = Some(group_id);
    let mut job = Job::new(job_draft, staff("홍길동"), clock).expect("valid draft");
    if stage != Stage::NewAdded {
        job.advance(stage, staff("김철수"), clock)
            .expect("stage reachable from new_added");
    }
    job
}

type Lifecycle = JobLifecycleService<InMemoryJobStore, StaticStaffDirectory, FixedClock>;
type Splitter = SplitService<InMemoryJobStore, StaticStaffDirectory, FixedClock>;
type Trash = TrashService<InMemoryJobStore, StaticStaffDirectory, FixedClock>;
type Requests = JobRequestService<InMemoryJobStore, InMemoryProductCatalog, FixedClock>;

/// In-memory wiring shared by the service tests.
pub struct ServiceHarness {
    pub store: Arc<InMemoryJobStore>,
    pub staff: Arc<StaticStaffDirectory>,
    pub clock: Arc<FixedClock>,
    pub config: Arc<TrackerConfig>,
}

impl ServiceHarness {
    pub fn with_config(config: TrackerConfig) -> Self {
        let staff =
            StaticStaffDirectory::new(config.staff_names.clone()).expect("valid staff names");
        Self {
            store: Arc::new(InMemoryJobStore::new()),
            staff: Arc::new(staff),
            clock: Arc::new(FixedClock::default()),
            config: Arc::new(config),
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        JobLifecycleService::new(
            Arc::clone(&self.store),
            Arc::clone(&self.staff),
            Arc::clone(&self.clock),
            Arc::clone(&self.config),
        )
    }

    pub fn splitter(&self) -> Splitter {
        SplitService::new(
            Arc::clone(&self.store),
            Arc::clone(&self.staff),
            Arc::clone(&self.clock),
            Arc::clone(&self.config),
        )
    }

    pub fn trash(&self) -> Trash {
        TrashService::new(
            Arc::clone(&self.store),
            Arc::clone(&self.staff),
            Arc::clone(&self.clock),
            Arc::clone(&self.config),
        )
    }

    pub fn requests(&self, catalog: Arc<InMemoryProductCatalog>) -> Requests {
        JobRequestService::new(
            Arc::clone(&self.store),
            catalog,
            Arc::clone(&self.clock),
            Arc::clone(&self.config),
        )
    }

    pub async fn seed(&self, job: Job) -> Job {
        self.store
            .set(Collection::Active, &job)
            .await
            .expect("seeding the store should succeed");
        job
    }

    pub async fn active(&self, id: JobId) -> Option<Job> {
        self.store
            .get(Collection::Active, id)
            .await
            .expect("store read should succeed")
            .map(|stored| stored.job)
    }

    pub async fn trashed(&self, id: JobId) -> Option<Job> {
        self.store
            .get(Collection::Trash, id)
            .await
            .expect("store read should succeed")
            .map(|stored| stored.job)
    }

    pub async fn active_count(&self) -> usize {
        self.store
            .get_all(Collection::Active)
            .await
            .expect("store read should succeed")
            .len()
    }
}

impl Default for ServiceHarness {
    fn default() -> Self {
        Self::with_config(TrackerConfig::default())
    }
}
