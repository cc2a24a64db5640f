//! Read-side aggregation of jobs into groups.
//!
//! Mirrored pairs are tracked as one unit and a group is only as far along
//! as its least advanced unfinished member.

use super::{GroupKey, Job, Stage, strip_side_suffix};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Aggregated view of the jobs sharing a [`GroupKey`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobGroup {
    key: GroupKey,
    base: String,
    code: String,
    items: Vec<Job>,
    urgent: bool,
    complete: bool,
    current_stage: Stage,
    memo: Option<String>,
    request_date: DateTime<Utc>,
}

impl JobGroup {
    fn start(job: &Job) -> Self {
        Self {
            key: job.group_key(),
            base: strip_side_suffix(job.model()).to_owned(),
            code: job.code().to_owned(),
            items: Vec::new(),
            urgent: false,
            complete: true,
            current_stage: Stage::Complete,
            memo: None,
            request_date: job.request_date(),
        }
    }

    fn push(&mut self, job: Job) {
        self.urgent |= job.is_urgent();
        if !job.is_complete() {
            self.complete = false;
            self.current_stage = self.current_stage.min(job.current_stage());
        }
        if !job.memo().is_empty() {
            self.memo = Some(job.memo().to_owned());
        }
        self.request_date = self.request_date.min(job.request_date());
        self.items.push(job);
    }

    /// Returns the aggregation key.
    #[must_use]
    pub const fn key(&self) -> GroupKey {
        self.key
    }

    /// Returns the display name: the first member's model without its side
    /// suffix.
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Returns the first member's catalog code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the member jobs in input order.
    #[must_use]
    pub fn items(&self) -> &[Job] {
        &self.items
    }

    /// Returns whether any member is urgent.
    #[must_use]
    pub const fn is_urgent(&self) -> bool {
        self.urgent
    }

    /// Returns whether every member is complete.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.complete
    }

    /// Returns the least advanced stage among unfinished members, or
    /// [`Stage::Complete`] when all members are complete.
    #[must_use]
    pub const fn current_stage(&self) -> Stage {
        self.current_stage
    }

    /// Returns the latest non-empty member memo.
    #[must_use]
    pub fn memo(&self) -> Option<&str> {
        self.memo.as_deref()
    }

    /// Returns the earliest member request date.
    #[must_use]
    pub const fn request_date(&self) -> DateTime<Utc> {
        self.request_date
    }

    /// Returns the summed quantity of all members.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|job| u64::from(job.quantity())).sum()
    }
}

/// Partitions jobs by group key, keeping groups in the order their first
/// member appears.
#[must_use]
pub fn list_groups(jobs: &[Job]) -> Vec<JobGroup> {
    let mut groups: Vec<JobGroup> = Vec::new();
    let mut positions: HashMap<GroupKey, usize> = HashMap::new();

    for job in jobs {
        let position = *positions.entry(job.group_key()).or_insert_with(|| {
            groups.push(JobGroup::start(job));
            groups.len() - 1
        });
        if let Some(group) = groups.get_mut(position) {
            group.push(job.clone());
        }
    }

    groups
}
