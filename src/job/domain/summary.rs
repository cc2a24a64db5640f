//! List filters and dashboard counts over jobs and groups.

use super::{Job, JobGroup, Stage};
use std::collections::BTreeMap;

/// Selection applied to the job list before grouping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JobFilter {
    /// Every unfinished job.
    #[default]
    Active,
    /// Finished jobs only.
    Finished,
    /// Jobs that have not entered production yet.
    New,
    /// Unfinished jobs flagged urgent.
    Urgent,
    /// Jobs currently at the given stage.
    AtStage(Stage),
}

impl JobFilter {
    /// Returns whether `job` passes the filter.
    #[must_use]
    pub fn matches(self, job: &Job) -> bool {
        match self {
            Self::Active => !job.is_complete(),
            Self::Finished => job.is_complete(),
            Self::New => job.current_stage() == Stage::NewAdded,
            Self::Urgent => job.is_urgent() && !job.is_complete(),
            Self::AtStage(stage) => job.current_stage() == stage,
        }
    }

    /// Returns the jobs passing the filter, in input order.
    #[must_use]
    pub fn apply(self, jobs: &[Job]) -> Vec<Job> {
        jobs.iter().filter(|job| self.matches(job)).cloned().collect()
    }
}

/// Group-level counts shown on the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardSummary {
    /// Groups with at least one unfinished member.
    pub active: usize,
    /// Groups whose members are all complete.
    pub completed: usize,
    /// Unfinished groups with an urgent member.
    pub urgent: usize,
    /// Number of groups at each aggregate stage. Stages without groups are
    /// absent.
    pub by_stage: BTreeMap<Stage, usize>,
}

impl DashboardSummary {
    /// Counts the given groups.
    #[must_use]
    pub fn from_groups(groups: &[JobGroup]) -> Self {
        let mut summary = Self::default();
        for group in groups {
            if group.is_complete() {
                summary.completed += 1;
            } else {
                summary.active += 1;
                if group.is_urgent() {
                    summary.urgent += 1;
                }
            }
            *summary.by_stage.entry(group.current_stage()).or_default() += 1;
        }
        summary
    }

    /// Returns the number of groups at `stage`.
    #[must_use]
    pub fn at_stage(&self, stage: Stage) -> usize {
        self.by_stage.get(&stage).copied().unwrap_or_default()
    }
}
