//! Soft-deletion marks and the trash retention policy.

use super::{Job, StaffName};
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Deletion mark carried by a job while it sits in the trash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deletion {
    /// When the job was moved to the trash.
    pub deleted_at: DateTime<Utc>,
    /// Who moved it there.
    pub deleted_by: StaffName,
}

/// How long trashed jobs stay listed and restorable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    window: TimeDelta,
}

impl RetentionPolicy {
    /// Retention applied when nothing else is configured.
    pub const DEFAULT_DAYS: u32 = 10;

    /// Creates a policy retaining records for `days` days.
    #[must_use]
    pub fn days(days: u32) -> Self {
        Self {
            window: TimeDelta::days(i64::from(days)),
        }
    }

    /// Returns the retention window.
    #[must_use]
    pub const fn window(&self) -> TimeDelta {
        self.window
    }

    /// Returns whether a record deleted at `deleted_at` has outlived the
    /// window at `now`.
    #[must_use]
    pub fn is_expired(&self, deleted_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(deleted_at) > self.window
    }

    /// Splits trash records into those still listed and those eligible for
    /// purge. Records without a deletion mark are kept listed.
    #[must_use]
    pub fn partition(&self, jobs: Vec<Job>, now: DateTime<Utc>) -> (Vec<Job>, Vec<Job>) {
        jobs.into_iter().partition(|job| {
            job.deletion()
                .is_none_or(|deletion| !self.is_expired(deletion.deleted_at, now))
        })
    }
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self::days(Self::DEFAULT_DAYS)
    }
}
