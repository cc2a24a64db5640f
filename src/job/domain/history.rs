//! Append-only stage transition history.

use super::{Stage, StaffName};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One recorded stage transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Stage the job moved to.
    pub stage: Stage,
    /// Person the transition is attributed to.
    pub staff_name: StaffName,
    /// When the transition was accepted.
    pub timestamp: DateTime<Utc>,
    /// Optional free-text note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl HistoryEntry {
    /// Creates an entry without a note.
    #[must_use]
    pub const fn new(stage: Stage, staff_name: StaffName, timestamp: DateTime<Utc>) -> Self {
        Self {
            stage,
            staff_name,
            timestamp,
            note: None,
        }
    }

    /// Attaches a note.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Ordered transition log of a single job.
///
/// Entries are only ever appended; there is no API to remove or reorder
/// them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History(Vec<HistoryEntry>);

impl History {
    /// Starts a history with its creation entry.
    #[must_use]
    pub fn started(entry: HistoryEntry) -> Self {
        Self(vec![entry])
    }

    /// Returns a copy of this history with `entry` appended.
    #[must_use]
    pub fn append(&self, entry: HistoryEntry) -> Self {
        let mut entries = Vec::with_capacity(self.0.len() + 1);
        entries.extend(self.0.iter().cloned());
        entries.push(entry);
        Self(entries)
    }

    /// Returns the entries in the order they were recorded.
    #[must_use]
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.0
    }

    /// Returns the most recent entry.
    #[must_use]
    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.0.last()
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether no entry has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
