//! Stored document shape of a job.
//!
//! The stage is kept as a typed [`Stage`] inside the aggregate and only
//! turned into the boolean `status` map here, at the storage boundary.

use super::{Deletion, GroupId, History, Job, JobId, PersistedJobData, Side, StaffName, StatusFlags};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// JSON document written to and read from the job store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDocument {
    /// Job identifier.
    pub id: JobId,
    /// Group linkage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,
    /// Catalog code.
    pub code: String,
    /// Model name.
    pub model: String,
    /// Side tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
    /// Unit count.
    pub quantity: u32,
    /// Urgency flag.
    #[serde(default)]
    pub urgent: bool,
    /// Free-text memo.
    #[serde(default)]
    pub memo: String,
    /// Requester.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Completion flags.
    #[serde(default)]
    pub status: StatusFlags,
    /// Transition history.
    #[serde(default)]
    pub history: History,
    /// Origin of a split-off record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub split_from: Option<JobId>,
    /// Request timestamp.
    pub request_date: DateTime<Utc>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
    /// Trash timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
    /// Trash attribution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_by: Option<StaffName>,
}

impl From<Job> for JobDocument {
    fn from(job: Job) -> Self {
        let deletion = job.deletion().cloned();
        Self {
            id: job.id(),
            group_id: job.group_id(),
            code: job.code().to_owned(),
            model: job.model().to_owned(),
            side: job.side(),
            quantity: job.quantity(),
            urgent: job.is_urgent(),
            memo: job.memo().to_owned(),
            author: job.author().map(str::to_owned),
            status: job.status(),
            history: job.history().clone(),
            split_from: job.split_from(),
            request_date: job.request_date(),
            created_at: job.created_at(),
            updated_at: job.updated_at(),
            deleted_at: deletion.as_ref().map(|mark| mark.deleted_at),
            deleted_by: deletion.map(|mark| mark.deleted_by),
        }
    }
}

impl From<JobDocument> for Job {
    fn from(document: JobDocument) -> Self {
        let deletion = match (document.deleted_at, document.deleted_by) {
            (Some(deleted_at), Some(deleted_by)) => Some(Deletion {
                deleted_at,
                deleted_by,
            }),
            (Some(deleted_at), None) => StaffName::new("unknown")
                .ok()
                .map(|deleted_by| Deletion {
                    deleted_at,
                    deleted_by,
                }),
            (None, _) => None,
        };
        Self::from_persisted(PersistedJobData {
            id: document.id,
            group_id: document.group_id,
            code: document.code,
            model: document.model,
            side: document.side,
            quantity: document.quantity,
            urgent: document.urgent,
            memo: document.memo,
            author: document.author,
            stage: document.status.current_stage(),
            history: document.history,
            split_from: document.split_from,
            request_date: document.request_date,
            created_at: document.created_at,
            updated_at: document.updated_at,
            deletion,
        })
    }
}
