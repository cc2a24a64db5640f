//! Job aggregate root and its creation and edit parameter objects.

use super::{
    Deletion, GroupId, GroupKey, History, HistoryEntry, JobDocument, JobDomainError, JobId, Side,
    Stage, StaffName, StatusFlags,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Parameters for creating a new job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDraft {
    /// Catalog code.
    pub code: String,
    /// Display model name.
    pub model: String,
    /// Side tag for mirrored items.
    pub side: Option<Side>,
    /// Number of units.
    pub quantity: u32,
    /// Whether the job is flagged urgent.
    pub urgent: bool,
    /// Free-text memo.
    pub memo: String,
    /// Person who requested the job.
    pub author: Option<String>,
    /// Group the job joins, if any.
    pub group_id: Option<GroupId>,
}

impl JobDraft {
    /// Creates a draft for `quantity` units of a catalog item.
    #[must_use]
    pub fn new(code: impl Into<String>, model: impl Into<String>, quantity: u32) -> Self {
        Self {
            code: code.into(),
            model: model.into(),
            side: None,
            quantity,
            urgent: false,
            memo: String::new(),
            author: None,
            group_id: None,
        }
    }
}

/// Non-stage metadata changes applied by an explicit edit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobEdit {
    /// Replacement model name.
    pub model: Option<String>,
    /// Replacement catalog code.
    pub code: Option<String>,
    /// Replacement memo.
    pub memo: Option<String>,
    /// Replacement quantity.
    pub quantity: Option<u32>,
    /// Replacement urgency flag.
    pub urgent: Option<bool>,
}

impl JobEdit {
    /// Sets the model name.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the catalog code.
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Sets the memo.
    #[must_use]
    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = Some(memo.into());
        self
    }

    /// Sets the quantity.
    #[must_use]
    pub const fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// Sets the urgency flag.
    #[must_use]
    pub const fn with_urgent(mut self, urgent: bool) -> Self {
        self.urgent = Some(urgent);
        self
    }
}

/// Parameter object for reconstructing a persisted job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedJobData {
    /// Persisted identifier.
    pub id: JobId,
    /// Persisted group linkage.
    pub group_id: Option<GroupId>,
    /// Persisted catalog code.
    pub code: String,
    /// Persisted model name.
    pub model: String,
    /// Persisted side tag.
    pub side: Option<Side>,
    /// Persisted quantity.
    pub quantity: u32,
    /// Persisted urgency flag.
    pub urgent: bool,
    /// Persisted memo.
    pub memo: String,
    /// Persisted requester.
    pub author: Option<String>,
    /// Persisted stage.
    pub stage: Stage,
    /// Persisted history.
    pub history: History,
    /// Job this record was split from.
    pub split_from: Option<JobId>,
    /// Persisted request timestamp.
    pub request_date: DateTime<Utc>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
    /// Deletion mark while in the trash.
    pub deletion: Option<Deletion>,
}

/// Job aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "JobDocument", into = "JobDocument")]
pub struct Job {
    id: JobId,
    group_id: Option<GroupId>,
    code: String,
    model: String,
    side: Option<Side>,
    quantity: u32,
    urgent: bool,
    memo: String,
    author: Option<String>,
    stage: Stage,
    history: History,
    split_from: Option<JobId>,
    request_date: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deletion: Option<Deletion>,
}

impl Job {
    /// Creates a new job at [`Stage::NewAdded`] with its creation history
    /// entry attributed to `requested_by`.
    ///
    /// # Errors
    ///
    /// Returns [`JobDomainError::EmptyCode`], [`JobDomainError::EmptyModel`]
    /// or [`JobDomainError::ZeroQuantity`] when the draft is incomplete.
    pub fn new(
        draft: JobDraft,
        requested_by: StaffName,
        clock: &impl Clock,
    ) -> Result<Self, JobDomainError> {
        let code = non_empty(draft.code, JobDomainError::EmptyCode)?;
        let model = non_empty(draft.model, JobDomainError::EmptyModel)?;
        if draft.quantity == 0 {
            return Err(JobDomainError::ZeroQuantity);
        }

        let timestamp = clock.utc();
        let creation = HistoryEntry::new(Stage::NewAdded, requested_by, timestamp);
        Ok(Self {
            id: JobId::new(),
            group_id: draft.group_id,
            code,
            model,
            side: draft.side,
            quantity: draft.quantity,
            urgent: draft.urgent,
            memo: draft.memo,
            author: draft.author,
            stage: Stage::NewAdded,
            history: History::started(creation),
            split_from: None,
            request_date: timestamp,
            created_at: timestamp,
            updated_at: timestamp,
            deletion: None,
        })
    }

    /// Reconstructs a job from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedJobData) -> Self {
        Self {
            id: data.id,
            group_id: data.group_id,
            code: data.code,
            model: data.model,
            side: data.side,
            quantity: data.quantity,
            urgent: data.urgent,
            memo: data.memo,
            author: data.author,
            stage: data.stage,
            history: data.history,
            split_from: data.split_from,
            request_date: data.request_date,
            created_at: data.created_at,
            updated_at: data.updated_at,
            deletion: data.deletion,
        }
    }

    /// Returns the job identifier.
    #[must_use]
    pub const fn id(&self) -> JobId {
        self.id
    }

    /// Returns the group this job belongs to, if any.
    #[must_use]
    pub const fn group_id(&self) -> Option<GroupId> {
        self.group_id
    }

    /// Returns the key the job aggregates under.
    #[must_use]
    pub const fn group_key(&self) -> GroupKey {
        match self.group_id {
            Some(group_id) => GroupKey::Group(group_id),
            None => GroupKey::Job(self.id),
        }
    }

    /// Returns the catalog code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the display model name.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns the side tag.
    #[must_use]
    pub const fn side(&self) -> Option<Side> {
        self.side
    }

    /// Returns the number of units.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Returns whether the job is urgent.
    #[must_use]
    pub const fn is_urgent(&self) -> bool {
        self.urgent
    }

    /// Returns the memo.
    #[must_use]
    pub fn memo(&self) -> &str {
        &self.memo
    }

    /// Returns the requester.
    #[must_use]
    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    /// Returns the current stage.
    #[must_use]
    pub const fn current_stage(&self) -> Stage {
        self.stage
    }

    /// Returns the stage after the current one, or `None` once complete.
    #[must_use]
    pub const fn next_stage(&self) -> Option<Stage> {
        self.stage.next()
    }

    /// Returns whether production has finished.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.stage.is_terminal()
    }

    /// Returns the forward-filled completion flags for the current stage.
    #[must_use]
    pub fn status(&self) -> StatusFlags {
        StatusFlags::for_stage(self.stage)
    }

    /// Returns the transition history.
    #[must_use]
    pub const fn history(&self) -> &History {
        &self.history
    }

    /// Returns the job this record was split from.
    #[must_use]
    pub const fn split_from(&self) -> Option<JobId> {
        self.split_from
    }

    /// Returns the request timestamp.
    #[must_use]
    pub const fn request_date(&self) -> DateTime<Utc> {
        self.request_date
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the deletion mark while the job is in the trash.
    #[must_use]
    pub const fn deletion(&self) -> Option<&Deletion> {
        self.deletion.as_ref()
    }

    /// Moves the job to `target`, forward-filling every earlier stage, and
    /// records the transition.
    ///
    /// Skipping ahead is allowed; callers confirm intent before asking for
    /// it.
    ///
    /// # Errors
    ///
    /// Returns [`JobDomainError::NoNextStage`] when the job is complete, or
    /// [`JobDomainError::InvalidTransition`] when `target` is not ahead of
    /// the current stage. The job is left untouched on error.
    pub fn advance(
        &mut self,
        target: Stage,
        actor: StaffName,
        clock: &impl Clock,
    ) -> Result<(), JobDomainError> {
        self.ensure_can_advance(target)?;
        let timestamp = clock.utc();
        self.record_transition(HistoryEntry::new(target, actor, timestamp));
        self.updated_at = timestamp;
        Ok(())
    }

    /// Checks that `target` is reachable from the current stage.
    ///
    /// # Errors
    ///
    /// See [`Job::advance`].
    pub fn ensure_can_advance(&self, target: Stage) -> Result<(), JobDomainError> {
        if self.stage.is_terminal() {
            return Err(JobDomainError::NoNextStage(self.id));
        }
        if !self.stage.can_advance_to(target) {
            return Err(JobDomainError::InvalidTransition {
                job_id: self.id,
                from: self.stage,
                to: target,
            });
        }
        Ok(())
    }

    /// Applies a metadata edit.
    ///
    /// # Errors
    ///
    /// Returns [`JobDomainError::EmptyModel`], [`JobDomainError::EmptyCode`]
    /// or [`JobDomainError::ZeroQuantity`]; nothing is applied on error.
    pub fn apply_edit(&mut self, edit: JobEdit, clock: &impl Clock) -> Result<(), JobDomainError> {
        let new_model = edit
            .model
            .map(|value| non_empty(value, JobDomainError::EmptyModel))
            .transpose()?;
        let new_code = edit
            .code
            .map(|value| non_empty(value, JobDomainError::EmptyCode))
            .transpose()?;
        if edit.quantity == Some(0) {
            return Err(JobDomainError::ZeroQuantity);
        }

        if let Some(model) = new_model {
            self.model = model;
        }
        if let Some(code) = new_code {
            self.code = code;
        }
        if let Some(memo) = edit.memo {
            self.memo = memo;
        }
        if let Some(quantity) = edit.quantity {
            self.quantity = quantity;
        }
        if let Some(urgent) = edit.urgent {
            self.urgent = urgent;
        }
        self.touch(clock);
        Ok(())
    }

    /// Links the job to `group_id`, replacing any previous linkage.
    pub fn assign_group(&mut self, group_id: GroupId, clock: &impl Clock) {
        self.group_id = Some(group_id);
        self.touch(clock);
    }

    /// Attaches the deletion mark used while the job sits in the trash.
    pub fn mark_deleted(&mut self, deleted_by: StaffName, clock: &impl Clock) {
        self.deletion = Some(Deletion {
            deleted_at: clock.utc(),
            deleted_by,
        });
    }

    /// Strips the deletion mark and refreshes `updated_at`.
    pub fn restore(&mut self, clock: &impl Clock) {
        self.deletion = None;
        self.touch(clock);
    }

    /// Removes `moved` units, leaving the stage untouched.
    pub(super) fn reduce_quantity(&mut self, moved: u32, timestamp: DateTime<Utc>) {
        self.quantity = self.quantity.saturating_sub(moved);
        self.updated_at = timestamp;
    }

    /// Builds the record carrying units split off this job.
    pub(super) fn split_piece(
        &self,
        quantity: u32,
        group_id: Option<GroupId>,
        entry: HistoryEntry,
    ) -> Self {
        let timestamp = entry.timestamp;
        let mut piece = Self {
            id: JobId::new(),
            group_id,
            quantity,
            split_from: Some(self.id),
            created_at: timestamp,
            updated_at: timestamp,
            deletion: None,
            ..self.clone()
        };
        piece.record_transition(entry);
        piece
    }

    fn record_transition(&mut self, entry: HistoryEntry) {
        self.stage = entry.stage;
        self.history = self.history.append(entry);
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

fn non_empty(value: String, error: JobDomainError) -> Result<String, JobDomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(error);
    }
    Ok(trimmed.to_owned())
}
