//! Domain model for production job tracking.
//!
//! Stage derivation, history, grouping, splitting and trash retention are
//! pure functions over [`Job`] values; persistence and notifications stay
//! outside the domain boundary.

mod document;
mod error;
mod group;
mod history;
mod ids;
mod job;
mod side;
mod split;
mod stage;
mod summary;
mod trash;

pub use document::JobDocument;
pub use error::{JobDomainError, ParseSideError, ParseStageError};
pub use group::{JobGroup, list_groups};
pub use history::{History, HistoryEntry};
pub use ids::{GroupId, GroupKey, JobId, StaffName};
pub use job::{Job, JobDraft, JobEdit, PersistedJobData};
pub use side::{Side, mirror_model, pair_models, strip_side_suffix};
pub use split::{SplitOutcome, split, split_batch, validate_split};
pub use stage::{Stage, StatusFlags};
pub use summary::{DashboardSummary, JobFilter};
pub use trash::{Deletion, RetentionPolicy};
