//! Application services for job tracking orchestration.

mod error;
mod lifecycle;
mod request;
mod split;
mod support;
mod trash;
mod watcher;

pub use error::{JobServiceError, JobServiceResult};
pub use lifecycle::JobLifecycleService;
pub use request::{JobRequest, JobRequestService};
pub use split::SplitService;
pub use trash::TrashService;
pub use watcher::StageChangeWatcher;
