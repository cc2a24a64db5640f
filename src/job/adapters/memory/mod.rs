//! In-memory adapters for tests and local use.

mod catalog;
mod notifier;
mod staff;
mod store;

pub use catalog::InMemoryProductCatalog;
pub use notifier::RecordingNotifier;
pub use staff::StaticStaffDirectory;
pub use store::{InMemoryJobStore, StoreOperation};
