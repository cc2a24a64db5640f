//! Adapter implementations for job tracking ports.

pub mod memory;

mod cache;
mod log;

pub use cache::CachedProductCatalog;
pub use log::TracingNotifier;
