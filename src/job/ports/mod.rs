//! Port contracts for job tracking.
//!
//! Ports define infrastructure-agnostic interfaces used by job services.

pub mod catalog;
pub mod notifier;
pub mod staff;
pub mod store;

pub use catalog::{CatalogError, CatalogResult, Product, ProductCatalog};
pub use notifier::{NotifierError, NotifierResult, StageChange, StageChangeNotifier};
pub use staff::StaffDirectory;
pub use store::{
    Collection, JobStore, JobStoreError, JobStoreResult, Revision, StoreSnapshot, StoredJob,
};

#[cfg(test)]
pub use notifier::MockStageChangeNotifier;
#[cfg(test)]
pub use staff::MockStaffDirectory;
