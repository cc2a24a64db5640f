//! Caliper: production job tracking for a refinishing shop floor.
//!
//! This crate tracks production jobs through their stages, keeps a per-job
//! transition history, splits quantities between stages, groups mirrored
//! left-hand/right-hand items and manages a trash with retention.
//!
//! # Architecture
//!
//! Caliper follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for the document store, staff
//!   directory, notifications and product catalog
//! - **Adapters**: Concrete implementations of ports (in-memory, caching,
//!   logging)
//!
//! # Modules
//!
//! - [`config`]: Tracker configuration loading and validation
//! - [`job`]: Job lifecycle, splitting, grouping and trash

pub mod config;
pub mod job;
