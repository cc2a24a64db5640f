//! Production job tracking.
//!
//! Jobs move through an ordered set of production stages, can be split so
//! part of a quantity moves ahead, are aggregated into mirrored-pair groups,
//! and are soft-deleted into a trash with time-limited retention. The module
//! follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
