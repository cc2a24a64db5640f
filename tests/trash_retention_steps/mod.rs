//! Step definitions for trash retention scenarios.

pub mod world;

mod given;
mod then;
mod when;
