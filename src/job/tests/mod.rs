//! Unit tests for job tracking.

mod support;
