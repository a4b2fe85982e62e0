//! Integration test harness for cachegate.
//!
//! - [`core`] holds the cucumber world driving admission decisions;
//! - [`steps`] defines the Gherkin steps used by `tests/features`;
//! - [`tracing`] captures `cachegate.*` spans for assertions.

pub mod core;
pub mod steps;
pub mod tracing;
