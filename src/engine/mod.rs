// src/engine/mod.rs

//! Manager-side orchestration.
//!
//! This module ties together:
//! - the scheduling state machine from [`crate::dag`]
//! - the event loop that reacts to worker StepDone / WorkerFree messages,
//!   dispatches Assign commands, and broadcasts Stop at shutdown
//! - the throughput report returned once all tasks have completed

pub mod report;
pub mod runtime;

pub use report::ExecutionReport;
pub use runtime::{Runtime, WorkerCommand, WorkerEvent};
