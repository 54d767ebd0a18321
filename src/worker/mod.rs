// src/worker/mod.rs

//! Worker side of the task farm.
//!
//! - [`worker`] owns the serve loop: receive Assign/Stop, execute a task's
//!   steps sequentially, report StepDone / WorkerFree to the manager.
//! - [`activity`] writes the per-worker CSV activity log consumed by the
//!   offline plotting tools.

pub mod activity;
pub mod worker;

pub use activity::{ActivityLog, ActivityRecord};
pub use worker::{WorkerContext, serve, spawn_workers};
