// src/dag/mod.rs

//! Dependency table and scheduling state.
//!
//! - [`graph`] holds the static (task, step) dependency table.
//! - [`scheduler`] contains the manager-owned state machine that decides
//!   which tasks are ready and which idle worker gets them.

pub mod graph;
pub mod scheduler;

pub use graph::{Dep, DepGraph, DependencyPolicy, StepId, TaskId};
pub use scheduler::{Assignment, Scheduler, StepOutcome, WorkerId};
