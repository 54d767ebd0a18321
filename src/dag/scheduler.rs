// src/dag/scheduler.rs

use std::collections::{BTreeSet, HashMap, HashSet};

use tracing::{debug, info, warn};

use crate::dag::graph::{Dep, DepGraph, StepId, TaskId};

/// Worker identifier, `0..num_workers`.
pub type WorkerId = usize;

/// One assignment decision: send `task` to `worker`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    pub worker: WorkerId,
    pub task: TaskId,
}

/// Effect of recording a step completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// First sighting of this (task, step); the task still has steps left.
    Recorded,
    /// First sighting, and it was the task's final step; the task left the
    /// in-flight set.
    TaskComplete,
    /// The pair was already in the completed set; nothing changed.
    Duplicate,
}

/// Authoritative scheduling state, owned and mutated only by the manager
/// control flow.
///
/// The scheduler is a plain synchronous state machine; the async runtime
/// feeds it worker events and asks it for assignment decisions. It holds:
/// - the completed (task, step) set (append-only),
/// - per-task completed-step counters,
/// - the queue of not-yet-assigned tasks, in ascending id order,
/// - the in-flight set (assigned, not fully complete),
/// - the idle worker pool.
pub struct Scheduler {
    graph: DepGraph,

    completed: BTreeSet<Dep>,
    step_count: HashMap<TaskId, usize>,
    task_queue: Vec<TaskId>,
    in_flight: HashSet<TaskId>,
    idle_workers: Vec<WorkerId>,
}

impl Scheduler {
    /// Construct the initial state: every task queued, every worker idle,
    /// nothing completed.
    pub fn new(graph: DepGraph, num_workers: usize) -> Self {
        let task_queue: Vec<TaskId> = graph.tasks().collect();
        let idle_workers: Vec<WorkerId> = (0..num_workers).collect();

        Self {
            graph,
            completed: BTreeSet::new(),
            step_count: HashMap::new(),
            task_queue,
            in_flight: HashSet::new(),
            idle_workers,
        }
    }

    /// Record a StepDone report from a worker.
    ///
    /// Idempotent: a duplicate (task, step) pair is a no-op and does not
    /// advance the step counter.
    pub fn record_step_done(&mut self, task: TaskId, step: StepId) -> StepOutcome {
        if !self.completed.insert((task, step)) {
            warn!(task, step, "duplicate step completion; ignoring");
            return StepOutcome::Duplicate;
        }

        let count = self.step_count.entry(task).or_insert(0);
        *count += 1;
        debug!(task, step, steps_done = *count, "step completed");

        if *count == self.graph.steps_per_task() {
            self.in_flight.remove(&task);
            info!(task, "task fully completed");
            return StepOutcome::TaskComplete;
        }

        StepOutcome::Recorded
    }

    /// Return a worker to the idle pool after it finished a task.
    pub fn record_worker_free(&mut self, worker: WorkerId) {
        if self.idle_workers.contains(&worker) {
            warn!(worker, "worker reported free but is already idle; ignoring");
            return;
        }
        debug!(worker, "worker is now free");
        self.idle_workers.push(worker);
    }

    /// Scan the pending queue in ascending task-id order and pair every
    /// ready task with an idle worker.
    ///
    /// A task is ready when its dependency set is a subset of the completed
    /// set. Each returned task is moved from the queue into the in-flight
    /// set atomically with the decision; the caller only has to deliver the
    /// Assign messages. Worker pop order is arbitrary.
    pub fn take_assignments(&mut self) -> Vec<Assignment> {
        let mut assignments = Vec::new();
        let mut remaining = Vec::with_capacity(self.task_queue.len());

        for task in std::mem::take(&mut self.task_queue) {
            if !self.is_ready(task) {
                remaining.push(task);
                continue;
            }
            let Some(worker) = self.idle_workers.pop() else {
                remaining.push(task);
                continue;
            };

            self.in_flight.insert(task);
            debug!(task, worker, "dependencies satisfied; assigning");
            assignments.push(Assignment { worker, task });
        }

        self.task_queue = remaining;
        assignments
    }

    /// True when the queue and the in-flight set are both empty, i.e. every
    /// task has run to completion.
    pub fn is_complete(&self) -> bool {
        self.task_queue.is_empty() && self.in_flight.is_empty()
    }

    /// True when every dependency of `task` is in the completed set.
    fn is_ready(&self, task: TaskId) -> bool {
        self.graph
            .dependencies_of(task)
            .iter()
            .all(|dep| self.completed.contains(dep))
    }

    /// Number of distinct (task, step) pairs completed so far.
    pub fn completed_len(&self) -> usize {
        self.completed.len()
    }

    /// Number of currently idle workers.
    pub fn idle_worker_count(&self) -> usize {
        self.idle_workers.len()
    }

    /// Tasks assigned but not yet fully complete.
    pub fn in_flight_len(&self) -> usize {
        self.in_flight.len()
    }

    /// Tasks still waiting in the queue.
    pub fn queued_len(&self) -> usize {
        self.task_queue.len()
    }

    /// True if the task currently sits in the pending queue.
    pub fn is_queued(&self, task: TaskId) -> bool {
        self.task_queue.contains(&task)
    }

    /// True if the task is assigned and not yet fully complete.
    pub fn is_in_flight(&self, task: TaskId) -> bool {
        self.in_flight.contains(&task)
    }
}
