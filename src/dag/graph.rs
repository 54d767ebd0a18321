// src/dag/graph.rs

use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use crate::config::model::{ConfigFile, DependencyEdge};

/// Task identifier, `0..num_tasks`.
pub type TaskId = usize;

/// Step index within a task, `0..steps_per_task`.
pub type StepId = usize;

/// A single dependency: the (task, step) pair that must be in the completed
/// set before the depending task may be assigned.
pub type Dep = (TaskId, StepId);

/// How the dependency table is derived from the run parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyPolicy {
    /// Task T depends on step `i` of task `T-1-i` for each `i` in
    /// `0..steps_per_task` with `T-1-i >= 0`.
    Staggered,
    /// The edge list is supplied verbatim in the config.
    Explicit,
}

impl Default for DependencyPolicy {
    fn default() -> Self {
        DependencyPolicy::Staggered
    }
}

impl FromStr for DependencyPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "staggered" => Ok(DependencyPolicy::Staggered),
            "explicit" => Ok(DependencyPolicy::Explicit),
            other => Err(format!(
                "invalid dependencies.policy: {other} (expected \"staggered\" or \"explicit\")"
            )),
        }
    }
}

/// Static dependency table over (task, step) pairs, keyed by task id.
///
/// Built once at startup and immutable thereafter. Acyclicity and edge
/// bounds are checked in `config::validate` before a graph reaches the
/// scheduler, so lookups here are pure and infallible.
#[derive(Debug, Clone)]
pub struct DepGraph {
    num_tasks: usize,
    steps_per_task: usize,
    deps: BTreeMap<TaskId, BTreeSet<Dep>>,
}

impl DepGraph {
    /// Build the staggered-pipeline dependency table.
    ///
    /// Task T's set is `{(T-1-i, i) : i in 0..steps_per_task, T-1-i >= 0}`:
    /// task T cannot start until each earlier task has progressed far enough
    /// for T's slot in the pipeline.
    pub fn staggered(num_tasks: usize, steps_per_task: usize) -> Self {
        let mut deps: BTreeMap<TaskId, BTreeSet<Dep>> = BTreeMap::new();

        for task in 0..num_tasks {
            let mut set = BTreeSet::new();
            for step in 0..steps_per_task {
                if let Some(earlier) = task.checked_sub(step + 1) {
                    set.insert((earlier, step));
                }
            }
            deps.insert(task, set);
        }

        Self {
            num_tasks,
            steps_per_task,
            deps,
        }
    }

    /// Build a graph from an explicit edge list.
    ///
    /// Tasks not named by any edge get an empty dependency set and are
    /// immediately ready.
    pub fn from_edges(
        num_tasks: usize,
        steps_per_task: usize,
        edges: &[DependencyEdge],
    ) -> Self {
        let mut deps: BTreeMap<TaskId, BTreeSet<Dep>> = BTreeMap::new();

        for task in 0..num_tasks {
            deps.insert(task, BTreeSet::new());
        }

        for edge in edges {
            if let Some(set) = deps.get_mut(&edge.task) {
                set.insert((edge.on_task, edge.on_step));
            }
        }

        Self {
            num_tasks,
            steps_per_task,
            deps,
        }
    }

    /// Build a graph according to the validated config's policy.
    pub fn from_config(cfg: &ConfigFile) -> Self {
        let policy = DependencyPolicy::from_str(&cfg.dependencies.policy)
            .unwrap_or_default();

        match policy {
            DependencyPolicy::Staggered => {
                Self::staggered(cfg.run.num_tasks, cfg.run.steps_per_task)
            }
            DependencyPolicy::Explicit => Self::from_edges(
                cfg.run.num_tasks,
                cfg.run.steps_per_task,
                &cfg.dependencies.edges,
            ),
        }
    }

    pub fn num_tasks(&self) -> usize {
        self.num_tasks
    }

    pub fn steps_per_task(&self) -> usize {
        self.steps_per_task
    }

    /// Dependency set of a task; empty for unknown ids.
    pub fn dependencies_of(&self, task: TaskId) -> &BTreeSet<Dep> {
        static EMPTY: BTreeSet<Dep> = BTreeSet::new();
        self.deps.get(&task).unwrap_or(&EMPTY)
    }

    /// All task ids in ascending order.
    pub fn tasks(&self) -> impl Iterator<Item = TaskId> + '_ {
        self.deps.keys().copied()
    }

    /// All dependency edges as `(task, (on_task, on_step))` pairs.
    pub fn edges(&self) -> impl Iterator<Item = (TaskId, Dep)> + '_ {
        self.deps
            .iter()
            .flat_map(|(task, set)| set.iter().map(move |dep| (*task, *dep)))
    }
}
