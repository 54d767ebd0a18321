// src/config/validate.rs

use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::config::model::ConfigFile;
use crate::dag::graph::{DepGraph, DependencyPolicy};

/// Run semantic validation against a loaded configuration.
///
/// This checks:
/// - all `[run]` counts are >= 1
/// - `dependencies.policy` is valid ("staggered" or "explicit")
/// - every explicit edge stays in bounds and no task depends on itself
/// - the task-level dependency relation has no cycles
///
/// An unsatisfiable dependency table would make the scheduler hang forever
/// rather than fail, so all of this runs before any worker is spawned.
pub fn validate_config(cfg: &ConfigFile) -> Result<()> {
    validate_run_params(cfg)?;
    validate_policy(cfg)?;
    validate_edges(cfg)?;
    validate_dag(cfg)?;
    Ok(())
}

fn validate_run_params(cfg: &ConfigFile) -> Result<()> {
    if cfg.run.num_tasks == 0 {
        return Err(anyhow!("[run].num_tasks must be >= 1 (got 0)"));
    }
    if cfg.run.steps_per_task == 0 {
        return Err(anyhow!("[run].steps_per_task must be >= 1 (got 0)"));
    }
    if cfg.run.num_workers == 0 {
        return Err(anyhow!("[run].num_workers must be >= 1 (got 0)"));
    }
    Ok(())
}

fn validate_policy(cfg: &ConfigFile) -> Result<()> {
    DependencyPolicy::from_str(&cfg.dependencies.policy)
        .map_err(|e| anyhow!(e))
        .context("invalid [dependencies].policy")?;
    Ok(())
}

fn validate_edges(cfg: &ConfigFile) -> Result<()> {
    let policy = DependencyPolicy::from_str(&cfg.dependencies.policy)
        .unwrap_or_default();
    if policy != DependencyPolicy::Explicit {
        return Ok(());
    }

    let num_tasks = cfg.run.num_tasks;
    let steps = cfg.run.steps_per_task;

    for edge in &cfg.dependencies.edges {
        if edge.task >= num_tasks {
            return Err(anyhow!(
                "dependency edge names unknown task {} (num_tasks = {})",
                edge.task,
                num_tasks
            ));
        }
        if edge.on_task >= num_tasks {
            return Err(anyhow!(
                "task {} depends on unknown task {} (num_tasks = {})",
                edge.task,
                edge.on_task,
                num_tasks
            ));
        }
        if edge.on_step >= steps {
            return Err(anyhow!(
                "task {} depends on step {} of task {}, but tasks only have {} steps",
                edge.task,
                edge.on_step,
                edge.on_task,
                steps
            ));
        }
        if edge.task == edge.on_task {
            return Err(anyhow!("task {} cannot depend on itself", edge.task));
        }
    }

    Ok(())
}

fn validate_dag(cfg: &ConfigFile) -> Result<()> {
    // Task-level granularity is enough: a worker runs all steps of a task
    // once assigned, so any task-level cycle is unsatisfiable.
    //
    // Edge direction: on_task -> task (a task points at its dependents).
    let graph = DepGraph::from_config(cfg);

    let mut task_graph: DiGraphMap<usize, ()> = DiGraphMap::new();
    for task in graph.tasks() {
        task_graph.add_node(task);
    }
    for (task, (on_task, _step)) in graph.edges() {
        task_graph.add_edge(on_task, task, ());
    }

    // A topological sort fails exactly when there is a cycle.
    match toposort(&task_graph, None) {
        Ok(_order) => Ok(()),
        Err(cycle) => Err(anyhow!(
            "cycle detected in task dependencies involving task {}",
            cycle.node_id()
        )),
    }
}
