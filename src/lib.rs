// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod logging;
pub mod worker;

use std::path::PathBuf;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::info;

use crate::cli::CliArgs;
use crate::config::loader::{default_config_path, load_from_path};
use crate::config::model::ConfigFile;
use crate::config::validate::validate_config;
use crate::dag::graph::DepGraph;
use crate::dag::scheduler::Scheduler;
use crate::engine::report::ExecutionReport;
use crate::engine::runtime::{Runtime, WorkerEvent};
use crate::worker::spawn_workers;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading + CLI overrides
/// - dependency graph / scheduler
/// - worker pool
/// - manager runtime
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_config(&args)?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let report = run_benchmark(&cfg).await?;
    println!("{report}");
    Ok(())
}

/// Load the config file (or defaults), apply CLI overrides, and validate.
///
/// Validation runs *after* the overrides so that e.g. `--workers 0` is
/// rejected just like `num_workers = 0` in the file would be.
pub fn load_config(args: &CliArgs) -> Result<ConfigFile> {
    let (path, explicit) = match &args.config {
        Some(p) => (PathBuf::from(p), true),
        None => (default_config_path(), false),
    };

    let mut cfg = if !explicit && !path.exists() {
        info!(?path, "no config file found; using built-in defaults");
        ConfigFile::default()
    } else {
        load_from_path(&path)?
    };

    if let Some(tasks) = args.tasks {
        cfg.run.num_tasks = tasks;
    }
    if let Some(steps) = args.steps {
        cfg.run.steps_per_task = steps;
    }
    if let Some(workers) = args.workers {
        cfg.run.num_workers = workers;
    }
    if let Some(step_ms) = args.step_ms {
        cfg.run.step_duration_ms = step_ms;
    }
    if let Some(dir) = &args.activity_dir {
        cfg.activity.dir = dir.clone();
    }
    if args.no_activity_log {
        cfg.activity.enabled = false;
    }

    validate_config(&cfg)?;
    Ok(cfg)
}

/// Execute one full run against a validated config and return its report.
///
/// One manager control flow, `num_workers` worker control flows, all
/// communication over mpsc channels: a shared event channel into the
/// manager, one command channel per worker out of it.
pub async fn run_benchmark(cfg: &ConfigFile) -> Result<ExecutionReport> {
    let graph = DepGraph::from_config(cfg);
    let scheduler = Scheduler::new(graph, cfg.run.num_workers);

    let (events_tx, events_rx) = mpsc::channel::<WorkerEvent>(64);

    let (command_txs, handles) = spawn_workers(
        cfg.run.num_workers,
        cfg.run.steps_per_task,
        cfg.run.step_duration(),
        &cfg.activity,
        events_tx,
    )?;

    let runtime = Runtime::new(scheduler, events_rx, command_txs, cfg.run.serial_duration());
    let report = runtime.run().await?;

    // Let every worker exit its serve loop so the activity logs are flushed
    // and closed before we report.
    for handle in handles {
        handle.await??;
    }

    Ok(report)
}

/// Simple dry-run output: print run parameters and the dependency table.
fn print_dry_run(cfg: &ConfigFile) {
    println!("taskfarm dry-run");
    println!("  run.num_tasks = {}", cfg.run.num_tasks);
    println!("  run.steps_per_task = {}", cfg.run.steps_per_task);
    println!("  run.num_workers = {}", cfg.run.num_workers);
    println!("  run.step_duration_ms = {}", cfg.run.step_duration_ms);
    println!("  dependencies.policy = {}", cfg.dependencies.policy);
    println!();

    let graph = DepGraph::from_config(cfg);
    println!("dependency table ({} tasks):", graph.num_tasks());
    for task in graph.tasks() {
        let deps = graph.dependencies_of(task);
        if deps.is_empty() {
            println!("  task {task}: no dependencies (immediately ready)");
        } else {
            let list: Vec<String> = deps
                .iter()
                .map(|(t, s)| format!("{t}:{s}"))
                .collect();
            println!("  task {task} depends on {}", list.join(", "));
        }
    }
}
