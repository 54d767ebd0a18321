// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `taskfarm`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "taskfarm",
    version,
    about = "Dependency-aware task-farm scheduler benchmark.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Taskfarm.toml` in the current working directory; if the
    /// default file does not exist, built-in defaults are used.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Override `[run].num_tasks`.
    #[arg(long, value_name = "N")]
    pub tasks: Option<usize>,

    /// Override `[run].steps_per_task`.
    #[arg(long, value_name = "S")]
    pub steps: Option<usize>,

    /// Override `[run].num_workers`.
    #[arg(long, value_name = "W")]
    pub workers: Option<usize>,

    /// Override `[run].step_duration_ms`.
    #[arg(long, value_name = "MS")]
    pub step_ms: Option<u64>,

    /// Override `[activity].dir`.
    #[arg(long, value_name = "DIR")]
    pub activity_dir: Option<String>,

    /// Disable the per-worker activity logs.
    #[arg(long)]
    pub no_activity_log: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `TASKFARM_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Print the run parameters and the dependency table, but don't execute.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
