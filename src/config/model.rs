// src/config/model.rs

use std::time::Duration;

use serde::Deserialize;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [run]
/// num_tasks = 16
/// steps_per_task = 10
/// num_workers = 4
/// step_duration_ms = 100
///
/// [activity]
/// dir = "logs"
///
/// [dependencies]
/// policy = "staggered"
/// ```
///
/// All sections are optional and have reasonable defaults, so an absent or
/// empty config file still describes a valid (small) benchmark run.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ConfigFile {
    /// Run parameters from `[run]`.
    #[serde(default)]
    pub run: RunSection,

    /// Activity-log settings from `[activity]`.
    #[serde(default)]
    pub activity: ActivitySection,

    /// Dependency policy from `[dependencies]`.
    #[serde(default)]
    pub dependencies: DependencySection,
}

/// `[run]` section: the four construction-time parameters of a run.
///
/// None of these are mutable after startup; the scheduler builds its task
/// pool and dependency table once from them.
#[derive(Debug, Clone, Deserialize)]
pub struct RunSection {
    /// Number of tasks in the pool (task ids `0..num_tasks`).
    #[serde(default = "default_num_tasks")]
    pub num_tasks: usize,

    /// Number of steps every task executes (step ids `0..steps_per_task`).
    #[serde(default = "default_steps_per_task")]
    pub steps_per_task: usize,

    /// Number of worker tasks to spawn.
    #[serde(default = "default_num_workers")]
    pub num_workers: usize,

    /// Fixed cost of one step, in milliseconds.
    #[serde(default = "default_step_duration_ms")]
    pub step_duration_ms: u64,
}

fn default_num_tasks() -> usize {
    16
}

fn default_steps_per_task() -> usize {
    10
}

fn default_num_workers() -> usize {
    4
}

fn default_step_duration_ms() -> u64 {
    100
}

impl Default for RunSection {
    fn default() -> Self {
        Self {
            num_tasks: default_num_tasks(),
            steps_per_task: default_steps_per_task(),
            num_workers: default_num_workers(),
            step_duration_ms: default_step_duration_ms(),
        }
    }
}

impl RunSection {
    /// Per-step cost as a [`Duration`].
    pub fn step_duration(&self) -> Duration {
        Duration::from_millis(self.step_duration_ms)
    }

    /// Serial baseline: the wall time a single worker with zero scheduling
    /// overhead would need (`num_tasks * steps_per_task * step_duration`).
    pub fn serial_duration(&self) -> Duration {
        self.step_duration() * (self.num_tasks * self.steps_per_task) as u32
    }
}

/// `[activity]` section.
///
/// Each worker appends one CSV row per executed step to
/// `<dir>/activity_log_<worker_id>.csv`; the files are consumed by offline
/// plotting tooling and never read back by the scheduler.
#[derive(Debug, Clone, Deserialize)]
pub struct ActivitySection {
    /// Directory the per-worker CSV files are written to.
    #[serde(default = "default_activity_dir")]
    pub dir: String,

    /// Disable to run without writing any activity files.
    #[serde(default = "default_activity_enabled")]
    pub enabled: bool,
}

fn default_activity_dir() -> String {
    ".".to_string()
}

fn default_activity_enabled() -> bool {
    true
}

impl Default for ActivitySection {
    fn default() -> Self {
        Self {
            dir: default_activity_dir(),
            enabled: default_activity_enabled(),
        }
    }
}

/// `[dependencies]` section.
///
/// - `policy = "staggered"` (default): task T depends on step `i` of task
///   `T-1-i` for every `i in 0..steps_per_task` with `T-1-i >= 0`, the
///   staggered-pipeline shape of the benchmark.
/// - `policy = "explicit"`: the DAG is given edge by edge in `edges`.
#[derive(Debug, Clone, Deserialize)]
pub struct DependencySection {
    /// `"staggered"` or `"explicit"`.
    #[serde(default = "default_dependency_policy")]
    pub policy: String,

    /// Only read when `policy = "explicit"`.
    #[serde(default)]
    pub edges: Vec<DependencyEdge>,
}

fn default_dependency_policy() -> String {
    "staggered".to_string()
}

impl Default for DependencySection {
    fn default() -> Self {
        Self {
            policy: default_dependency_policy(),
            edges: Vec::new(),
        }
    }
}

/// One explicit dependency edge: `task` may not be assigned until step
/// `on_step` of task `on_task` has completed.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct DependencyEdge {
    pub task: usize,
    pub on_task: usize,
    pub on_step: usize,
}
