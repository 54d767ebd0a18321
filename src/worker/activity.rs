// src/worker/activity.rs

use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::dag::{StepId, TaskId};
use crate::dag::scheduler::WorkerId;

/// One row of the activity log: a single executed step, with wall-clock
/// bounds as seconds since the Unix epoch.
///
/// The column set is the external collaborator format consumed by the
/// offline Gantt/efficiency plotting tools; the scheduler never reads these
/// files back.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ActivityRecord {
    pub worker_id: WorkerId,
    pub task_id: TaskId,
    pub step: StepId,
    pub start_time: f64,
    pub end_time: f64,
}

/// Append-only per-worker activity log, one CSV file per worker.
///
/// Every row is flushed as it is written so a partial run still leaves
/// usable data behind.
pub struct ActivityLog {
    writer: Option<csv::Writer<File>>,
}

impl ActivityLog {
    /// Open `<dir>/activity_log_<worker_id>.csv` for writing. The directory
    /// is created if missing.
    ///
    /// The header row goes out immediately, not lazily on the first record,
    /// so an idle worker still leaves a well-formed (empty) log behind.
    pub fn create(dir: impl AsRef<Path>, worker_id: WorkerId) -> Result<Self> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating activity log directory {:?}", dir))?;

        let path = Self::file_path(dir, worker_id);
        let file = File::create(&path)
            .with_context(|| format!("creating activity log at {:?}", path))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer
            .write_record(["worker_id", "task_id", "step", "start_time", "end_time"])
            .with_context(|| format!("writing activity log header to {:?}", path))?;
        writer.flush().context("flushing activity log header")?;

        Ok(Self {
            writer: Some(writer),
        })
    }

    /// A log that discards everything (activity logging disabled).
    pub fn disabled() -> Self {
        Self { writer: None }
    }

    /// Path of the log file a given worker writes.
    pub fn file_path(dir: impl AsRef<Path>, worker_id: WorkerId) -> PathBuf {
        dir.as_ref().join(format!("activity_log_{worker_id}.csv"))
    }

    /// Append one record and flush it.
    pub fn record(&mut self, record: ActivityRecord) -> Result<()> {
        let Some(writer) = self.writer.as_mut() else {
            return Ok(());
        };
        writer
            .serialize(record)
            .context("writing activity record")?;
        writer.flush().context("flushing activity log")?;
        Ok(())
    }
}

/// Current wall-clock time as fractional seconds since the Unix epoch,
/// matching what the plotting tools expect in `start_time` / `end_time`.
pub fn epoch_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}
