// src/engine/runtime.rs

use std::time::{Duration, Instant};

use anyhow::{Result, anyhow};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::dag::scheduler::{Assignment, Scheduler, WorkerId};
use crate::dag::{StepId, TaskId};
use crate::engine::report::ExecutionReport;

/// Commands the manager sends to a worker over its private channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerCommand {
    /// Execute all steps of this task, in order.
    Assign(TaskId),
    /// Terminate the serve loop. Broadcast once, at shutdown.
    Stop,
}

/// Events workers send to the manager over the shared event channel.
///
/// Per-worker FIFO ordering is guaranteed by the channel: StepDone for step
/// k always precedes StepDone for step k+1, and WorkerFree follows the last
/// StepDone of the task. Nothing is guaranteed across workers, and the
/// scheduler does not rely on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerEvent {
    StepDone {
        worker: WorkerId,
        task: TaskId,
        step: StepId,
    },
    WorkerFree {
        worker: WorkerId,
    },
}

/// The manager event loop.
///
/// Owns the [`Scheduler`] and all channel endpoints on the manager side:
/// one shared receiver for worker events and one sender per worker for
/// commands. All scheduling state mutation happens on this single control
/// flow, between poll points, so no locking is needed anywhere.
pub struct Runtime {
    scheduler: Scheduler,

    /// Unified event stream from all workers.
    events_rx: mpsc::Receiver<WorkerEvent>,

    /// Per-worker command channels, indexed by worker id.
    worker_txs: Vec<mpsc::Sender<WorkerCommand>>,

    /// Serial baseline for the report.
    serial: Duration,
}

impl Runtime {
    pub fn new(
        scheduler: Scheduler,
        events_rx: mpsc::Receiver<WorkerEvent>,
        worker_txs: Vec<mpsc::Sender<WorkerCommand>>,
        serial: Duration,
    ) -> Self {
        Self {
            scheduler,
            events_rx,
            worker_txs,
            serial,
        }
    }

    /// Drive the run to completion and return the throughput report.
    ///
    /// Each iteration awaits one event from *any* worker, drains whatever
    /// else is already pending without blocking, then hands every ready task
    /// to an idle worker. The loop never waits on a specific worker. Once
    /// the queue and the in-flight set are both empty, Stop is broadcast and
    /// any stragglers still in the channel are dropped with the receiver.
    pub async fn run(mut self) -> Result<ExecutionReport> {
        let num_workers = self.worker_txs.len();
        info!(num_workers, "manager started");
        let started = Instant::now();

        // Roots of the dependency table go out immediately.
        self.dispatch_ready().await?;

        while !self.scheduler.is_complete() {
            let event = self.events_rx.recv().await.ok_or_else(|| {
                anyhow!("all workers disconnected before the run completed")
            })?;
            self.apply_event(event);

            // Handle everything already queued in one sweep before scanning
            // for ready tasks again.
            while let Ok(event) = self.events_rx.try_recv() {
                self.apply_event(event);
            }

            self.dispatch_ready().await?;
        }

        self.broadcast_stop().await;

        let elapsed = started.elapsed();
        let report = ExecutionReport::new(elapsed, self.serial, num_workers);
        info!(elapsed_secs = elapsed.as_secs_f64(), speedup = report.speedup(), "run complete");
        Ok(report)
    }

    fn apply_event(&mut self, event: WorkerEvent) {
        debug!(?event, "manager received event");
        match event {
            WorkerEvent::StepDone { task, step, .. } => {
                self.scheduler.record_step_done(task, step);
            }
            WorkerEvent::WorkerFree { worker } => {
                self.scheduler.record_worker_free(worker);
            }
        }
    }

    /// Ask the scheduler for newly ready tasks and deliver the Assign
    /// messages.
    async fn dispatch_ready(&mut self) -> Result<()> {
        let assignments = self.scheduler.take_assignments();
        for Assignment { worker, task } in assignments {
            info!(task, worker, "assigning task");
            self.worker_txs[worker]
                .send(WorkerCommand::Assign(task))
                .await
                .map_err(|_| anyhow!("worker {worker} is gone; cannot assign task {task}"))?;
        }
        Ok(())
    }

    /// Broadcast Stop to every worker. A worker that already vanished only
    /// warrants a warning at this point; the run itself is done.
    async fn broadcast_stop(&mut self) {
        for (worker, tx) in self.worker_txs.iter().enumerate() {
            if tx.send(WorkerCommand::Stop).await.is_err() {
                warn!(worker, "worker gone before stop signal");
            }
        }
        debug!("stop broadcast complete");
    }
}
