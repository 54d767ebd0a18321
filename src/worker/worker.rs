// src/worker/worker.rs

use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::config::model::ActivitySection;
use crate::dag::TaskId;
use crate::dag::scheduler::WorkerId;
use crate::engine::runtime::{WorkerCommand, WorkerEvent};
use crate::worker::activity::{ActivityLog, ActivityRecord, epoch_secs};

/// Command-channel depth per worker. A worker only ever holds one
/// assignment plus the final Stop, so this never fills up in practice.
const COMMAND_CHANNEL_CAPACITY: usize = 8;

/// Static parameters a worker needs; workers hold no scheduling state
/// beyond the task they are currently executing.
#[derive(Debug, Clone, Copy)]
pub struct WorkerContext {
    pub worker_id: WorkerId,
    pub steps_per_task: usize,
    pub step_duration: Duration,
}

/// Spawn `num_workers` serve loops.
///
/// Returns the per-worker command senders (indexed by worker id, for Assign
/// and the Stop broadcast) and the join handles. Every worker reports back
/// on a clone of `events_tx`; the manager never needs to know which channel
/// an event came from beyond the worker id inside it.
pub fn spawn_workers(
    num_workers: usize,
    steps_per_task: usize,
    step_duration: Duration,
    activity: &ActivitySection,
    events_tx: mpsc::Sender<WorkerEvent>,
) -> Result<(Vec<mpsc::Sender<WorkerCommand>>, Vec<JoinHandle<Result<()>>>)> {
    let mut command_txs = Vec::with_capacity(num_workers);
    let mut handles = Vec::with_capacity(num_workers);

    for worker_id in 0..num_workers {
        let (tx, rx) = mpsc::channel::<WorkerCommand>(COMMAND_CHANNEL_CAPACITY);

        let log = if activity.enabled {
            ActivityLog::create(&activity.dir, worker_id)?
        } else {
            ActivityLog::disabled()
        };

        let ctx = WorkerContext {
            worker_id,
            steps_per_task,
            step_duration,
        };
        let events_tx = events_tx.clone();
        handles.push(tokio::spawn(serve(ctx, rx, events_tx, log)));

        command_txs.push(tx);
    }

    Ok((command_txs, handles))
}

/// Worker serve loop.
///
/// Blocks on the command channel; on Assign, executes the task's steps
/// strictly in order, reporting StepDone after each and WorkerFree after
/// the last, then returns to the receive loop. On Stop (or a closed
/// channel) the loop terminates.
///
/// A closed event channel means the manager is gone — either shutdown raced
/// ahead of our last report or the run already failed on the manager side.
/// Neither is a worker error, so the loop just stops.
pub async fn serve(
    ctx: WorkerContext,
    mut commands_rx: mpsc::Receiver<WorkerCommand>,
    events_tx: mpsc::Sender<WorkerEvent>,
    mut log: ActivityLog,
) -> Result<()> {
    debug!(worker = ctx.worker_id, "worker started");

    while let Some(command) = commands_rx.recv().await {
        match command {
            WorkerCommand::Assign(task) => {
                debug!(worker = ctx.worker_id, task, "worker picked up task");
                if !execute_task(&ctx, task, &events_tx, &mut log).await? {
                    break;
                }

                let free = WorkerEvent::WorkerFree {
                    worker: ctx.worker_id,
                };
                if events_tx.send(free).await.is_err() {
                    debug!(worker = ctx.worker_id, "manager channel closed; stopping");
                    break;
                }
            }
            WorkerCommand::Stop => {
                info!(worker = ctx.worker_id, "worker stopping");
                break;
            }
        }
    }

    Ok(())
}

/// Run every step of one task. The step body is the benchmark's fixed-cost
/// placeholder: a sleep of the configured duration.
///
/// Returns `Ok(false)` if the manager channel closed mid-task; activity-log
/// IO failures are real errors.
async fn execute_task(
    ctx: &WorkerContext,
    task: TaskId,
    events_tx: &mpsc::Sender<WorkerEvent>,
    log: &mut ActivityLog,
) -> Result<bool> {
    for step in 0..ctx.steps_per_task {
        let start_time = epoch_secs();
        tokio::time::sleep(ctx.step_duration).await;
        let end_time = epoch_secs();

        log.record(ActivityRecord {
            worker_id: ctx.worker_id,
            task_id: task,
            step,
            start_time,
            end_time,
        })?;

        let done = WorkerEvent::StepDone {
            worker: ctx.worker_id,
            task,
            step,
        };
        if events_tx.send(done).await.is_err() {
            debug!(
                worker = ctx.worker_id,
                task, step, "manager channel closed mid-task; stopping"
            );
            return Ok(false);
        }
    }

    Ok(true)
}
