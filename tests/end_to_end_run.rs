use std::collections::BTreeSet;
use std::error::Error;
use std::path::Path;

use taskfarm::config::ConfigFile;
use taskfarm::run_benchmark;
use taskfarm::worker::ActivityLog;

type TestResult = Result<(), Box<dyn Error>>;

fn small_config(
    num_tasks: usize,
    steps_per_task: usize,
    num_workers: usize,
    activity_dir: &Path,
) -> ConfigFile {
    let mut cfg = ConfigFile::default();
    cfg.run.num_tasks = num_tasks;
    cfg.run.steps_per_task = steps_per_task;
    cfg.run.num_workers = num_workers;
    cfg.run.step_duration_ms = 2;
    cfg.activity.dir = activity_dir.to_string_lossy().into_owned();
    cfg
}

/// Parse every worker's activity log under `dir` and return all
/// (worker_id, task_id, step) rows.
fn read_activity_rows(
    dir: &Path,
    num_workers: usize,
) -> Result<Vec<(usize, usize, usize)>, Box<dyn Error>> {
    let mut rows = Vec::new();

    for worker in 0..num_workers {
        let path = ActivityLog::file_path(dir, worker);
        let mut reader = csv::Reader::from_path(&path)?;

        assert_eq!(
            reader.headers()?,
            &csv::StringRecord::from(vec![
                "worker_id",
                "task_id",
                "step",
                "start_time",
                "end_time"
            ])
        );

        for record in reader.deserialize() {
            let (worker_id, task_id, step, start_time, end_time): (
                usize,
                usize,
                usize,
                f64,
                f64,
            ) = record?;
            assert_eq!(worker_id, worker);
            assert!(end_time >= start_time);
            rows.push((worker_id, task_id, step));
        }
    }

    Ok(rows)
}

#[tokio::test]
async fn staggered_run_completes_each_step_exactly_once() -> TestResult {
    let dir = tempfile::tempdir()?;
    let cfg = small_config(3, 2, 2, dir.path());

    let report = run_benchmark(&cfg).await?;
    assert_eq!(report.num_workers, 2);
    assert!(report.elapsed.as_millis() > 0);
    assert_eq!(report.serial.as_millis(), 12);

    let rows = read_activity_rows(dir.path(), 2)?;
    assert_eq!(rows.len(), 3 * 2);

    // Every (task, step) pair appears exactly once across all workers.
    let pairs: BTreeSet<(usize, usize)> =
        rows.iter().map(|&(_, task, step)| (task, step)).collect();
    assert_eq!(pairs.len(), rows.len());
    for task in 0..3 {
        for step in 0..2 {
            assert!(pairs.contains(&(task, step)), "missing ({task}, {step})");
        }
    }

    Ok(())
}

#[tokio::test]
async fn single_worker_serializes_every_task() -> TestResult {
    let dir = tempfile::tempdir()?;
    let cfg = small_config(4, 2, 1, dir.path());

    let report = run_benchmark(&cfg).await?;

    // One worker cannot beat serial execution; speedup stays around 1.
    assert!(report.speedup() <= 1.5, "speedup was {}", report.speedup());

    let rows = read_activity_rows(dir.path(), 1)?;
    assert_eq!(rows.len(), 4 * 2);

    // A single worker executes whole tasks back to back, steps in order:
    // the log order is exactly task-major, step-minor.
    let expected: Vec<(usize, usize, usize)> = (0..4)
        .flat_map(|task| (0..2).map(move |step| (0, task, step)))
        .collect();
    assert_eq!(rows, expected);

    Ok(())
}

#[tokio::test]
async fn steps_of_one_task_are_reported_in_order_per_worker() -> TestResult {
    let dir = tempfile::tempdir()?;
    let cfg = small_config(5, 3, 2, dir.path());

    run_benchmark(&cfg).await?;

    let rows = read_activity_rows(dir.path(), 2)?;
    assert_eq!(rows.len(), 5 * 3);

    // Within one worker's log, each task's steps appear as a contiguous
    // ascending run; a worker never interleaves tasks.
    for worker in 0..2 {
        let mine: Vec<_> = rows
            .iter()
            .filter(|&&(w, _, _)| w == worker)
            .collect();
        for chunk in mine.chunks(3) {
            for (i, &&(_, task, step)) in chunk.iter().enumerate() {
                assert_eq!(task, chunk[0].1, "worker {worker} interleaved tasks");
                assert_eq!(step, i);
            }
        }
    }

    Ok(())
}

#[tokio::test]
async fn run_with_more_workers_than_tasks_terminates() -> TestResult {
    let dir = tempfile::tempdir()?;
    let cfg = small_config(2, 2, 8, dir.path());

    let report = run_benchmark(&cfg).await?;
    assert_eq!(report.num_workers, 8);

    let rows = read_activity_rows(dir.path(), 8)?;
    assert_eq!(rows.len(), 2 * 2);

    Ok(())
}

#[tokio::test]
async fn disabled_activity_log_writes_nothing() -> TestResult {
    let dir = tempfile::tempdir()?;
    let mut cfg = small_config(2, 2, 2, dir.path());
    cfg.activity.enabled = false;

    run_benchmark(&cfg).await?;

    for worker in 0..2 {
        assert!(!ActivityLog::file_path(dir.path(), worker).exists());
    }

    Ok(())
}

#[tokio::test]
async fn explicit_independent_tasks_run_in_parallel_shape() -> TestResult {
    let dir = tempfile::tempdir()?;
    let mut cfg = small_config(4, 2, 4, dir.path());
    cfg.dependencies.policy = "explicit".to_string();
    cfg.dependencies.edges = Vec::new();

    let report = run_benchmark(&cfg).await?;
    assert!(report.elapsed < report.serial);

    let rows = read_activity_rows(dir.path(), 4)?;
    assert_eq!(rows.len(), 4 * 2);

    Ok(())
}
