use std::error::Error;
use std::io::Write;
use std::time::Duration;

use taskfarm::config::loader::{load_and_validate, load_from_path};
use taskfarm::engine::ExecutionReport;

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn speedup_is_serial_over_elapsed() {
    let report = ExecutionReport::new(
        Duration::from_secs(2),
        Duration::from_secs(8),
        4,
    );
    assert!((report.speedup() - 4.0).abs() < 1e-9);
    assert_eq!(report.ideal_speedup(), 4);
}

#[test]
fn serial_run_has_speedup_one() {
    let report = ExecutionReport::new(
        Duration::from_millis(600),
        Duration::from_millis(600),
        1,
    );
    assert!((report.speedup() - 1.0).abs() < 1e-9);
}

#[test]
fn zero_elapsed_does_not_divide_by_zero() {
    let report = ExecutionReport::new(Duration::ZERO, Duration::from_secs(1), 2);
    assert_eq!(report.speedup(), 0.0);
}

#[test]
fn display_mentions_time_and_speedup() {
    let report = ExecutionReport::new(
        Duration::from_secs(2),
        Duration::from_secs(8),
        4,
    );
    let text = report.to_string();
    assert!(text.contains("2.000 s"));
    assert!(text.contains("speedup: 4.00"));
    assert!(text.contains("ideal: 4"));
}

#[test]
fn load_and_validate_reads_a_file() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("Taskfarm.toml");

    let mut file = std::fs::File::create(&path)?;
    writeln!(file, "[run]")?;
    writeln!(file, "num_tasks = 2")?;
    writeln!(file, "num_workers = 1")?;

    let cfg = load_and_validate(&path, true)?;
    assert_eq!(cfg.run.num_tasks, 2);
    assert_eq!(cfg.run.num_workers, 1);
    // Untouched fields keep their defaults.
    assert_eq!(cfg.run.steps_per_task, 10);

    Ok(())
}

#[test]
fn explicitly_given_missing_config_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.toml");
    assert!(load_from_path(&path).is_err());
    assert!(load_and_validate(&path, true).is_err());
}

#[test]
fn missing_default_config_falls_back_to_defaults() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("Taskfarm.toml");
    let cfg = load_and_validate(&path, false)?;
    assert_eq!(cfg.run.num_tasks, 16);
    Ok(())
}

#[test]
fn invalid_config_file_fails_validation() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("Taskfarm.toml");

    let mut file = std::fs::File::create(&path)?;
    writeln!(file, "[run]")?;
    writeln!(file, "num_workers = 0")?;

    assert!(load_and_validate(&path, true).is_err());
    Ok(())
}
