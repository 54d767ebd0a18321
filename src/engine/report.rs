// src/engine/report.rs

use std::fmt;
use std::time::Duration;

/// Aggregate result of one benchmark run.
///
/// The speedup compares the measured wall time against the serial baseline
/// (`num_tasks * steps_per_task * step_duration`), i.e. the time one worker
/// with zero scheduling overhead would need. The ideal speedup is the number
/// of workers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExecutionReport {
    pub elapsed: Duration,
    pub serial: Duration,
    pub num_workers: usize,
}

impl ExecutionReport {
    pub fn new(elapsed: Duration, serial: Duration, num_workers: usize) -> Self {
        Self {
            elapsed,
            serial,
            num_workers,
        }
    }

    /// Measured speedup relative to fully serial execution.
    pub fn speedup(&self) -> f64 {
        let elapsed = self.elapsed.as_secs_f64();
        if elapsed == 0.0 {
            return 0.0;
        }
        self.serial.as_secs_f64() / elapsed
    }

    /// Upper bound on the achievable speedup.
    pub fn ideal_speedup(&self) -> usize {
        self.num_workers
    }
}

impl fmt::Display for ExecutionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "execution time: {:.3} s, speedup: {:.2}, ideal: {} ({} workers)",
            self.elapsed.as_secs_f64(),
            self.speedup(),
            self.ideal_speedup(),
            self.num_workers
        )
    }
}
