//! Step timing helpers.
//!
//! Provides an RAII timer that reports each step's duration to the `tracing` log, and
//! an accumulator for whole-run statistics.

use std::time::{Duration, Instant};
use tracing::debug;

/// Measures one scope and logs its duration when dropped.
pub struct StepTimer {
    start: Instant,
    step: usize,
}

impl StepTimer {
    /// Starts timing step `step`.
    pub fn start(step: usize) -> Self {
        Self {
            start: Instant::now(),
            step,
        }
    }

    /// Time since the timer started.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for StepTimer {
    fn drop(&mut self) {
        debug!(
            step = self.step,
            elapsed_ms = self.elapsed().as_secs_f64() * 1000.0,
            "step computed"
        );
    }
}

/// Running totals over all computed steps.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TimingStats {
    steps: usize,
    total: Duration,
    slowest: Duration,
}

impl TimingStats {
    /// Records one step.
    pub fn record(&mut self, elapsed: Duration) {
        self.steps += 1;
        self.total += elapsed;
        self.slowest = self.slowest.max(elapsed);
    }

    /// Number of recorded steps.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Sum of all recorded durations.
    pub fn total(&self) -> Duration {
        self.total
    }

    /// Longest recorded step.
    pub fn slowest(&self) -> Duration {
        self.slowest
    }

    /// Mean step duration, zero before the first step.
    pub fn mean(&self) -> Duration {
        match u32::try_from(self.steps) {
            Ok(0) => Duration::ZERO,
            Ok(steps) => self.total / steps,
            Err(_) => Duration::from_secs_f64(self.total.as_secs_f64() / self.steps as f64),
        }
    }
}
