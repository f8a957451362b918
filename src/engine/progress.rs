//! Progress reporting for the drain loop: a kdam bar in verbose mode plus
//! periodic log lines so headless runs still show liveness.

use kdam::{Bar, BarExt};
use log::info;
use std::time::{Duration, Instant};

/// How often the drain loop logs a progress line.
pub const REPORT_INTERVAL: Duration = Duration::from_secs(5);

/// Create the drain-loop progress bar, or None when not wanted (quiet
/// mode, or nothing to classify).
pub fn create_progress_bar(total: usize, enabled: bool) -> Option<Bar> {
    if !enabled || total == 0 {
        return None;
    }
    Some(kdam::tqdm!(total = total, desc = "classifying", unit = " pairs"))
}

/// Advance the bar by one result. Errors from the terminal are ignored;
/// progress display must never fail the run.
pub fn tick_progress_bar(bar: &mut Option<Bar>) {
    if let Some(bar) = bar {
        let _ = bar.update(1);
    }
}

/// Interval-based progress logging, one line every [`REPORT_INTERVAL`].
pub struct ProgressLog {
    total: usize,
    done: usize,
    report_at: Instant,
}

impl ProgressLog {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            done: 0,
            report_at: Instant::now() + REPORT_INTERVAL,
        }
    }

    /// Count one completed pair, logging when the interval has elapsed.
    pub fn tick(&mut self) {
        self.done += 1;
        if Instant::now() >= self.report_at {
            info!(
                "processed {}% of pairs, {} remain",
                self.done * 100 / self.total.max(1),
                self.total - self.done
            );
            self.report_at += REPORT_INTERVAL;
        }
    }
}
