//! Concrete observer implementations.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::constants::PROGRESS_REPORT_THRESHOLD;
use crate::observer::ProgressObserver;
use crate::progress::ProgressUpdate;

/// Last update logged for one run.
#[derive(Clone, Copy)]
struct Logged {
    progress: f64,
    at: Instant,
}

/// Observer that logs finished products through `tracing`.
///
/// Throttling is tracked per `calc_index`, so multipliers running side by
/// side do not starve each other's log lines. Completion is always logged.
pub struct LoggingObserver {
    min_interval: Duration,
    runs: Mutex<HashMap<usize, Logged>>,
}

impl LoggingObserver {
    /// Log at most once per `min_interval_ms` for each run.
    #[must_use]
    pub fn new(min_interval_ms: u64) -> Self {
        Self {
            min_interval: Duration::from_millis(min_interval_ms),
            runs: Mutex::new(HashMap::new()),
        }
    }

    fn accepts(&self, update: &ProgressUpdate, now: Instant) -> bool {
        if update.done {
            return true;
        }
        match self.runs.lock().get(&update.calc_index) {
            None => true,
            Some(last) => {
                now.saturating_duration_since(last.at) >= self.min_interval
                    && update.progress - last.progress >= PROGRESS_REPORT_THRESHOLD
            }
        }
    }
}

impl ProgressObserver for LoggingObserver {
    fn on_progress(&self, update: &ProgressUpdate) {
        let now = Instant::now();
        if !self.accepts(update, now) {
            return;
        }

        if update.done {
            self.runs.lock().remove(&update.calc_index);
            info!(run = update.calc_index, algorithm = update.algorithm, "multiplication complete");
            return;
        }

        debug!(
            run = update.calc_index,
            algorithm = update.algorithm,
            product = update.current_step,
            of = update.total_steps,
            "top-level product finished"
        );
        self.runs.lock().insert(
            update.calc_index,
            Logged {
                progress: update.progress,
                at: now,
            },
        );
    }
}

/// Discards every update.
#[derive(Default)]
pub struct NoOpObserver;

impl NoOpObserver {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ProgressObserver for NoOpObserver {
    fn on_progress(&self, _update: &ProgressUpdate) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(run: usize, current: u64) -> ProgressUpdate {
        ProgressUpdate::new(run, "Strassen", current, 7)
    }

    #[test]
    fn first_update_of_a_run_is_logged() {
        let observer = LoggingObserver::new(60_000);
        assert!(observer.accepts(&step(0, 1), Instant::now()));
    }

    #[test]
    fn interval_throttles_one_run() {
        let observer = LoggingObserver::new(60_000);
        observer.on_progress(&step(0, 1));
        let now = Instant::now();
        assert!(!observer.accepts(&step(0, 2), now));
        assert!(observer.accepts(&step(0, 2), now + Duration::from_secs(61)));
    }

    #[test]
    fn runs_are_throttled_independently() {
        let observer = LoggingObserver::new(60_000);
        observer.on_progress(&step(0, 1));
        assert!(observer.accepts(&step(1, 1), Instant::now()));
    }

    #[test]
    fn small_progress_is_skipped() {
        let observer = LoggingObserver::new(0);
        let mut update = step(0, 1);
        observer.on_progress(&update);
        update.progress += PROGRESS_REPORT_THRESHOLD / 2.0;
        assert!(!observer.accepts(&update, Instant::now() + Duration::from_secs(1)));
    }

    #[test]
    fn completion_is_always_logged_and_resets_the_run() {
        let observer = LoggingObserver::new(60_000);
        observer.on_progress(&step(0, 6));
        assert!(observer.accepts(&ProgressUpdate::done(0, "Strassen"), Instant::now()));
        observer.on_progress(&ProgressUpdate::done(0, "Strassen"));
        assert!(observer.runs.lock().is_empty());
    }

    #[test]
    fn noop_observer_does_nothing() {
        NoOpObserver::default().on_progress(&step(0, 1));
    }
}
