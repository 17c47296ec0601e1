//! Progress tracking types.

use crate::block::{Block, Target};
use crate::constants::STRASSEN_PRODUCTS;
use crate::observer::ProgressObserver;
use crate::schedule::{ScheduleHook, Term};

/// Progress update sent from multipliers to observers.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressUpdate {
    /// Multiplier index (for multi-multiplier runs).
    pub calc_index: usize,
    /// Name of the algorithm producing this update.
    pub algorithm: &'static str,
    /// Current progress as a fraction in [0.0, 1.0].
    pub progress: f64,
    /// Current step number.
    pub current_step: u64,
    /// Total number of steps.
    pub total_steps: u64,
    /// Whether this is the final update.
    pub done: bool,
}

impl ProgressUpdate {
    /// Create a new progress update for step `current` of `total`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn new(calc_index: usize, algorithm: &'static str, current: u64, total: u64) -> Self {
        let progress = if total == 0 {
            0.0
        } else {
            current as f64 / total as f64
        };
        Self {
            calc_index,
            algorithm,
            progress,
            current_step: current,
            total_steps: total,
            done: false,
        }
    }

    /// Create a completion update.
    #[must_use]
    pub fn done(calc_index: usize, algorithm: &'static str) -> Self {
        Self {
            calc_index,
            algorithm,
            progress: 1.0,
            current_step: 0,
            total_steps: 0,
            done: true,
        }
    }
}

/// Schedule hook that reports each finished top-level product.
///
/// The top level of the recursion computes seven half-size products, each
/// roughly an eighth of the work, so they make a natural progress scale.
pub struct ProgressHook<'o> {
    observer: &'o dyn ProgressObserver,
    calc_index: usize,
    algorithm: &'static str,
    finished: u64,
}

impl<'o> ProgressHook<'o> {
    /// Report to `observer` under the given index and algorithm name.
    #[must_use]
    pub fn new(observer: &'o dyn ProgressObserver, calc_index: usize, algorithm: &'static str) -> Self {
        Self {
            observer,
            calc_index,
            algorithm,
            finished: 0,
        }
    }

    /// Number of top-level products reported so far.
    #[must_use]
    pub fn finished(&self) -> u64 {
        self.finished
    }
}

impl ScheduleHook for ProgressHook<'_> {
    fn produced(&mut self, depth: usize, term: Term, _block: Block<Target>) {
        if depth == 0 && matches!(term, Term::Product(_)) {
            self.finished += 1;
            self.observer.on_progress(&ProgressUpdate::new(
                self.calc_index,
                self.algorithm,
                self.finished,
                STRASSEN_PRODUCTS,
            ));
        }
    }
}
