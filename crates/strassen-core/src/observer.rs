//! Progress observers and fan-out.
//!
//! A multiplier reports to exactly one `&dyn ProgressObserver`. When a run
//! needs several sinks (log lines and terminal bars, say), they are collected
//! into a [`ProgressSubject`] and the subject is passed instead.

use std::sync::Arc;

use crate::progress::ProgressUpdate;

/// Receives progress updates from a running multiplication.
///
/// Called from whichever thread runs the multiplier, possibly several at
/// once when multipliers are compared side by side.
pub trait ProgressObserver: Send + Sync {
    fn on_progress(&self, update: &ProgressUpdate);
}

/// Forwards every update to each collected observer, in order.
#[derive(Default)]
pub struct ProgressSubject {
    sinks: Vec<Arc<dyn ProgressObserver>>,
}

impl FromIterator<Arc<dyn ProgressObserver>> for ProgressSubject {
    fn from_iter<I: IntoIterator<Item = Arc<dyn ProgressObserver>>>(iter: I) -> Self {
        Self {
            sinks: iter.into_iter().collect(),
        }
    }
}

impl ProgressObserver for ProgressSubject {
    fn on_progress(&self, update: &ProgressUpdate) {
        for sink in &self.sinks {
            sink.on_progress(update);
        }
    }
}
