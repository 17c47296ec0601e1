//! Adaptive threshold estimation.
//!
//! Starts at the default threshold and walks to a neighbouring power of two
//! while that neighbour is measurably faster.

use std::time::Duration;

use strassen_core::constants::DEFAULT_BASE_CASE_THRESHOLD;
use strassen_core::MatmulError;

use crate::microbench::{Bench, CANDIDATE_THRESHOLDS};

/// Matrix size used by the quick search.
pub const ADAPTIVE_SIZE: usize = 256;

/// Timed runs per threshold in the quick search.
const ADAPTIVE_RUNS: u32 = 3;

/// A neighbour must beat the current threshold by this factor to win.
const IMPROVEMENT: f64 = 0.95;

/// Estimated threshold from adaptive calibration.
#[derive(Debug, Clone)]
pub struct EstimatedThreshold {
    pub base_case_threshold: usize,
    pub matrix_size: usize,
    /// Thresholds that were actually timed, in order.
    pub tried: Vec<usize>,
}

impl Default for EstimatedThreshold {
    fn default() -> Self {
        Self {
            base_case_threshold: DEFAULT_BASE_CASE_THRESHOLD,
            matrix_size: ADAPTIVE_SIZE,
            tried: Vec::new(),
        }
    }
}

/// Estimate the best threshold with a quick search at [`ADAPTIVE_SIZE`].
#[must_use]
pub fn estimate_threshold() -> EstimatedThreshold {
    estimate_threshold_at(ADAPTIVE_SIZE)
}

/// Estimate the best threshold at size `n`, falling back to the default if
/// the operands cannot be allocated.
#[must_use]
pub fn estimate_threshold_at(n: usize) -> EstimatedThreshold {
    match search(n) {
        Ok(est) => est,
        Err(e) => {
            tracing::warn!(size = n, error = %e, "adaptive calibration failed, using default threshold");
            EstimatedThreshold {
                matrix_size: n,
                ..EstimatedThreshold::default()
            }
        }
    }
}

fn search(n: usize) -> Result<EstimatedThreshold, MatmulError> {
    let mut bench = Bench::new(n, 0xADA9_71FE)?;
    let mut tried = Vec::new();
    let mut failure: Option<MatmulError> = None;

    let best = climb(CANDIDATE_THRESHOLDS, DEFAULT_BASE_CASE_THRESHOLD, |threshold| {
        tried.push(threshold);
        match bench.strassen(threshold, ADAPTIVE_RUNS) {
            Ok(timing) => Some(timing.median),
            Err(e) => {
                if failure.is_none() {
                    failure = Some(e);
                }
                None
            }
        }
    });
    if let Some(e) = failure {
        return Err(e);
    }

    tracing::debug!(size = n, threshold = best, ?tried, "adaptive threshold estimate");
    Ok(EstimatedThreshold {
        base_case_threshold: best,
        matrix_size: n,
        tried,
    })
}

/// Hill-climb over the sorted `candidates`, starting from `start` (or the
/// nearest candidate to it). `cost` returns `None` when a candidate cannot be
/// measured; such candidates never win.
pub fn climb<F>(candidates: &[usize], start: usize, mut cost: F) -> usize
where
    F: FnMut(usize) -> Option<Duration>,
{
    let Some(mut idx) = nearest(candidates, start) else {
        return start;
    };
    let Some(mut best) = cost(candidates[idx]) else {
        return candidates[idx];
    };

    // Pick a direction from the first neighbour that improves, then keep going.
    let mut step: Option<isize> = None;
    loop {
        let directions: Vec<isize> = step.map_or_else(|| vec![-1, 1], |d| vec![d]);
        let mut moved = false;
        for dir in directions {
            let Some(next) = idx.checked_add_signed(dir).filter(|&i| i < candidates.len()) else {
                continue;
            };
            let Some(t) = cost(candidates[next]) else {
                continue;
            };
            if t.as_secs_f64() < best.as_secs_f64() * IMPROVEMENT {
                best = t;
                idx = next;
                step = Some(dir);
                moved = true;
                break;
            }
        }
        if !moved {
            return candidates[idx];
        }
    }
}

fn nearest(candidates: &[usize], target: usize) -> Option<usize> {
    candidates
        .iter()
        .enumerate()
        .min_by_key(|&(_, c)| c.abs_diff(target))
        .map(|(i, _)| i)
}
