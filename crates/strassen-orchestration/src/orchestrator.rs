//! Core orchestration: concurrent execution and result analysis.
//!
//! Different multipliers may run side by side on the rayon pool; each
//! multiplication itself stays on one thread.

use std::sync::Arc;
use std::time::Instant;

use rayon::iter::{IntoParallelRefIterator, IndexedParallelIterator, ParallelIterator};

use strassen_core::observer::ProgressObserver;
use strassen_core::observers::NoOpObserver;
use strassen_core::{MatmulError, Matrix, Multiplier, Options, Scalar};

use crate::interfaces::MultiplicationResult;

/// Execute the multiplication with all given multipliers.
pub fn execute_multiplications<T: Scalar>(
    multipliers: &[Arc<dyn Multiplier<T>>],
    a: &Matrix<T>,
    b: &Matrix<T>,
    n: usize,
    opts: &Options,
) -> Vec<MultiplicationResult<T>> {
    execute_multiplications_with_observer(multipliers, a, b, n, opts, &NoOpObserver::new())
}

/// Execute the multiplication with all given multipliers and a progress observer.
pub fn execute_multiplications_with_observer<T: Scalar>(
    multipliers: &[Arc<dyn Multiplier<T>>],
    a: &Matrix<T>,
    b: &Matrix<T>,
    n: usize,
    opts: &Options,
    observer: &dyn ProgressObserver,
) -> Vec<MultiplicationResult<T>> {
    if let [multiplier] = multipliers {
        return vec![run_one(multiplier.as_ref(), 0, a, b, n, opts, observer)];
    }

    multipliers
        .par_iter()
        .enumerate()
        .map(|(i, multiplier)| run_one(multiplier.as_ref(), i, a, b, n, opts, observer))
        .collect()
}

fn run_one<T: Scalar>(
    multiplier: &dyn Multiplier<T>,
    calc_index: usize,
    a: &Matrix<T>,
    b: &Matrix<T>,
    n: usize,
    opts: &Options,
    observer: &dyn ProgressObserver,
) -> MultiplicationResult<T> {
    let start = Instant::now();
    let outcome = multiplier.multiply(observer, calc_index, a, b, n, opts);
    let duration = start.elapsed();

    match &outcome {
        Ok(_) => tracing::debug!(
            algorithm = multiplier.name(),
            n,
            elapsed_ms = duration.as_millis(),
            "multiplication finished"
        ),
        Err(e) => tracing::debug!(algorithm = multiplier.name(), n, error = %e, "multiplication failed"),
    }

    MultiplicationResult {
        algorithm: multiplier.name().to_string(),
        outcome,
        duration,
    }
}

/// Check that every successful product agrees with the first one within the
/// relative `tolerance`.
///
/// Failed results are skipped. If none succeeded, the first failure is
/// returned.
pub fn analyze_comparison_results<T: Scalar>(
    results: &[MultiplicationResult<T>],
    tolerance: f64,
) -> Result<(), MatmulError> {
    let mut products = results.iter().filter_map(MultiplicationResult::product);

    let Some(reference) = products.next() else {
        return Err(results
            .iter()
            .find_map(|r| r.error().cloned())
            .unwrap_or_else(|| MatmulError::Config("no results to compare".into())));
    };

    let max_error = products
        .map(|p| p.relative_error(reference).to_f64_lossy())
        .fold(0.0f64, |acc, e| if e.is_nan() || e > acc { e } else { acc });
    if max_error.is_nan() || max_error > tolerance {
        return Err(MatmulError::Mismatch {
            max_error,
            tolerance,
        });
    }
    Ok(())
}
