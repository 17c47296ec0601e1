//! Orchestration interfaces.

use std::time::Duration;

use strassen_core::{MatmulError, Matrix, Scalar};

/// Trait for presenting results to the user.
pub trait ResultPresenter<T: Scalar = f32>: Send + Sync {
    /// Present one multiplication result.
    fn present_result(&self, result: &MultiplicationResult<T>, n: usize, details: bool);

    /// Present a side-by-side comparison.
    fn present_comparison(&self, results: &[MultiplicationResult<T>]);

    /// Present an error.
    fn present_error(&self, error: &str);
}

/// Result of a single multiplication.
#[derive(Debug, Clone)]
pub struct MultiplicationResult<T = f32> {
    /// Algorithm name.
    pub algorithm: String,
    /// The product or a structured error.
    pub outcome: Result<Matrix<T>, MatmulError>,
    /// Wall-clock duration of the multiplication.
    pub duration: Duration,
}

impl<T: Scalar> MultiplicationResult<T> {
    /// The product, if the multiplication succeeded.
    pub fn product(&self) -> Option<&Matrix<T>> {
        self.outcome.as_ref().ok()
    }

    /// The error, if the multiplication failed.
    pub fn error(&self) -> Option<&MatmulError> {
        self.outcome.as_ref().err()
    }
}
