//! # strassen-core
//!
//! Core library for the strassen-rs matrix multiplier.
//! Implements Strassen's method with a reduced-memory schedule: the whole
//! recursion runs inside the destination and one scratch buffer of the same
//! size, addressed by absolute block offsets.

pub mod block;
pub mod block_ops;
pub mod constants;
pub mod generator;
pub mod matrix;
pub mod memory_budget;
pub mod multiplier;
pub mod naive;
pub mod observer;
pub mod observers;
pub mod options;
pub mod progress;
pub mod recursive;
pub mod registry;
pub mod scalar;
pub mod schedule;
pub mod strassen;
pub mod workspace;

// Re-exports
pub use block::{Block, Buffer, Quadrant, Target};
pub use constants::{
    exit_codes, DEFAULT_BASE_CASE_THRESHOLD, DEFAULT_TOLERANCE, PROGRESS_REPORT_THRESHOLD,
};
pub use matrix::Matrix;
pub use multiplier::{MatmulError, Multiplier};
pub use naive::NaiveMultiplier;
pub use observer::{ProgressObserver, ProgressSubject};
pub use options::{Options, ScratchMode};
pub use progress::ProgressUpdate;
pub use registry::{DefaultFactory, MultiplierFactory};
pub use scalar::Scalar;
pub use schedule::{NoHook, ScheduleChecker, ScheduleHook, Term};
pub use strassen::StrassenMultiplier;

/// Multiply two square matrices of power-of-two size with default options.
///
/// This is a convenience function for simple use cases. For a custom
/// threshold, pooled scratch or schedule hooks use the [`strassen`] module.
///
/// # Example
/// ```
/// use strassen_core::Matrix;
///
/// let a = Matrix::from_rows(&[vec![1.0f64, 2.0], vec![3.0, 4.0]]).unwrap();
/// let b = Matrix::<f64>::identity(2).unwrap();
/// assert_eq!(strassen_core::multiply(&a, &b).unwrap(), a);
/// ```
///
/// # Errors
///
/// Fails if the operands are not square, differ in size, are not a power of
/// two, or the result cannot be allocated.
pub fn multiply<T: Scalar>(a: &Matrix<T>, b: &Matrix<T>) -> Result<Matrix<T>, MatmulError> {
    let n = a.rows();
    if a.cols() != n || b.rows() != n || b.cols() != n {
        return Err(MatmulError::Config(format!(
            "operands must be square and equal in size, got {}x{} and {}x{}",
            a.rows(),
            a.cols(),
            b.rows(),
            b.cols()
        )));
    }
    strassen::validate_operands(a, b, n)?;
    let mut c = Matrix::zeros(n)?;
    strassen::multiply(&mut c, a, b, n)?;
    Ok(c)
}
