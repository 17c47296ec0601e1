//! The `Multiplier` trait consumed by orchestration, and the error type shared
//! by every multiplication routine.

use crate::matrix::Matrix;
use crate::observer::ProgressObserver;
use crate::options::Options;
use crate::scalar::Scalar;

/// Error type for matrix multiplication.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MatmulError {
    /// The extent is zero or not a power of two.
    #[error("extent {0} is not a power of two")]
    NotPowerOfTwo(usize),

    /// A buffer is smaller than the requested extent.
    #[error("buffer {buffer} is {rows}x{cols}, need at least {required}x{required}")]
    DimensionMismatch {
        /// Which buffer (`"A"`, `"B"`, `"C"` or `"M"`).
        buffer: &'static str,
        /// Allocated rows.
        rows: usize,
        /// Allocated columns.
        cols: usize,
        /// Requested extent.
        required: usize,
    },

    /// A buffer could not be allocated.
    #[error("failed to allocate {elements} matrix elements")]
    Allocation {
        /// Number of elements requested.
        elements: usize,
    },

    /// The estimated footprint exceeds the configured memory limit.
    #[error("multiplication needs {required} bytes, limit is {limit} bytes")]
    MemoryLimit {
        /// Estimated bytes.
        required: usize,
        /// Configured limit in bytes.
        limit: usize,
    },

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Products from different multipliers disagree.
    #[error("result mismatch between multipliers: relative error {max_error:e} exceeds {tolerance:e}")]
    Mismatch {
        /// Largest relative error observed.
        max_error: f64,
        /// Configured relative tolerance.
        tolerance: f64,
    },
}

/// A way of multiplying two square matrices, consumed by orchestration.
pub trait Multiplier<T: Scalar>: Send + Sync {
    /// Compute the product of the leading `n x n` blocks of `a` and `b`.
    fn multiply(
        &self,
        observer: &dyn ProgressObserver,
        calc_index: usize,
        a: &Matrix<T>,
        b: &Matrix<T>,
        n: usize,
        opts: &Options,
    ) -> Result<Matrix<T>, MatmulError>;

    /// Display name of this multiplier.
    fn name(&self) -> &'static str;
}
