//! Driver: validates a top-level call, provides its scratch buffer and runs
//! the recursion over it.

use strassen_memory::BufferPool;
use tracing::debug;

use crate::matrix::Matrix;
use crate::memory_budget::MemoryEstimate;
use crate::multiplier::{MatmulError, Multiplier};
use crate::naive::check_shape;
use crate::observer::ProgressObserver;
use crate::options::{Options, ScratchMode};
use crate::progress::{ProgressHook, ProgressUpdate};
use crate::recursive::{is_base_case, roots, Recursion};
use crate::scalar::Scalar;
use crate::schedule::{NoHook, ScheduleHook};
use crate::workspace::Workspace;

/// Check that `n` is a power of two and both operands hold an `n x n` block.
pub fn validate_operands<T: Scalar>(
    a: &Matrix<T>,
    b: &Matrix<T>,
    n: usize,
) -> Result<(), MatmulError> {
    if !n.is_power_of_two() {
        return Err(MatmulError::NotPowerOfTwo(n));
    }
    check_shape("A", a, n)?;
    check_shape("B", b, n)
}

/// [`validate_operands`], plus the destination.
pub fn validate<T: Scalar>(
    c: &Matrix<T>,
    a: &Matrix<T>,
    b: &Matrix<T>,
    n: usize,
) -> Result<(), MatmulError> {
    validate_operands(a, b, n)?;
    check_shape("C", c, n)
}

/// Number of levels that split before the base case takes over.
#[must_use]
pub fn recursion_levels(n: usize, threshold: usize) -> u32 {
    let mut extent = n;
    let mut levels = 0;
    while extent.is_power_of_two() && !is_base_case(extent, threshold) {
        extent /= 2;
        levels += 1;
    }
    levels
}

/// `c := a * b` on the leading `n x n` blocks, with default options.
///
/// # Example
/// ```
/// use strassen_core::matrix::Matrix;
///
/// let a = Matrix::from_rows(&[vec![1.0f32, 2.0], vec![3.0, 4.0]]).unwrap();
/// let b = Matrix::from_rows(&[vec![5.0f32, 6.0], vec![7.0, 8.0]]).unwrap();
/// let mut c = Matrix::zeros(2).unwrap();
/// strassen_core::strassen::multiply(&mut c, &a, &b, 2).unwrap();
/// assert_eq!(c.as_slice(), &[19.0, 22.0, 43.0, 50.0]);
/// ```
pub fn multiply<T: Scalar>(
    c: &mut Matrix<T>,
    a: &Matrix<T>,
    b: &Matrix<T>,
    n: usize,
) -> Result<(), MatmulError> {
    multiply_with(c, a, b, n, &Options::default())
}

/// `c := a * b` with a configurable base-case threshold and a freshly
/// allocated scratch buffer.
pub fn multiply_with<T: Scalar>(
    c: &mut Matrix<T>,
    a: &Matrix<T>,
    b: &Matrix<T>,
    n: usize,
    opts: &Options,
) -> Result<(), MatmulError> {
    multiply_hooked(c, a, b, n, opts, NoHook)
}

/// [`multiply_with`], reporting every scratch write and read to `hook`.
pub fn multiply_hooked<T: Scalar, P: ScheduleHook>(
    c: &mut Matrix<T>,
    a: &Matrix<T>,
    b: &Matrix<T>,
    n: usize,
    opts: &Options,
    hook: P,
) -> Result<(), MatmulError> {
    validate(c, a, b, n)?;
    let threshold = opts.threshold();
    let side = scratch_side(n, threshold);
    let mut scratch = Matrix::zeros(side)?;
    run(c, a, b, n, scratch.as_mut_slice(), threshold, hook);
    Ok(())
}

/// [`multiply_hooked`] with the scratch buffer leased from `pool`.
///
/// The lease goes back to the pool on every exit path. A reused buffer still
/// holds whatever the previous call left in it.
pub fn multiply_pooled<T: Scalar, P: ScheduleHook>(
    pool: &BufferPool<T>,
    c: &mut Matrix<T>,
    a: &Matrix<T>,
    b: &Matrix<T>,
    n: usize,
    opts: &Options,
    hook: P,
) -> Result<(), MatmulError> {
    validate(c, a, b, n)?;
    let threshold = opts.threshold();
    let side = scratch_side(n, threshold);
    let elements = side
        .checked_mul(side)
        .ok_or(MatmulError::Allocation { elements: usize::MAX })?;
    let mut lease = pool
        .lease(elements)
        .map_err(|_| MatmulError::Allocation { elements })?;
    run(c, a, b, n, &mut lease, threshold, hook);
    Ok(())
}

/// Side of the scratch buffer: `n` when the call recurses, 0 otherwise.
fn scratch_side(n: usize, threshold: usize) -> usize {
    if recursion_levels(n, threshold) == 0 {
        0
    } else {
        n
    }
}

fn run<T: Scalar, P: ScheduleHook>(
    c: &mut Matrix<T>,
    a: &Matrix<T>,
    b: &Matrix<T>,
    n: usize,
    scratch: &mut [T],
    threshold: usize,
    hook: P,
) {
    debug!(
        extent = n,
        threshold,
        levels = recursion_levels(n, threshold),
        scratch_bytes = std::mem::size_of_val(scratch),
        "strassen multiply"
    );
    let ws = Workspace::new(a, b, c, scratch, n);
    let mut recursion = Recursion::new(ws, threshold, hook);
    let (c, a, b, m) = roots(n);
    recursion.multiply(c, a, b, m, 0);
}

/// Strassen multiplier with a reusable scratch pool.
pub struct StrassenMultiplier<T> {
    pool: BufferPool<T>,
}

impl<T: Scalar> StrassenMultiplier<T> {
    /// Create a multiplier with a default-sized pool.
    #[must_use]
    pub fn new() -> Self {
        Self::with_pool(BufferPool::default())
    }

    /// Create a multiplier that leases scratch from `pool` in pooled mode.
    #[must_use]
    pub fn with_pool(pool: BufferPool<T>) -> Self {
        Self { pool }
    }

    /// The scratch pool.
    #[must_use]
    pub fn pool(&self) -> &BufferPool<T> {
        &self.pool
    }
}

impl<T: Scalar> Default for StrassenMultiplier<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar> Multiplier<T> for StrassenMultiplier<T> {
    fn multiply(
        &self,
        observer: &dyn ProgressObserver,
        calc_index: usize,
        a: &Matrix<T>,
        b: &Matrix<T>,
        n: usize,
        opts: &Options,
    ) -> Result<Matrix<T>, MatmulError> {
        validate_operands(a, b, n)?;

        if let Some(limit) = opts.memory_limit() {
            let estimate = MemoryEstimate::estimate::<T>(n, opts.threshold());
            if !estimate.fits_in(Some(limit)) {
                return Err(MatmulError::MemoryLimit {
                    required: estimate.total_bytes,
                    limit,
                });
            }
        }

        let mut c = Matrix::zeros(n)?;
        let hook = ProgressHook::new(observer, calc_index, "Strassen");
        match opts.scratch {
            ScratchMode::Fresh => multiply_hooked(&mut c, a, b, n, opts, hook)?,
            ScratchMode::Pooled => multiply_pooled(&self.pool, &mut c, a, b, n, opts, hook)?,
        }
        observer.on_progress(&ProgressUpdate::done(calc_index, "Strassen"));
        Ok(c)
    }

    fn name(&self) -> &'static str {
        "Strassen"
    }
}
