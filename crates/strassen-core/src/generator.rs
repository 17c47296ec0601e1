//! Reproducible random operands.
//!
//! Every generator is seeded, so a failing comparison can be replayed from
//! its seed alone.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::matrix::Matrix;
use crate::multiplier::MatmulError;
use crate::scalar::Scalar;

/// `n x n` matrix with entries drawn uniformly from `[-1, 1)`.
pub fn random_matrix<T: Scalar>(n: usize, seed: u64) -> Result<Matrix<T>, MatmulError> {
    let mut rng = StdRng::seed_from_u64(seed);
    fill(n, || T::from_f64_lossy(rng.gen_range(-1.0..1.0)))
}

/// `n x n` matrix with integer entries in `[-bound, bound]`.
///
/// Products of such matrices are exact in floating point as long as every
/// partial sum stays below the mantissa limit, which makes them suitable for
/// bitwise comparisons.
pub fn random_integer_matrix<T: Scalar>(
    n: usize,
    seed: u64,
    bound: i32,
) -> Result<Matrix<T>, MatmulError> {
    let bound = bound.abs();
    let mut rng = StdRng::seed_from_u64(seed);
    fill(n, || T::from_f64_lossy(f64::from(rng.gen_range(-bound..=bound))))
}

/// A reproducible pair of `n x n` operands derived from one seed.
pub fn operand_pair<T: Scalar>(
    n: usize,
    seed: u64,
) -> Result<(Matrix<T>, Matrix<T>), MatmulError> {
    let a = random_matrix(n, seed)?;
    let b = random_matrix(n, seed.rotate_left(17) ^ 0x9E37_79B9)?;
    Ok((a, b))
}

fn fill<T: Scalar>(n: usize, mut next: impl FnMut() -> T) -> Result<Matrix<T>, MatmulError> {
    let mut m = Matrix::zeros(n)?;
    for cell in m.as_mut_slice() {
        *cell = next();
    }
    Ok(m)
}
