//! Triple-loop multiplication.
//!
//! The block form is the recursion's base case. The whole-matrix form is the
//! reference every other multiplier is compared against.

use crate::block::{Block, Target};
use crate::matrix::Matrix;
use crate::multiplier::{MatmulError, Multiplier};
use crate::observer::ProgressObserver;
use crate::options::Options;
use crate::progress::ProgressUpdate;
use crate::scalar::Scalar;
use crate::strassen::validate_operands;
use crate::workspace::Workspace;

/// `c := a * b` over the common extent. `c` must not overlap `a` or `b`.
pub fn multiply_block<T: Scalar>(ws: &mut Workspace<'_, T>, c: Block<Target>, a: Block, b: Block) {
    let n = c.extent;
    for i in 0..n {
        for j in 0..n {
            let mut acc = T::zero();
            for k in 0..n {
                let x = ws.get(a.buffer, a.row + i, a.col + k);
                let y = ws.get(b.buffer, b.row + k, b.col + j);
                acc = acc + x * y;
            }
            ws.set(c.buffer, c.row + i, c.col + j, acc);
        }
    }
}

/// `c := a * b` on the leading `n x n` blocks, in i-k-j order.
///
/// Accepts any `n`; only the buffer shapes are checked.
pub fn multiply<T: Scalar>(
    c: &mut Matrix<T>,
    a: &Matrix<T>,
    b: &Matrix<T>,
    n: usize,
) -> Result<(), MatmulError> {
    for (buffer, m) in [("A", a), ("B", b), ("C", &*c)] {
        check_shape(buffer, m, n)?;
    }
    let (sa, sb, sc) = (a.stride(), b.stride(), c.stride());
    let (ad, bd) = (a.as_slice(), b.as_slice());
    let cd = c.as_mut_slice();
    for i in 0..n {
        cd[i * sc..i * sc + n].fill(T::zero());
        for k in 0..n {
            let aik = ad[i * sa + k];
            let b_row = &bd[k * sb..k * sb + n];
            for (cij, &bkj) in cd[i * sc..i * sc + n].iter_mut().zip(b_row) {
                *cij = *cij + aik * bkj;
            }
        }
    }
    Ok(())
}

pub(crate) fn check_shape<T: Scalar>(
    buffer: &'static str,
    m: &Matrix<T>,
    n: usize,
) -> Result<(), MatmulError> {
    if m.rows() < n || m.cols() < n {
        return Err(MatmulError::DimensionMismatch {
            buffer,
            rows: m.rows(),
            cols: m.cols(),
            required: n,
        });
    }
    Ok(())
}

/// Reference multiplier using the triple loop.
#[derive(Debug, Default)]
pub struct NaiveMultiplier;

impl NaiveMultiplier {
    /// Create a new naive multiplier.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl<T: Scalar> Multiplier<T> for NaiveMultiplier {
    fn multiply(
        &self,
        observer: &dyn ProgressObserver,
        calc_index: usize,
        a: &Matrix<T>,
        b: &Matrix<T>,
        n: usize,
        _opts: &Options,
    ) -> Result<Matrix<T>, MatmulError> {
        validate_operands(a, b, n)?;
        let mut c = Matrix::zeros(n)?;
        multiply(&mut c, a, b, n)?;
        observer.on_progress(&ProgressUpdate::done(calc_index, "Naive"));
        Ok(c)
    }

    fn name(&self) -> &'static str {
        "Naive"
    }
}
