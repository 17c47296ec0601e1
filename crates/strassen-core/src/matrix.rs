//! Fixed-stride matrix buffer.
//!
//! A `Matrix` is a row-major grid whose stride is its column count. The
//! multiplication routines address square blocks inside it through absolute
//! row and column offsets, so a buffer may be larger than the extent being
//! multiplied.

use crate::multiplier::MatmulError;
use crate::scalar::Scalar;

/// Row-major grid of floating-point values.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T: Scalar> Matrix<T> {
    /// Allocate a zero-filled `rows x cols` buffer.
    ///
    /// Allocation failure is reported instead of aborting the process.
    pub fn allocate(rows: usize, cols: usize) -> Result<Self, MatmulError> {
        let elements = rows
            .checked_mul(cols)
            .ok_or(MatmulError::Allocation { elements: usize::MAX })?;
        let mut data = Vec::new();
        data.try_reserve_exact(elements)
            .map_err(|_| MatmulError::Allocation { elements })?;
        data.resize(elements, T::zero());
        Ok(Self { rows, cols, data })
    }

    /// Allocate a zero-filled square buffer.
    pub fn zeros(n: usize) -> Result<Self, MatmulError> {
        Self::allocate(n, n)
    }

    /// Allocate the `n x n` identity matrix.
    pub fn identity(n: usize) -> Result<Self, MatmulError> {
        let mut m = Self::zeros(n)?;
        for i in 0..n {
            m.set(i, i, T::one());
        }
        Ok(m)
    }

    /// Wrap an existing row-major vector.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Result<Self, MatmulError> {
        if rows.checked_mul(cols) != Some(data.len()) {
            return Err(MatmulError::Config(format!(
                "{} elements cannot form a {rows}x{cols} matrix",
                data.len()
            )));
        }
        Ok(Self { rows, cols, data })
    }

    /// Build a matrix from equally long rows.
    pub fn from_rows(rows: &[Vec<T>]) -> Result<Self, MatmulError> {
        let cols = rows.first().map_or(0, Vec::len);
        if let Some(bad) = rows.iter().position(|r| r.len() != cols) {
            return Err(MatmulError::Config(format!(
                "row {bad} has {} columns, expected {cols}",
                rows[bad].len()
            )));
        }
        let data = rows.iter().flatten().copied().collect();
        Self::from_vec(rows.len(), cols, data)
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Distance in elements between vertically adjacent cells.
    #[inline]
    pub fn stride(&self) -> usize {
        self.cols
    }

    /// Read the cell at `(row, col)`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> T {
        self.data[row * self.cols + col]
    }

    /// Write the cell at `(row, col)`.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: T) {
        self.data[row * self.cols + col] = value;
    }

    /// Backing storage in row-major order.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Mutable backing storage in row-major order.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Copy out row `row` as a vector.
    pub fn row(&self, row: usize) -> Vec<T> {
        self.data[row * self.cols..(row + 1) * self.cols].to_vec()
    }

    /// Largest absolute value in the buffer.
    pub fn max_abs(&self) -> T {
        self.data.iter().fold(T::zero(), |acc, &x| acc.max(x.abs()))
    }

    /// Sum of every cell, useful as a quick fingerprint of a product.
    pub fn checksum(&self) -> T {
        self.data.iter().fold(T::zero(), |acc, &x| acc + x)
    }

    /// Largest absolute elementwise difference.
    ///
    /// Matrices of different shapes are infinitely far apart. A NaN in
    /// either buffer makes the result NaN.
    pub fn max_abs_diff(&self, other: &Self) -> T {
        if self.rows != other.rows || self.cols != other.cols {
            return T::infinity();
        }
        self.data
            .iter()
            .zip(&other.data)
            .fold(T::zero(), |acc, (&x, &y)| {
                let d = (x - y).abs();
                if d.is_nan() || d > acc {
                    d
                } else {
                    acc
                }
            })
    }

    /// Largest absolute difference relative to the largest magnitude in `reference`.
    ///
    /// Falls back to the absolute difference when `reference` is all zeros.
    pub fn relative_error(&self, reference: &Self) -> T {
        let diff = self.max_abs_diff(reference);
        let scale = reference.max_abs();
        if scale > T::zero() {
            diff / scale
        } else {
            diff
        }
    }

    /// Whether `self` matches `reference` within a relative tolerance.
    pub fn approx_eq(&self, reference: &Self, tolerance: f64) -> bool {
        self.relative_error(reference).to_f64_lossy() <= tolerance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_is_zero_filled() {
        let m: Matrix<f32> = Matrix::allocate(3, 5).unwrap();
        assert_eq!(m.rows(), 3);
        assert_eq!(m.cols(), 5);
        assert_eq!(m.stride(), 5);
        assert!(m.as_slice().iter().all(|&x| x == 0.0));
    }

    #[test]
    fn allocate_overflow_is_reported() {
        let err = Matrix::<f32>::allocate(usize::MAX, 2).unwrap_err();
        assert!(matches!(err, MatmulError::Allocation { .. }));
    }

    #[test]
    fn identity_diagonal() {
        let id: Matrix<f64> = Matrix::identity(4).unwrap();
        for i in 0..4 {
            for j in 0..4 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((id.get(i, j) - expected).abs() < f64::EPSILON);
            }
        }
    }

    #[test]
    fn from_rows_layout() {
        let m = Matrix::from_rows(&[vec![1.0f32, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(m.as_slice(), &[1.0, 2.0, 3.0, 4.0]);
        assert!((m.get(1, 0) - 3.0).abs() < f32::EPSILON);
        assert_eq!(m.row(1), vec![3.0, 4.0]);
    }

    #[test]
    fn from_rows_ragged_is_rejected() {
        let err = Matrix::from_rows(&[vec![1.0f32, 2.0], vec![3.0]]).unwrap_err();
        assert!(matches!(err, MatmulError::Config(_)));
    }

    #[test]
    fn from_vec_length_checked() {
        assert!(Matrix::from_vec(2, 2, vec![0.0f32; 3]).is_err());
        assert!(Matrix::from_vec(2, 2, vec![0.0f32; 4]).is_ok());
    }

    #[test]
    fn set_then_get() {
        let mut m: Matrix<f32> = Matrix::zeros(2).unwrap();
        m.set(1, 0, 7.5);
        assert!((m.get(1, 0) - 7.5).abs() < f32::EPSILON);
        assert!((m.checksum() - 7.5).abs() < f32::EPSILON);
    }

    #[test]
    fn diff_and_relative_error() {
        let a = Matrix::from_rows(&[vec![10.0f64, 0.0], vec![0.0, -20.0]]).unwrap();
        let mut b = a.clone();
        b.set(0, 1, 0.2);
        assert!((a.max_abs_diff(&b) - 0.2).abs() < 1e-12);
        assert!((b.relative_error(&a) - 0.01).abs() < 1e-12);
        assert!(b.approx_eq(&a, 0.02));
        assert!(!b.approx_eq(&a, 0.001));
    }

    #[test]
    fn relative_error_against_zero_reference() {
        let zero: Matrix<f32> = Matrix::zeros(2).unwrap();
        let mut other = zero.clone();
        other.set(0, 0, 0.5);
        assert!((other.relative_error(&zero) - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn shape_mismatch_is_infinitely_far() {
        let a: Matrix<f32> = Matrix::zeros(2).unwrap();
        let b: Matrix<f32> = Matrix::allocate(2, 3).unwrap();
        assert!(a.max_abs_diff(&b).is_infinite());
    }

    #[test]
    fn nan_poisons_the_difference() {
        let a: Matrix<f64> = Matrix::identity(2).unwrap();
        let mut b = a.clone();
        b.set(1, 0, f64::NAN);
        assert!(a.max_abs_diff(&b).is_nan());
        assert!(!b.approx_eq(&a, 1.0));
    }
}
