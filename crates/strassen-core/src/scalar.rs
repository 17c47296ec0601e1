//! Element type accepted by every multiplication routine.

use std::fmt::{Debug, Display};

use num_traits::Float;

/// Floating-point element of a matrix buffer.
///
/// Implemented for `f32` and `f64`. Overflow and NaN follow IEEE 754 and
/// propagate through sums and products like any other arithmetic.
pub trait Scalar: Float + Default + Debug + Display + Send + Sync + 'static {
    /// Convert from `f64`, saturating to infinity on overflow.
    fn from_f64_lossy(value: f64) -> Self;

    /// Widen to `f64` for error reporting.
    fn to_f64_lossy(self) -> f64;
}

impl Scalar for f32 {
    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    fn from_f64_lossy(value: f64) -> Self {
        value as f32
    }

    #[inline]
    fn to_f64_lossy(self) -> f64 {
        f64::from(self)
    }
}

impl Scalar for f64 {
    #[inline]
    fn from_f64_lossy(value: f64) -> Self {
        value
    }

    #[inline]
    fn to_f64_lossy(self) -> f64 {
        self
    }
}
