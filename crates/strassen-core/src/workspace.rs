//! The four buffers of one multiplication, addressed by block.

use crate::block::{Buffer, Target};
use crate::matrix::Matrix;
use crate::scalar::Scalar;

#[derive(Debug)]
struct View<'a, T> {
    data: &'a [T],
    stride: usize,
}

#[derive(Debug)]
struct ViewMut<'a, T> {
    data: &'a mut [T],
    stride: usize,
}

/// Operands, destination and scratch of a single top-level call.
///
/// A and B are borrowed shared and never written; C and M are borrowed
/// exclusively for the whole recursion. Each keeps its own fixed stride, so
/// cell `(row, col)` of a buffer always lives at `row * stride + col` no
/// matter how deep the recursion is.
#[derive(Debug)]
pub struct Workspace<'a, T> {
    a: View<'a, T>,
    b: View<'a, T>,
    c: ViewMut<'a, T>,
    m: ViewMut<'a, T>,
}

impl<'a, T: Scalar> Workspace<'a, T> {
    /// Bind the four buffers. `scratch` is read as a grid with `scratch_stride` columns.
    pub fn new(
        a: &'a Matrix<T>,
        b: &'a Matrix<T>,
        c: &'a mut Matrix<T>,
        scratch: &'a mut [T],
        scratch_stride: usize,
    ) -> Self {
        let c_stride = c.stride();
        Self {
            a: View {
                data: a.as_slice(),
                stride: a.stride(),
            },
            b: View {
                data: b.as_slice(),
                stride: b.stride(),
            },
            c: ViewMut {
                data: c.as_mut_slice(),
                stride: c_stride,
            },
            m: ViewMut {
                data: scratch,
                stride: scratch_stride,
            },
        }
    }

    /// Read cell `(row, col)` of `buffer`.
    #[inline]
    pub fn get(&self, buffer: Buffer, row: usize, col: usize) -> T {
        match buffer {
            Buffer::A => self.a.data[row * self.a.stride + col],
            Buffer::B => self.b.data[row * self.b.stride + col],
            Buffer::C => self.c.data[row * self.c.stride + col],
            Buffer::M => self.m.data[row * self.m.stride + col],
        }
    }

    /// Write cell `(row, col)` of a writable buffer.
    #[inline]
    pub fn set(&mut self, target: Target, row: usize, col: usize, value: T) {
        let view = match target {
            Target::C => &mut self.c,
            Target::M => &mut self.m,
        };
        view.data[row * view.stride + col] = value;
    }
}
