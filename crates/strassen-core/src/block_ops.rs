//! Elementwise block sum and difference.
//!
//! Both operations read the two operand cells before writing the destination
//! cell, so `dst` may be the very same block as either operand (or both).

use crate::block::{Block, Target};
use crate::scalar::Scalar;
use crate::workspace::Workspace;

/// `dst := lhs + rhs` over the common extent.
#[inline]
pub fn add<T: Scalar>(ws: &mut Workspace<'_, T>, dst: Block<Target>, lhs: Block, rhs: Block) {
    combine(ws, dst, lhs, rhs, |x, y| x + y);
}

/// `dst := lhs - rhs` over the common extent.
#[inline]
pub fn sub<T: Scalar>(ws: &mut Workspace<'_, T>, dst: Block<Target>, lhs: Block, rhs: Block) {
    combine(ws, dst, lhs, rhs, |x, y| x - y);
}

fn combine<T: Scalar>(
    ws: &mut Workspace<'_, T>,
    dst: Block<Target>,
    lhs: Block,
    rhs: Block,
    op: impl Fn(T, T) -> T,
) {
    debug_assert_eq!(dst.extent, lhs.extent);
    debug_assert_eq!(dst.extent, rhs.extent);
    let n = dst.extent;
    for i in 0..n {
        for j in 0..n {
            let x = ws.get(lhs.buffer, lhs.row + i, lhs.col + j);
            let y = ws.get(rhs.buffer, rhs.row + i, rhs.col + j);
            ws.set(dst.buffer, dst.row + i, dst.col + j, op(x, y));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Buffer;
    use crate::matrix::Matrix;

    fn fixtures() -> (Matrix<f64>, Matrix<f64>, Matrix<f64>, Vec<f64>) {
        let a = Matrix::from_rows(&[
            vec![1.0, 2.0, 3.0, 4.0],
            vec![5.0, 6.0, 7.0, 8.0],
            vec![9.0, 10.0, 11.0, 12.0],
            vec![13.0, 14.0, 15.0, 16.0],
        ])
        .unwrap();
        let b = Matrix::identity(4).unwrap();
        let c = Matrix::zeros(4).unwrap();
        (a, b, c, vec![0.0; 16])
    }

    #[test]
    fn add_uses_each_blocks_offsets() {
        let (a, b, mut c, mut m) = fixtures();
        {
            let mut ws = Workspace::new(&a, &b, &mut c, &mut m, 4);
            let [a11, _, _, a22] = Block::root(Buffer::A, 4).quadrants();
            let c12 = Block::root(Target::C, 4).child(0, 1);
            add(&mut ws, c12, a11, a22);
        }
        assert_eq!(c.row(0), vec![0.0, 0.0, 12.0, 14.0]);
        assert_eq!(c.row(1), vec![0.0, 0.0, 20.0, 22.0]);
        assert_eq!(c.row(2), vec![0.0; 4]);
    }

    #[test]
    fn sub_is_lhs_minus_rhs() {
        let (a, b, mut c, mut m) = fixtures();
        {
            let mut ws = Workspace::new(&a, &b, &mut c, &mut m, 4);
            let [a11, a12, _, _] = Block::root(Buffer::A, 4).quadrants();
            let m21 = Block::root(Target::M, 4).child(1, 0);
            sub(&mut ws, m21, a12, a11);
        }
        assert_eq!(&m[8..10], &[2.0, 2.0]);
        assert_eq!(&m[12..14], &[2.0, 2.0]);
    }

    #[test]
    fn dst_may_alias_one_operand() {
        let (a, b, mut c, mut m) = fixtures();
        {
            let mut ws = Workspace::new(&a, &b, &mut c, &mut m, 4);
            let a_root = Block::root(Buffer::A, 4);
            let c_root = Block::root(Target::C, 4);

            add(&mut ws, c_root, a_root, a_root);
            sub(&mut ws, c_root, c_root.source(), a_root);
        }
        assert_eq!(c, a);
    }

    #[test]
    fn dst_may_alias_both_operands() {
        let (a, b, mut c, mut m) = fixtures();
        {
            let mut ws = Workspace::new(&a, &b, &mut c, &mut m, 4);
            let a22 = Block::root(Buffer::A, 4).child(1, 1);
            let c22 = Block::root(Target::C, 4).child(1, 1);

            add(&mut ws, c22, a22, a22);
            add(&mut ws, c22, c22.source(), c22.source());
        }
        assert_eq!(c.row(2), vec![0.0, 0.0, 44.0, 48.0]);
        assert_eq!(c.row(3), vec![0.0, 0.0, 60.0, 64.0]);
    }

    #[test]
    fn single_cell_blocks() {
        let (a, b, mut c, mut m) = fixtures();
        {
            let mut ws = Workspace::new(&a, &b, &mut c, &mut m, 4);
            let one = Block {
                buffer: Buffer::A,
                row: 3,
                col: 3,
                extent: 1,
            };
            let dst = Block {
                buffer: Target::M,
                row: 0,
                col: 0,
                extent: 1,
            };
            sub(&mut ws, dst, one, Block::root(Buffer::B, 1));
        }
        assert!((m[0] - 15.0).abs() < f64::EPSILON);
    }
}
