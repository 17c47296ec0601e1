//! Reduced-memory Strassen recursion.
//!
//! A level of extent `n` keeps every intermediate it needs inside two
//! buffers: the three non-(1,1) quadrants of its own destination C, and the
//! (1,1), (1,2) and (2,1) quadrants of its scratch M. The (2,2) quadrant of M
//! is handed, whole, to every nested call as that call's scratch, so the
//! total scratch for the entire recursion is one `n x n` buffer.
//!
//! Because C and M are overwritten many times per level, the order of the
//! steps in [`Recursion::multiply`] is load-bearing: each slot is written by a
//! producer, read by all its consumers, and only then reused. Every write and
//! read is reported to a [`ScheduleHook`], which is how the tests verify
//! that order.

use crate::block::{Block, Buffer, Quadrant, Target};
use crate::block_ops;
use crate::naive;
use crate::scalar::Scalar;
use crate::schedule::{ScheduleHook, Term};
use crate::workspace::Workspace;

/// An operand of a sum or product: an input quadrant, or a value staged in
/// C or M earlier at the same level.
#[derive(Debug, Clone, Copy)]
enum Operand {
    Input(Block),
    Staged(Block<Target>, Term),
}

impl Operand {
    fn block(self) -> Block {
        match self {
            Self::Input(block) => block,
            Self::Staged(block, _) => block.source(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Op {
    Add,
    Sub,
}

/// Whether a block of extent `n` is multiplied naively.
#[inline]
#[must_use]
pub fn is_base_case(n: usize, threshold: usize) -> bool {
    n <= 1 || n < threshold
}

/// One top-level multiplication in progress.
pub struct Recursion<'a, T, P> {
    ws: Workspace<'a, T>,
    threshold: usize,
    hook: P,
}

impl<'a, T: Scalar, P: ScheduleHook> Recursion<'a, T, P> {
    /// Recurse while the extent is at least `threshold`.
    pub fn new(ws: Workspace<'a, T>, threshold: usize, hook: P) -> Self {
        Self {
            ws,
            threshold,
            hook,
        }
    }

    /// `c := a * b`, using `c` and `m` as scratch. All four blocks share one
    /// extent, which must be a power of two.
    pub fn multiply(
        &mut self,
        c: Block<Target>,
        a: Block,
        b: Block,
        m: Block<Target>,
        depth: usize,
    ) {
        if is_base_case(c.extent, self.threshold) {
            naive::multiply_block(&mut self.ws, c, a, b);
            return;
        }

        let [a11, a12, a21, a22] = a.quadrants().map(Operand::Input);
        let [b11, b12, b21, b22] = b.quadrants().map(Operand::Input);
        let [c11, c12, c21, c22] = c.quadrants();
        let [m11, m12, m21, m22] = m.quadrants();

        // P6 = (A12 - A22)(B21 + B22)
        let s7 = self.combine(depth, Op::Sub, c22, Term::Sum(7), a12, a22);
        let s8 = self.combine(depth, Op::Add, c12, Term::Sum(8), b21, b22);
        let p6 = self.product(depth, 6, m11, s7, s8, m22);

        // P2 = (A11 + A12) B22
        let s2 = self.combine(depth, Op::Add, c22, Term::Sum(2), a11, a12);
        let p2 = self.product(depth, 2, c12, s2, b22, m22);

        // P5 = (A11 + A22)(B11 + B22)
        let s5 = self.combine(depth, Op::Add, c22, Term::Sum(5), a11, a22);
        let s6 = self.combine(depth, Op::Add, c21, Term::Sum(6), b11, b22);
        let p5 = self.product(depth, 5, m12, s5, s6, m22);

        // P4 = A22 (B21 - B11)
        let s4 = self.combine(depth, Op::Sub, c22, Term::Sum(4), b21, b11);
        let p4 = self.product(depth, 4, m21, a22, s4, m22);

        // C11 = P5 + P4 - P2 + P6
        let partial = Term::Partial(Quadrant::TopLeft);
        let c11_acc = self.combine(depth, Op::Add, c11, partial, p5, p4);
        let c11_acc = self.combine(depth, Op::Sub, c11, partial, c11_acc, p2);
        self.combine(depth, Op::Add, c11, Term::Result(Quadrant::TopLeft), c11_acc, p6);

        // P1 = A11 (B12 - B22), then C12 = P1 + P2
        let s1 = self.combine(depth, Op::Sub, c21, Term::Sum(1), b12, b22);
        let p1 = self.product(depth, 1, c22, a11, s1, m22);
        self.combine(depth, Op::Add, c12, Term::Result(Quadrant::TopRight), p1, p2);

        // P3 = (A21 + A22) B11, then C21 = P3 + P4
        let s3 = self.combine(depth, Op::Add, c21, Term::Sum(3), a21, a22);
        let p3 = self.product(depth, 3, m11, s3, b11, m22);
        self.combine(depth, Op::Add, c21, Term::Result(Quadrant::BottomLeft), p3, p4);

        // C22 = P1 + P5 - P3, read before P7 reuses M11 and M12
        let partial = Term::Partial(Quadrant::BottomRight);
        let c22_acc = self.combine(depth, Op::Add, c22, partial, p1, p5);
        let c22_acc = self.combine(depth, Op::Sub, c22, partial, c22_acc, p3);

        // P7 = (A11 - A21)(B11 + B12)
        let s9 = self.combine(depth, Op::Sub, m11, Term::Sum(9), a11, a21);
        let s10 = self.combine(depth, Op::Add, m12, Term::Sum(10), b11, b12);
        let p7 = self.product(depth, 7, m21, s9, s10, m22);

        // C22 -= P7
        let result = Term::Result(Quadrant::BottomRight);
        self.combine(depth, Op::Sub, c22, result, c22_acc, p7);
    }

    /// `dst := lhs op rhs`, returning `dst` as a staged operand.
    fn combine(
        &mut self,
        depth: usize,
        op: Op,
        dst: Block<Target>,
        term: Term,
        lhs: Operand,
        rhs: Operand,
    ) -> Operand {
        self.consume(depth, lhs);
        self.consume(depth, rhs);
        match op {
            Op::Add => block_ops::add(&mut self.ws, dst, lhs.block(), rhs.block()),
            Op::Sub => block_ops::sub(&mut self.ws, dst, lhs.block(), rhs.block()),
        }
        self.hook.produced(depth, term, dst);
        Operand::Staged(dst, term)
    }

    /// `dst := lhs * rhs` one level down, with `scratch` as the nested M.
    fn product(
        &mut self,
        depth: usize,
        k: u8,
        dst: Block<Target>,
        lhs: Operand,
        rhs: Operand,
        scratch: Block<Target>,
    ) -> Operand {
        self.consume(depth, lhs);
        self.consume(depth, rhs);
        self.multiply(dst, lhs.block(), rhs.block(), scratch, depth + 1);
        self.consume(depth, lhs);
        self.consume(depth, rhs);
        let term = Term::Product(k);
        self.hook.produced(depth, term, dst);
        Operand::Staged(dst, term)
    }

    fn consume(&mut self, depth: usize, operand: Operand) {
        if let Operand::Staged(block, term) = operand {
            self.hook.consumed(depth, term, block);
        }
    }
}

/// Root blocks of a top-level call of extent `n`.
pub(crate) fn roots(n: usize) -> (Block<Target>, Block, Block, Block<Target>) {
    (
        Block::root(Target::C, n),
        Block::root(Buffer::A, n),
        Block::root(Buffer::B, n),
        Block::root(Target::M, n),
    )
}
