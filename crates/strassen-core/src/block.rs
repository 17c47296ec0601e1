//! Block addressing.
//!
//! A block is an `extent x extent` square inside one of the four buffers of a
//! multiplication, located by absolute row and column offsets into that
//! buffer's fixed stride. Halving a block never changes which buffer it lives
//! in or how that buffer is strided; only the offsets and the extent move.

use std::fmt;

use serde::Serialize;

/// The four buffers taking part in one top-level multiplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Buffer {
    /// Left operand (read-only).
    A,
    /// Right operand (read-only).
    B,
    /// Destination, also used as scratch.
    C,
    /// Auxiliary scratch.
    M,
}

/// The buffers that may be written: the destination and the scratch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Target {
    /// Destination.
    C,
    /// Auxiliary scratch.
    M,
}

impl From<Target> for Buffer {
    fn from(target: Target) -> Self {
        match target {
            Target::C => Buffer::C,
            Target::M => Buffer::M,
        }
    }
}

/// One of the four half-size sub-blocks of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Quadrant {
    /// (1,1)
    TopLeft,
    /// (1,2)
    TopRight,
    /// (2,1)
    BottomLeft,
    /// (2,2)
    BottomRight,
}

impl Quadrant {
    /// All quadrants in row-major order.
    pub const ALL: [Quadrant; 4] = [
        Quadrant::TopLeft,
        Quadrant::TopRight,
        Quadrant::BottomLeft,
        Quadrant::BottomRight,
    ];

    /// 0 for the top half, 1 for the bottom half.
    #[inline]
    pub const fn row_half(self) -> usize {
        match self {
            Quadrant::TopLeft | Quadrant::TopRight => 0,
            Quadrant::BottomLeft | Quadrant::BottomRight => 1,
        }
    }

    /// 0 for the left half, 1 for the right half.
    #[inline]
    pub const fn col_half(self) -> usize {
        match self {
            Quadrant::TopLeft | Quadrant::BottomLeft => 0,
            Quadrant::TopRight | Quadrant::BottomRight => 1,
        }
    }

    /// Quadrant containing local cell `(i, j)` of a block of extent `n`.
    #[inline]
    pub const fn containing(i: usize, j: usize, n: usize) -> Quadrant {
        let half = n / 2;
        match (i >= half, j >= half) {
            (false, false) => Quadrant::TopLeft,
            (false, true) => Quadrant::TopRight,
            (true, false) => Quadrant::BottomLeft,
            (true, true) => Quadrant::BottomRight,
        }
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.row_half() + 1, self.col_half() + 1)
    }
}

/// Square region of a buffer: `(buffer, row_offset, col_offset, extent)`.
///
/// `K` is [`Buffer`] for blocks that are only read and [`Target`] for blocks
/// that may be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Block<K = Buffer> {
    /// Buffer the block lives in.
    pub buffer: K,
    /// Absolute row offset into the buffer.
    pub row: usize,
    /// Absolute column offset into the buffer.
    pub col: usize,
    /// Side length.
    pub extent: usize,
}

impl<K: Copy> Block<K> {
    /// The leading `extent x extent` block of `buffer`.
    #[inline]
    pub const fn root(buffer: K, extent: usize) -> Self {
        Self {
            buffer,
            row: 0,
            col: 0,
            extent,
        }
    }

    /// Half-size child selected by `row_half` and `col_half` (each 0 or 1).
    #[inline]
    pub fn child(self, row_half: usize, col_half: usize) -> Self {
        debug_assert!(row_half < 2 && col_half < 2, "half index out of range");
        debug_assert!(self.extent % 2 == 0, "cannot halve extent {}", self.extent);
        let extent = self.extent / 2;
        Self {
            buffer: self.buffer,
            row: self.row + row_half * extent,
            col: self.col + col_half * extent,
            extent,
        }
    }

    /// Half-size child in quadrant `q`.
    #[inline]
    pub fn quadrant(self, q: Quadrant) -> Self {
        self.child(q.row_half(), q.col_half())
    }

    /// All four children as `[(1,1), (1,2), (2,1), (2,2)]`.
    #[inline]
    pub fn quadrants(self) -> [Self; 4] {
        Quadrant::ALL.map(|q| self.quadrant(q))
    }

    /// Whether the block lies inside a `rows x cols` buffer.
    #[inline]
    pub fn fits(&self, rows: usize, cols: usize) -> bool {
        self.row + self.extent <= rows && self.col + self.extent <= cols
    }

    /// Whether two blocks of the same buffer share at least one cell.
    pub fn overlaps(&self, other: &Self) -> bool
    where
        K: PartialEq,
    {
        self.buffer == other.buffer
            && self.row < other.row + other.extent
            && other.row < self.row + self.extent
            && self.col < other.col + other.extent
            && other.col < self.col + self.extent
    }
}

impl Block<Target> {
    /// The same region viewed as a read operand.
    #[inline]
    pub fn source(self) -> Block<Buffer> {
        Block {
            buffer: self.buffer.into(),
            row: self.row,
            col: self.col,
            extent: self.extent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_offsets_are_absolute() {
        let root = Block::root(Buffer::A, 8);
        let br = root.quadrant(Quadrant::BottomRight);
        assert_eq!((br.row, br.col, br.extent), (4, 4, 4));

        let inner = br.quadrant(Quadrant::TopRight);
        assert_eq!((inner.row, inner.col, inner.extent), (4, 6, 2));
    }

    #[test]
    fn child_matches_quadrant() {
        let b = Block::root(Target::M, 16).quadrant(Quadrant::BottomLeft);
        for q in Quadrant::ALL {
            assert_eq!(b.quadrant(q), b.child(q.row_half(), q.col_half()));
        }
    }

    #[test]
    fn quadrants_order() {
        let [q11, q12, q21, q22] = Block::root(Buffer::B, 4).quadrants();
        assert_eq!((q11.row, q11.col), (0, 0));
        assert_eq!((q12.row, q12.col), (0, 2));
        assert_eq!((q21.row, q21.col), (2, 0));
        assert_eq!((q22.row, q22.col), (2, 2));
    }

    #[test]
    fn scratch_descent_stays_in_bounds() {
        let n = 256;
        let mut m = Block::root(Target::M, n);
        while m.extent > 1 {
            m = m.quadrant(Quadrant::BottomRight);
            assert!(m.fits(n, n));
        }
        assert_eq!((m.row, m.col), (n - 1, n - 1));
    }

    #[test]
    fn fits_checks_both_axes() {
        let b = Block {
            buffer: Buffer::A,
            row: 4,
            col: 0,
            extent: 4,
        };
        assert!(b.fits(8, 4));
        assert!(!b.fits(7, 4));
        assert!(!b.fits(8, 3));
    }

    #[test]
    fn quadrants_do_not_overlap() {
        let qs = Block::root(Target::C, 8).quadrants();
        for (i, a) in qs.iter().enumerate() {
            for b in &qs[i + 1..] {
                assert!(!a.overlaps(b));
            }
            assert!(a.overlaps(a));
        }
    }

    #[test]
    fn target_source_keeps_region() {
        let t = Block::root(Target::M, 8).quadrant(Quadrant::TopRight);
        let s = t.source();
        assert_eq!(s.buffer, Buffer::M);
        assert_eq!((s.row, s.col, s.extent), (t.row, t.col, t.extent));
    }

    #[test]
    fn containing_quadrant() {
        assert_eq!(Quadrant::containing(0, 0, 4), Quadrant::TopLeft);
        assert_eq!(Quadrant::containing(1, 3, 4), Quadrant::TopRight);
        assert_eq!(Quadrant::containing(2, 1, 4), Quadrant::BottomLeft);
        assert_eq!(Quadrant::containing(3, 2, 4), Quadrant::BottomRight);
    }

    #[test]
    fn quadrant_display() {
        assert_eq!(Quadrant::TopRight.to_string(), "12");
        assert_eq!(Quadrant::BottomLeft.to_string(), "21");
    }
}
