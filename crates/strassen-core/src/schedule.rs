//! Schedule hooks.
//!
//! The recursion reuses the destination and the scratch buffer for many
//! intermediate values, one after another. A hook observes that dataflow:
//! it is told when a producer has finished writing a block and when a
//! consumer is about to read one. The default hook does nothing and
//! compiles away; [`ScheduleChecker`] tracks which value currently lives in
//! every cell of C and M and flags every read of a cell that was clobbered
//! or never written.

use std::fmt;

use serde::Serialize;

use crate::block::{Block, Buffer, Quadrant, Target};

/// An intermediate value of one recursion level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Term {
    /// Sum or difference `S1..=S10` staged as a product operand.
    Sum(u8),
    /// Half-size product `P1..=P7`.
    Product(u8),
    /// A quadrant of the destination part-way through its combination.
    Partial(Quadrant),
    /// A finished quadrant of the destination.
    Result(Quadrant),
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sum(k) => write!(f, "S{k}"),
            Self::Product(k) => write!(f, "P{k}"),
            Self::Partial(q) => write!(f, "C{q}'"),
            Self::Result(q) => write!(f, "C{q}"),
        }
    }
}

/// Observer of the recursion's write/read sequence.
pub trait ScheduleHook {
    /// `term` of recursion level `depth` has been written to `block`.
    fn produced(&mut self, _depth: usize, _term: Term, _block: Block<Target>) {}

    /// `term` of recursion level `depth` is read from `block`.
    ///
    /// Product operands are reported again once the nested multiplication
    /// returns, so a hook can see they survived it.
    fn consumed(&mut self, _depth: usize, _term: Term, _block: Block<Target>) {}
}

impl<P: ScheduleHook + ?Sized> ScheduleHook for &mut P {
    #[inline]
    fn produced(&mut self, depth: usize, term: Term, block: Block<Target>) {
        (**self).produced(depth, term, block);
    }

    #[inline]
    fn consumed(&mut self, depth: usize, term: Term, block: Block<Target>) {
        (**self).consumed(depth, term, block);
    }
}

/// Hook that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHook;

impl ScheduleHook for NoHook {}

/// Which value of which recursion level a cell holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Label {
    /// Recursion depth, 0 at the top-level call.
    pub depth: usize,
    /// The value.
    pub term: Term,
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.term, self.depth)
    }
}

/// A read of a cell that did not hold the value the reader expected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleViolation {
    /// Buffer of the offending cell.
    pub buffer: Buffer,
    /// Absolute row of the offending cell.
    pub row: usize,
    /// Absolute column of the offending cell.
    pub col: usize,
    /// What the reader expected to find.
    pub expected: Label,
    /// What the cell actually held.
    pub found: Option<Label>,
}

impl fmt::Display for ScheduleViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let found = self
            .found
            .map_or_else(|| "nothing".to_string(), |l| l.to_string());
        write!(
            f,
            "{:?}[{}][{}]: expected {}, found {found}",
            self.buffer, self.row, self.col, self.expected
        )
    }
}

/// Hook that checks every read against the last write of each cell.
///
/// Only the first offending cell of each bad read is recorded.
#[derive(Debug, Clone)]
pub struct ScheduleChecker {
    extent: usize,
    c: Vec<Option<Label>>,
    m: Vec<Option<Label>>,
    events: usize,
    violations: Vec<ScheduleViolation>,
}

impl ScheduleChecker {
    /// Checker for a top-level call of extent `n`.
    #[must_use]
    pub fn new(n: usize) -> Self {
        Self {
            extent: n,
            c: vec![None; n * n],
            m: vec![None; n * n],
            events: 0,
            violations: Vec::new(),
        }
    }

    /// Number of hook events seen so far.
    #[must_use]
    pub fn events(&self) -> usize {
        self.events
    }

    /// Violations recorded so far.
    #[must_use]
    pub fn violations(&self) -> &[ScheduleViolation] {
        &self.violations
    }

    /// What cell `(row, col)` of `target` currently holds.
    #[must_use]
    pub fn label(&self, target: Target, row: usize, col: usize) -> Option<Label> {
        self.cells(target)[row * self.extent + col]
    }

    /// Check that the top-level destination ended up fully combined and
    /// return every violation.
    ///
    /// A call that never recursed reports no events and is trivially clean.
    pub fn finish(mut self) -> Result<(), Vec<ScheduleViolation>> {
        if self.events > 0 {
            let n = self.extent;
            for row in 0..n {
                for col in 0..n {
                    let expected = Label {
                        depth: 0,
                        term: Term::Result(Quadrant::containing(row, col, n)),
                    };
                    let found = self.c[row * n + col];
                    if found != Some(expected) {
                        self.violations.push(ScheduleViolation {
                            buffer: Buffer::C,
                            row,
                            col,
                            expected,
                            found,
                        });
                    }
                }
            }
        }
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(self.violations)
        }
    }

    fn cells(&self, target: Target) -> &[Option<Label>] {
        match target {
            Target::C => &self.c,
            Target::M => &self.m,
        }
    }

    fn cells_mut(&mut self, target: Target) -> &mut [Option<Label>] {
        match target {
            Target::C => &mut self.c,
            Target::M => &mut self.m,
        }
    }

    fn in_bounds(&self, block: &Block<Target>) -> bool {
        block.fits(self.extent, self.extent)
    }
}

impl ScheduleHook for ScheduleChecker {
    fn produced(&mut self, depth: usize, term: Term, block: Block<Target>) {
        self.events += 1;
        debug_assert!(self.in_bounds(&block), "block {block:?} outside checker");
        let n = self.extent;
        let cells = self.cells_mut(block.buffer);
        for row in block.row..block.row + block.extent {
            for col in block.col..block.col + block.extent {
                cells[row * n + col] = Some(Label { depth, term });
            }
        }
    }

    fn consumed(&mut self, depth: usize, term: Term, block: Block<Target>) {
        self.events += 1;
        debug_assert!(self.in_bounds(&block), "block {block:?} outside checker");
        let n = self.extent;
        let expected = Label { depth, term };
        let cells = self.cells(block.buffer);
        let bad = (block.row..block.row + block.extent)
            .flat_map(|row| (block.col..block.col + block.extent).map(move |col| (row, col)))
            .find(|&(row, col)| cells[row * n + col] != Some(expected));
        if let Some((row, col)) = bad {
            let found = cells[row * n + col];
            self.violations.push(ScheduleViolation {
                buffer: block.buffer.into(),
                row,
                col,
                expected,
                found,
            });
        }
    }
}

/// One recorded hook event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScheduleEvent {
    /// A write finished.
    Produced(usize, Term),
    /// A read is about to happen.
    Consumed(usize, Term),
}

/// Hook that records the event sequence, optionally for a single depth.
#[derive(Debug, Clone, Default)]
pub struct ScheduleTrace {
    depth: Option<usize>,
    events: Vec<ScheduleEvent>,
}

impl ScheduleTrace {
    /// Record events of every depth.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record only events of recursion level `depth`.
    #[must_use]
    pub fn at_depth(depth: usize) -> Self {
        Self {
            depth: Some(depth),
            events: Vec::new(),
        }
    }

    /// Recorded events in order.
    #[must_use]
    pub fn events(&self) -> &[ScheduleEvent] {
        &self.events
    }

    /// Terms produced, in order.
    #[must_use]
    pub fn produced_terms(&self) -> Vec<Term> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ScheduleEvent::Produced(_, t) => Some(*t),
                ScheduleEvent::Consumed(..) => None,
            })
            .collect()
    }

    fn wants(&self, depth: usize) -> bool {
        self.depth.map_or(true, |d| d == depth)
    }
}

impl ScheduleHook for ScheduleTrace {
    fn produced(&mut self, depth: usize, term: Term, _block: Block<Target>) {
        if self.wants(depth) {
            self.events.push(ScheduleEvent::Produced(depth, term));
        }
    }

    fn consumed(&mut self, depth: usize, term: Term, _block: Block<Target>) {
        if self.wants(depth) {
            self.events.push(ScheduleEvent::Consumed(depth, term));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c22() -> Block<Target> {
        Block::root(Target::C, 4).quadrant(Quadrant::BottomRight)
    }

    #[test]
    fn read_after_write_is_clean() {
        let mut checker = ScheduleChecker::new(4);
        checker.produced(0, Term::Sum(7), c22());
        checker.consumed(0, Term::Sum(7), c22());
        assert!(checker.violations().is_empty());
        assert_eq!(checker.events(), 2);
        assert_eq!(
            checker.label(Target::C, 3, 3),
            Some(Label {
                depth: 0,
                term: Term::Sum(7)
            })
        );
    }

    #[test]
    fn read_after_overwrite_is_flagged() {
        let mut checker = ScheduleChecker::new(4);
        checker.produced(0, Term::Sum(7), c22());
        checker.produced(0, Term::Sum(2), c22());
        checker.consumed(0, Term::Sum(7), c22());

        let v = &checker.violations()[0];
        assert_eq!((v.buffer, v.row, v.col), (Buffer::C, 2, 2));
        assert_eq!(v.found.map(|l| l.term), Some(Term::Sum(2)));
    }

    #[test]
    fn read_before_write_is_flagged() {
        let mut checker = ScheduleChecker::new(4);
        let m11 = Block::root(Target::M, 4).quadrant(Quadrant::TopLeft);
        checker.consumed(0, Term::Product(6), m11);
        assert_eq!(checker.violations().len(), 1);
        assert_eq!(checker.violations()[0].found, None);
    }

    #[test]
    fn depth_is_part_of_the_label() {
        let mut checker = ScheduleChecker::new(4);
        checker.produced(1, Term::Product(1), c22());
        checker.consumed(0, Term::Product(1), c22());
        assert_eq!(checker.violations().len(), 1);
    }

    #[test]
    fn partial_clobber_is_flagged() {
        let mut checker = ScheduleChecker::new(4);
        let root = Block::root(Target::M, 4);
        checker.produced(0, Term::Sum(9), root);
        checker.produced(1, Term::Sum(1), root.quadrant(Quadrant::BottomRight));
        checker.consumed(0, Term::Sum(9), root);
        let v = &checker.violations()[0];
        assert_eq!((v.buffer, v.row, v.col), (Buffer::M, 2, 2));
    }

    #[test]
    fn finish_requires_top_level_results() {
        let mut checker = ScheduleChecker::new(2);
        for q in Quadrant::ALL {
            checker.produced(0, Term::Result(q), Block::root(Target::C, 2).quadrant(q));
        }
        assert!(checker.clone().finish().is_ok());

        let c22 = Block::root(Target::C, 2).quadrant(Quadrant::BottomRight);
        checker.produced(0, Term::Partial(Quadrant::BottomRight), c22);
        let violations = checker.finish().unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!((violations[0].row, violations[0].col), (1, 1));
    }

    #[test]
    fn finish_without_events_is_clean() {
        assert!(ScheduleChecker::new(8).finish().is_ok());
    }

    #[test]
    fn trace_filters_by_depth() {
        let mut trace = ScheduleTrace::at_depth(0);
        trace.produced(0, Term::Sum(7), c22());
        trace.produced(1, Term::Sum(8), c22());
        trace.consumed(0, Term::Sum(7), c22());
        assert_eq!(
            trace.events(),
            &[
                ScheduleEvent::Produced(0, Term::Sum(7)),
                ScheduleEvent::Consumed(0, Term::Sum(7))
            ]
        );
        assert_eq!(trace.produced_terms(), vec![Term::Sum(7)]);
    }

    #[test]
    fn hooks_forward_through_mut_refs() {
        fn emit<P: ScheduleHook>(mut hook: P) {
            hook.produced(3, Term::Product(4), c22());
        }

        let mut trace = ScheduleTrace::new();
        emit(&mut trace);
        emit(&mut trace);
        assert_eq!(trace.events().len(), 2);
    }

    #[test]
    fn term_display() {
        assert_eq!(Term::Sum(10).to_string(), "S10");
        assert_eq!(Term::Product(3).to_string(), "P3");
        assert_eq!(Term::Result(Quadrant::TopRight).to_string(), "C12");
        assert_eq!(Term::Partial(Quadrant::BottomRight).to_string(), "C22'");
    }
}
