//! Trace path tracing — depth-first walk over etched connections.
//!
//! Tracing from any point of an etched trace yields the full electrically
//! connected point set as one [`Net`]. The graph builder attaches drivers
//! and detects conflicts; the tracer itself is read-only over the board.

use std::collections::HashSet;

use crate::board::{Board, Dir};

/// The output pin feeding a net: the driving part (by build index) and the
/// state-array slot its output writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetDriver {
    pub part: usize,
    pub slot: usize,
}

/// A maximal set of electrically joined board points.
///
/// Points are stored in discovery order, each exactly once. A usable net
/// has exactly one driver; a conflicted net (short circuit) carries two or
/// more and is excluded from input wiring.
#[derive(Debug, Clone, Default)]
pub struct Net {
    points: Vec<(i32, i32)>,
    index: HashSet<(i32, i32)>,
    drivers: Vec<NetDriver>,
}

impl Net {
    /// Points in discovery order.
    pub fn points(&self) -> &[(i32, i32)] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First discovered point (the trace origin).
    pub fn start(&self) -> Option<(i32, i32)> {
        self.points.first().copied()
    }

    /// Last discovered point.
    pub fn end(&self) -> Option<(i32, i32)> {
        self.points.last().copied()
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.index.contains(&(x, y))
    }

    /// True when the two nets share at least one point.
    pub fn overlaps(&self, other: &Net) -> bool {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        small.points.iter().any(|&(x, y)| large.contains(x, y))
    }

    /// Every driver recorded on this net, in discovery order.
    pub fn drivers(&self) -> &[NetDriver] {
        &self.drivers
    }

    /// The single driver of a usable net. `None` when undriven or conflicted.
    pub fn driver(&self) -> Option<NetDriver> {
        match self.drivers.as_slice() {
            [d] => Some(*d),
            _ => None,
        }
    }

    /// More than one output feeds this net.
    pub fn is_conflicted(&self) -> bool {
        self.drivers.len() > 1
    }

    pub(crate) fn add_driver(&mut self, driver: NetDriver) {
        self.drivers.push(driver);
    }

    fn insert(&mut self, x: i32, y: i32) -> bool {
        if self.index.insert((x, y)) {
            self.points.push((x, y));
            true
        } else {
            false
        }
    }
}

/// Collect every point transitively reachable from `(x, y)` over etched
/// connections into one net, in discovery order.
///
/// The start point is always part of the net, so a point with no etched
/// directions yields a single-point net (an unconnected pin pad). A trace
/// bit whose neighbor is off the board is a topology bug upstream and is
/// treated as no connection. An off-board start yields an empty net.
pub fn trace_path(board: &Board, x: i32, y: i32) -> Net {
    let mut net = Net::default();
    if !board.contains(x, y) {
        return net;
    }
    let mut pending = vec![(x, y)];
    while let Some((cx, cy)) = pending.pop() {
        if !net.insert(cx, cy) {
            continue;
        }
        let point = match board.point(cx, cy) {
            Some(p) => *p,
            None => continue,
        };
        for dir in Dir::ALL {
            if !point.has_trace(dir) {
                continue;
            }
            if let Some((nx, ny)) = board.neighbor(cx, cy, dir) {
                if !net.contains(nx, ny) {
                    pending.push((nx, ny));
                }
            }
        }
    }
    net
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_point_yields_single_point_net() {
        let board = Board::new(4, 4);
        let net = trace_path(&board, 2, 2);
        assert_eq!(net.points(), &[(2, 2)]);
        assert_eq!(net.start(), Some((2, 2)));
        assert_eq!(net.end(), Some((2, 2)));
    }

    #[test]
    fn test_off_board_start_yields_empty_net() {
        let board = Board::new(4, 4);
        assert!(trace_path(&board, -1, 0).is_empty());
    }

    #[test]
    fn test_straight_line_collects_every_point_once() {
        let mut board = Board::new(6, 6);
        board.etch_run(0, 3, &[Dir::East, Dir::East, Dir::East]).unwrap();
        // Trace from the middle — full net either way
        let net = trace_path(&board, 2, 3);
        assert_eq!(net.len(), 4);
        for x in 0..4 {
            assert!(net.contains(x, 3));
        }
    }

    #[test]
    fn test_branching_trace_is_one_net() {
        let mut board = Board::new(6, 6);
        board.etch_run(1, 1, &[Dir::East, Dir::East]).unwrap();
        board.etch(2, 1, Dir::South).unwrap();
        board.etch(2, 2, Dir::South).unwrap();
        let net = trace_path(&board, 1, 1);
        assert_eq!(net.len(), 6);
        assert!(net.contains(2, 3));
        assert!(net.contains(3, 1));
    }

    #[test]
    fn test_loop_terminates() {
        let mut board = Board::new(4, 4);
        board
            .etch_run(0, 0, &[Dir::East, Dir::South, Dir::West, Dir::North])
            .unwrap();
        let net = trace_path(&board, 0, 0);
        assert_eq!(net.len(), 4);
    }

    #[test]
    fn test_stray_unmirrored_bit_is_tolerated() {
        let mut board = Board::new(3, 3);
        // A bit pointing off the board, never producible via etch()
        board.point_mut(0, 0).unwrap().traces |= Dir::West.bit();
        let net = trace_path(&board, 0, 0);
        assert_eq!(net.points(), &[(0, 0)]);
    }

    #[test]
    fn test_overlaps() {
        let mut board = Board::new(6, 6);
        board.etch_run(0, 0, &[Dir::East, Dir::East]).unwrap();
        board.etch_run(0, 5, &[Dir::East]).unwrap();
        let a = trace_path(&board, 0, 0);
        let b = trace_path(&board, 2, 0);
        let c = trace_path(&board, 0, 5);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_driver_bookkeeping() {
        let mut net = Net::default();
        assert_eq!(net.driver(), None);
        net.add_driver(NetDriver { part: 0, slot: 1 });
        assert_eq!(net.driver(), Some(NetDriver { part: 0, slot: 1 }));
        assert!(!net.is_conflicted());
        net.add_driver(NetDriver { part: 2, slot: 4 });
        assert_eq!(net.driver(), None);
        assert!(net.is_conflicted());
        assert_eq!(net.drivers().len(), 2);
    }
}
