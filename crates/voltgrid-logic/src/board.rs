//! Board topology — a grid of solder points joined by etched copper traces.
//!
//! Pure data structure with adjacency queries and mirrored etch/erase
//! mutation. The editor mutates it between ticks; the signal graph only
//! reads it.

use serde::{Deserialize, Serialize};

/// One of the eight compass directions a trace can leave a point in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum Dir {
    North = 0,
    NorthEast = 1,
    East = 2,
    SouthEast = 3,
    South = 4,
    SouthWest = 5,
    West = 6,
    NorthWest = 7,
}

impl Dir {
    /// All directions, in bitmask bit order.
    pub const ALL: [Dir; 8] = [
        Dir::North,
        Dir::NorthEast,
        Dir::East,
        Dir::SouthEast,
        Dir::South,
        Dir::SouthWest,
        Dir::West,
        Dir::NorthWest,
    ];

    /// This direction's bit in a point's trace mask.
    pub fn bit(self) -> u8 {
        1 << self as u8
    }

    /// The mirrored direction — the one the neighbor uses to point back.
    pub fn opposite(self) -> Dir {
        Self::ALL[(self as usize + 4) % 8]
    }

    /// Grid offset of the neighboring point in this direction.
    /// North is negative y.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Dir::North => (0, -1),
            Dir::NorthEast => (1, -1),
            Dir::East => (1, 0),
            Dir::SouthEast => (1, 1),
            Dir::South => (0, 1),
            Dir::SouthWest => (-1, 1),
            Dir::West => (-1, 0),
            Dir::NorthWest => (-1, -1),
        }
    }
}

/// One grid cell of the board.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Point {
    /// Bitmask over [`Dir`] of etched traces leaving this point. A set bit
    /// toward `d` is always mirrored at the neighbor via `d.opposite()`.
    pub traces: u8,
    /// Opaque id of the fixture covering this point, if any. Not owned —
    /// the session keeps the authoritative part list.
    pub fixture: Option<u64>,
}

impl Point {
    pub fn has_trace(&self, dir: Dir) -> bool {
        self.traces & dir.bit() != 0
    }

    /// True when nothing is etched here and no fixture covers it.
    pub fn is_bare(&self) -> bool {
        self.traces == 0 && self.fixture.is_none()
    }
}

/// Error from an etch or erase operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EtchError {
    /// The coordinate is not on the board.
    OutOfBounds { x: i32, y: i32 },
}

impl std::fmt::Display for EtchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EtchError::OutOfBounds { x, y } => {
                write!(f, "point ({}, {}) is outside the board", x, y)
            }
        }
    }
}

impl std::error::Error for EtchError {}

/// A rectangular PCB: `width × height` solder points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    width: u32,
    height: u32,
    points: Vec<Point>,
}

impl Board {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            points: vec![Point::default(); (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if self.contains(x, y) {
            Some((y as u32 * self.width + x as u32) as usize)
        } else {
            None
        }
    }

    pub fn point(&self, x: i32, y: i32) -> Option<&Point> {
        self.index(x, y).map(|i| &self.points[i])
    }

    pub(crate) fn point_mut(&mut self, x: i32, y: i32) -> Option<&mut Point> {
        self.index(x, y).map(move |i| &mut self.points[i])
    }

    /// Coordinate of the neighbor in `dir`, if it is on the board.
    pub fn neighbor(&self, x: i32, y: i32, dir: Dir) -> Option<(i32, i32)> {
        let (dx, dy) = dir.offset();
        let (nx, ny) = (x + dx, y + dy);
        if self.contains(nx, ny) {
            Some((nx, ny))
        } else {
            None
        }
    }

    /// Etch a trace from `(x, y)` toward `dir`, setting the mirrored bit on
    /// the neighbor. Fails without modifying anything when either endpoint
    /// is off the board.
    pub fn etch(&mut self, x: i32, y: i32, dir: Dir) -> Result<(), EtchError> {
        let (nx, ny) = self.segment(x, y, dir)?;
        if let Some(p) = self.point_mut(x, y) {
            p.traces |= dir.bit();
        }
        if let Some(p) = self.point_mut(nx, ny) {
            p.traces |= dir.opposite().bit();
        }
        Ok(())
    }

    /// Erase the trace from `(x, y)` toward `dir` on both endpoints.
    pub fn erase(&mut self, x: i32, y: i32, dir: Dir) -> Result<(), EtchError> {
        let (nx, ny) = self.segment(x, y, dir)?;
        if let Some(p) = self.point_mut(x, y) {
            p.traces &= !dir.bit();
        }
        if let Some(p) = self.point_mut(nx, ny) {
            p.traces &= !dir.opposite().bit();
        }
        Ok(())
    }

    /// Etch a connected run starting at `(x, y)`, following each direction
    /// in turn. Returns the final coordinate. Stops at the first failure,
    /// leaving the earlier segments etched.
    pub fn etch_run(&mut self, x: i32, y: i32, dirs: &[Dir]) -> Result<(i32, i32), EtchError> {
        let (mut cx, mut cy) = (x, y);
        for &dir in dirs {
            self.etch(cx, cy, dir)?;
            let (dx, dy) = dir.offset();
            cx += dx;
            cy += dy;
        }
        Ok((cx, cy))
    }

    /// Mark `(x, y)` as covered by fixture `id` (or clear it with `None`).
    /// Off-board coordinates are ignored.
    pub fn set_fixture(&mut self, x: i32, y: i32, id: Option<u64>) {
        if let Some(p) = self.point_mut(x, y) {
            p.fixture = id;
        }
    }

    fn segment(&self, x: i32, y: i32, dir: Dir) -> Result<(i32, i32), EtchError> {
        if !self.contains(x, y) {
            return Err(EtchError::OutOfBounds { x, y });
        }
        let (dx, dy) = dir.offset();
        self.neighbor(x, y, dir)
            .ok_or(EtchError::OutOfBounds { x: x + dx, y: y + dy })
    }
}
