//! Part entries — builder-facing bookkeeping for placed parts.
//!
//! [`Fixture`] is the plain-data view of a placed part the graph builder
//! consumes. [`PartEntry`] carries the per-pin state slots and the consumer
//! counter the ordering pass decrements.

use serde::{Deserialize, Serialize};

use crate::tick::StateArray;

/// Electrical role of a pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PinKind {
    /// Reads the driving value of the net over it each tick.
    Input,
    /// Drives the net over it; owns one state-array slot.
    Output,
    /// Mechanical only — mounts the part, never carries signal.
    Structural,
}

/// One pin of a part footprint, at an offset from the fixture origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinSpec {
    pub kind: PinKind,
    pub dx: i32,
    pub dy: i32,
}

impl PinSpec {
    pub fn input(dx: i32, dy: i32) -> Self {
        Self { kind: PinKind::Input, dx, dy }
    }

    pub fn output(dx: i32, dy: i32) -> Self {
        Self { kind: PinKind::Output, dx, dy }
    }

    pub fn structural(dx: i32, dy: i32) -> Self {
        Self { kind: PinKind::Structural, dx, dy }
    }
}

/// A part instance placed at a board location, as seen by the builder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fixture {
    /// Opaque id assigned by the session (entity bits). Carried through to
    /// the entry so callers can map build results back to their world.
    pub id: u64,
    pub x: i32,
    pub y: i32,
    pub pins: Vec<PinSpec>,
}

impl Fixture {
    pub fn new(id: u64, x: i32, y: i32, pins: Vec<PinSpec>) -> Self {
        Self { id, x, y, pins }
    }

    /// Absolute board coordinate of pin `pin`.
    pub fn pin_at(&self, pin: usize) -> Option<(i32, i32)> {
        self.pins.get(pin).map(|p| (self.x + p.dx, self.y + p.dy))
    }
}

/// Per-build bookkeeping for one placed part.
///
/// Holds exactly one state slot per declared pin, fully populated by the
/// builder before the first tick: outputs get their assigned slot, wired
/// inputs the driving output's slot, everything else the ground slot.
#[derive(Debug, Clone)]
pub struct PartEntry {
    fixture: usize,
    id: u64,
    pins: Vec<PinSpec>,
    slots: Vec<usize>,
    sources: Vec<usize>,
    pending: u32,
}

impl PartEntry {
    pub(crate) fn new(fixture: usize, id: u64, pins: &[PinSpec]) -> Self {
        Self {
            fixture,
            id,
            pins: pins.to_vec(),
            slots: vec![StateArray::GROUND; pins.len()],
            sources: Vec::new(),
            pending: 0,
        }
    }

    /// Index of the wrapped fixture in the build's fixture list.
    pub fn fixture(&self) -> usize {
        self.fixture
    }

    /// The fixture's opaque id.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn pins(&self) -> &[PinSpec] {
        &self.pins
    }

    /// State slots, one per pin, in pin order.
    pub fn slots(&self) -> &[usize] {
        &self.slots
    }

    /// State slot of pin `pin`; ground for unknown pins.
    pub fn slot(&self, pin: usize) -> usize {
        self.slots.get(pin).copied().unwrap_or(StateArray::GROUND)
    }

    /// True when the part declares at least one output pin.
    pub fn has_outputs(&self) -> bool {
        self.pins.iter().any(|p| p.kind == PinKind::Output)
    }

    /// Build indices of the parts driving this part's wired inputs.
    pub fn sources(&self) -> &[usize] {
        &self.sources
    }

    /// Consumers of this part's outputs not yet placed in the order.
    pub fn required_outputs(&self) -> u32 {
        self.pending
    }

    pub(crate) fn set_slot(&mut self, pin: usize, slot: usize) {
        if let Some(s) = self.slots.get_mut(pin) {
            *s = slot;
        }
    }

    pub(crate) fn add_source(&mut self, part: usize) {
        self.sources.push(part);
    }

    pub(crate) fn add_consumer(&mut self) {
        self.pending += 1;
    }

    /// Decrement-and-test: one consumer has been placed. Returns true when
    /// every consumer is placed and the part is ready to run before them.
    pub(crate) fn connect_output(&mut self) -> bool {
        self.pending = self.pending.saturating_sub(1);
        self.pending == 0
    }
}
