//! The shared per-tick state array and the tick pass itself.

use serde::{Deserialize, Serialize};

use crate::entry::PartEntry;

/// Flat array of pin values: one slot per assigned output pin, plus the
/// reserved ground slot at index 0.
///
/// Values are raw `f64`s. Binary parts write exactly 0 or 1; analog parts
/// (resistor, sonar) legitimately hold intermediate values. The ground
/// slot always reads 0 and swallows writes, so inputs whose net resolution
/// failed see a constant low.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateArray {
    values: Vec<f64>,
}

impl StateArray {
    /// The reserved always-zero slot unwired inputs point at.
    pub const GROUND: usize = 0;

    /// Allocate `len` slots, all zero. `len` comes from the matching graph
    /// build and is always at least 1 (the ground slot).
    pub fn new(len: usize) -> Self {
        Self {
            values: vec![0.0; len.max(1)],
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Read a slot. Ground and out-of-range slots read 0.
    pub fn get(&self, slot: usize) -> f64 {
        self.values.get(slot).copied().unwrap_or(0.0)
    }

    /// Write a slot. Writes to ground are ignored, keeping the unwired
    /// default at exactly 0. Out-of-range writes are ignored.
    pub fn set(&mut self, slot: usize, value: f64) {
        if slot == Self::GROUND {
            return;
        }
        if let Some(v) = self.values.get_mut(slot) {
            *v = value;
        }
    }

    /// Zero every slot.
    pub fn clear(&mut self) {
        for v in &mut self.values {
            *v = 0.0;
        }
    }
}

/// Per-tick pin transition logic for one placed part.
///
/// Implementations read their input slots and write only their own output
/// slots. The builder's order guarantees producers run before consumers,
/// so a single pass per tick suffices — no fixed-point iteration.
pub trait PartLogic {
    fn tick(&mut self, state: &mut StateArray);
}

impl<T: PartLogic + ?Sized> PartLogic for Box<T> {
    fn tick(&mut self, state: &mut StateArray) {
        (**self).tick(state);
    }
}

/// Run one synchronous evaluation pass: every ordered part exactly once,
/// no retries. `parts` is indexed by fixture index, matching the fixture
/// list the graph was built from.
pub fn run_tick<P: PartLogic>(state: &mut StateArray, order: &[PartEntry], parts: &mut [P]) {
    for entry in order {
        if let Some(part) = parts.get_mut(entry.fixture()) {
            part.tick(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{PartEntry, PinSpec};

    #[test]
    fn test_ground_slot_reads_zero_and_swallows_writes() {
        let mut state = StateArray::new(3);
        state.set(StateArray::GROUND, 5.0);
        assert_eq!(state.get(StateArray::GROUND), 0.0);
        state.set(1, 0.5);
        assert_eq!(state.get(1), 0.5);
    }

    #[test]
    fn test_out_of_range_access_is_inert() {
        let mut state = StateArray::new(2);
        state.set(17, 1.0);
        assert_eq!(state.get(17), 0.0);
    }

    #[test]
    fn test_zero_len_still_has_ground() {
        let state = StateArray::new(0);
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn test_clear_zeroes_all_slots() {
        let mut state = StateArray::new(3);
        state.set(1, 1.0);
        state.set(2, 0.25);
        state.clear();
        assert_eq!(state.get(1), 0.0);
        assert_eq!(state.get(2), 0.0);
    }

    struct Stamp {
        tag: f64,
        slot: usize,
        calls: u32,
    }

    impl PartLogic for Stamp {
        fn tick(&mut self, state: &mut StateArray) {
            self.calls += 1;
            // Append the tag digit so invocation order is observable
            let prior = state.get(self.slot);
            state.set(self.slot, prior * 10.0 + self.tag);
        }
    }

    #[test]
    fn test_run_tick_follows_order_and_runs_each_part_once() {
        let order = vec![
            PartEntry::new(2, 2, &[PinSpec::output(0, 0)]),
            PartEntry::new(0, 0, &[PinSpec::output(0, 0)]),
            PartEntry::new(1, 1, &[PinSpec::output(0, 0)]),
        ];
        let mut parts = vec![
            Stamp { tag: 1.0, slot: 1, calls: 0 },
            Stamp { tag: 2.0, slot: 1, calls: 0 },
            Stamp { tag: 3.0, slot: 1, calls: 0 },
        ];
        let mut state = StateArray::new(2);
        run_tick(&mut state, &order, &mut parts);
        // Fixture order 2, 0, 1 → digits 3, 1, 2
        assert_eq!(state.get(1), 312.0);
        for part in &parts {
            assert_eq!(part.calls, 1);
        }
    }
}
