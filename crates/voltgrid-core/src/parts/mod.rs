//! Built-in part library and the part runtime contract.
//!
//! Each part module documents its pin order and its own input
//! interpretation rule — the rules are deliberately per-part (an And gate
//! demands exactly 1 where an Or gate accepts any nonzero drive), matching
//! the part datasheets the editor shows.

mod actuators;
mod analog;
mod gates;
mod indicators;
mod power;
mod sensors;

pub use actuators::*;
pub use analog::*;
pub use gates::*;
pub use indicators::*;
pub use power::*;
pub use sensors::*;

use voltgrid_logic::tick::{PartLogic, StateArray};

use crate::physics::PartContext;

/// A runtime's view of its own pins: one state slot per declared pin, in
/// pin order, resolved by the graph build.
#[derive(Debug, Clone, Default)]
pub struct PinSlots(Vec<usize>);

impl PinSlots {
    pub fn new(slots: Vec<usize>) -> Self {
        Self(slots)
    }

    /// Slot of pin `pin`; ground for undeclared pins.
    pub fn slot(&self, pin: usize) -> usize {
        self.0.get(pin).copied().unwrap_or(StateArray::GROUND)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Runtime contract for one placed part.
///
/// `tick` (from [`PartLogic`]) is the pure pin transition, run once per
/// logic tick in graph order. `initialize` runs once per graph build
/// before the first tick. `update` runs once per render frame, decoupled
/// from tick cadence — animated and physics-coupled behavior lives there.
pub trait PartBehavior: PartLogic {
    fn initialize(&mut self, _ctx: &mut PartContext<'_>) {}

    fn update(&mut self, _dt: f32, _ctx: &mut PartContext<'_>) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pin_slots_default_to_ground() {
        let slots = PinSlots::new(vec![3, 1]);
        assert_eq!(slots.slot(0), 3);
        assert_eq!(slots.slot(1), 1);
        assert_eq!(slots.slot(2), StateArray::GROUND);
        assert_eq!(slots.len(), 2);
        assert!(PinSlots::default().is_empty());
    }
}
