//! Analog parts — the ones whose pins legitimately carry values between
//! 0 and 1.

use voltgrid_logic::tick::{PartLogic, StateArray};

use super::{PartBehavior, PinSlots};

/// Attenuation factor of a single resistor.
pub const RESISTOR_FACTOR: f64 = 0.5;

/// Scales its input by [`RESISTOR_FACTOR`]. Pin 0: input, pin 1: output.
/// Fractional values pass straight through to downstream parts.
pub struct Resistor {
    input: usize,
    out: usize,
}

impl Resistor {
    pub fn new(slots: PinSlots) -> Self {
        Self {
            input: slots.slot(0),
            out: slots.slot(1),
        }
    }
}

impl PartLogic for Resistor {
    fn tick(&mut self, state: &mut StateArray) {
        state.set(self.out, state.get(self.input) * RESISTOR_FACTOR);
    }
}

impl PartBehavior for Resistor {}

/// Pin 0: input a, pin 1: input b, pin 2: output — exactly 1 when a > b,
/// 0 otherwise. Compares raw values, so analog drives work as thresholds.
pub struct Comparator {
    a: usize,
    b: usize,
    out: usize,
}

impl Comparator {
    pub fn new(slots: PinSlots) -> Self {
        Self {
            a: slots.slot(0),
            b: slots.slot(1),
            out: slots.slot(2),
        }
    }
}

impl PartLogic for Comparator {
    fn tick(&mut self, state: &mut StateArray) {
        let on = state.get(self.a) > state.get(self.b);
        state.set(self.out, if on { 1.0 } else { 0.0 });
    }
}

impl PartBehavior for Comparator {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resistor_halves_its_input() {
        let mut resistor = Resistor::new(PinSlots::new(vec![1, 2]));
        let mut state = StateArray::new(3);
        state.set(1, 1.0);
        resistor.tick(&mut state);
        assert_eq!(state.get(2), 0.5);

        // Two in series quarter the signal
        let mut second = Resistor::new(PinSlots::new(vec![2, 1]));
        second.tick(&mut state);
        assert_eq!(state.get(1), 0.25);
    }

    #[test]
    fn test_comparator_thresholds_analog_values() {
        let mut comparator = Comparator::new(PinSlots::new(vec![1, 2, 3]));
        let mut state = StateArray::new(4);
        state.set(1, 0.6);
        state.set(2, 0.5);
        comparator.tick(&mut state);
        assert_eq!(state.get(3), 1.0);

        state.set(1, 0.5);
        comparator.tick(&mut state);
        assert_eq!(state.get(3), 0.0);
    }
}
