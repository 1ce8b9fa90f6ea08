//! Indicator parts — pure sinks the renderer reads back.

use voltgrid_logic::tick::{PartLogic, StateArray};

use super::{PartBehavior, PinSlots};

/// Pin 0: input. Latches the observed level each tick. Any nonzero level
/// renders lit; fractional drive dims proportionally.
pub struct Led {
    input: usize,
    level: f64,
}

impl Led {
    pub fn new(slots: PinSlots) -> Self {
        Self {
            input: slots.slot(0),
            level: 0.0,
        }
    }

    /// Brightness observed at the last tick, in the input's raw units.
    pub fn level(&self) -> f64 {
        self.level
    }
}

impl PartLogic for Led {
    fn tick(&mut self, state: &mut StateArray) {
        self.level = state.get(self.input);
    }
}

impl PartBehavior for Led {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_led_latches_input_level() {
        let mut led = Led::new(PinSlots::new(vec![1]));
        let mut state = StateArray::new(2);
        state.set(1, 0.5);
        led.tick(&mut state);
        assert_eq!(led.level(), 0.5);

        state.set(1, 0.0);
        led.tick(&mut state);
        assert_eq!(led.level(), 0.0);
    }

    #[test]
    fn test_unwired_led_stays_dark() {
        let mut led = Led::new(PinSlots::new(vec![StateArray::GROUND]));
        let mut state = StateArray::new(4);
        state.set(1, 1.0);
        led.tick(&mut state);
        assert_eq!(led.level(), 0.0);
    }
}
