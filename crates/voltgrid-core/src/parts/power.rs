//! Power sources: the battery and controller-driven buttons.

use voltgrid_logic::tick::{PartLogic, StateArray};

use super::{PartBehavior, PinSlots};
use crate::physics::PartContext;

/// Constant source. Pin 0: output, always exactly 1.
pub struct Battery {
    out: usize,
}

impl Battery {
    pub fn new(slots: PinSlots) -> Self {
        Self {
            out: slots.slot(0),
        }
    }
}

impl PartLogic for Battery {
    fn tick(&mut self, state: &mut StateArray) {
        state.set(self.out, 1.0);
    }
}

impl PartBehavior for Battery {}

/// Momentary controller-driven source. Pin 0: output — exactly 1 while
/// the bound controller button is held, 0 otherwise.
///
/// The button is sampled once per frame, so a press shorter than a frame
/// is never observed.
pub struct Button {
    out: usize,
    button: usize,
    held: bool,
}

impl Button {
    pub fn new(slots: PinSlots, button: usize) -> Self {
        Self {
            out: slots.slot(0),
            button,
            held: false,
        }
    }
}

impl PartLogic for Button {
    fn tick(&mut self, state: &mut StateArray) {
        state.set(self.out, if self.held { 1.0 } else { 0.0 });
    }
}

impl PartBehavior for Button {
    fn update(&mut self, _dt: f32, ctx: &mut PartContext<'_>) {
        self.held = ctx.controls.held(self.button);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::ControlState;

    #[test]
    fn test_battery_always_outputs_one() {
        let mut battery = Battery::new(PinSlots::new(vec![1]));
        let mut state = StateArray::new(2);
        battery.tick(&mut state);
        assert_eq!(state.get(1), 1.0);
        battery.tick(&mut state);
        assert_eq!(state.get(1), 1.0);
    }

    #[test]
    fn test_button_follows_controller() {
        let mut button = Button::new(PinSlots::new(vec![1]), 0);
        let mut controls = ControlState::default();
        let mut state = StateArray::new(2);

        button.tick(&mut state);
        assert_eq!(state.get(1), 0.0);

        controls.set(0, true);
        let mut ctx = PartContext {
            body: None,
            controls: &controls,
        };
        button.update(0.016, &mut ctx);
        button.tick(&mut state);
        assert_eq!(state.get(1), 1.0);

        controls.set(0, false);
        let mut ctx = PartContext {
            body: None,
            controls: &controls,
        };
        button.update(0.016, &mut ctx);
        button.tick(&mut state);
        assert_eq!(state.get(1), 0.0);
    }
}
