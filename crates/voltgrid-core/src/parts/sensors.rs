//! Physics-backed sensors.
//!
//! Measurements are sampled from the body once per frame in `update`;
//! `tick` only transfers the latest sample to the output pin. Without an
//! attached body a sensor reads 0.

use voltgrid_logic::tick::{PartLogic, StateArray};

use super::{PartBehavior, PinSlots};
use crate::physics::PartContext;

/// Maximum sonar range in world units.
pub const SONAR_RANGE: f32 = 12.0;

/// Height at which the altimeter saturates, in world units.
pub const ALTIMETER_CEILING: f32 = 100.0;

/// Forward rangefinder. Pin 0: power input, pin 1: output.
///
/// Emits proximity as a ratio in `[0, 1]`: 1 at contact, falling to 0 at
/// [`SONAR_RANGE`]. Unpowered or detached, it emits 0.
pub struct Sonar {
    power: usize,
    out: usize,
    reading: f64,
}

impl Sonar {
    pub fn new(slots: PinSlots) -> Self {
        Self {
            power: slots.slot(0),
            out: slots.slot(1),
            reading: 0.0,
        }
    }
}

impl PartLogic for Sonar {
    fn tick(&mut self, state: &mut StateArray) {
        let value = if state.get(self.power) != 0.0 {
            self.reading
        } else {
            0.0
        };
        state.set(self.out, value);
    }
}

impl PartBehavior for Sonar {
    fn update(&mut self, _dt: f32, ctx: &mut PartContext<'_>) {
        self.reading = match &ctx.body {
            Some(body) => match body.ray_distance(1.0, 0.0, SONAR_RANGE) {
                Some(distance) => (1.0 - f64::from(distance / SONAR_RANGE)).clamp(0.0, 1.0),
                None => 0.0,
            },
            None => 0.0,
        };
    }
}

/// Pin 0: output. Emits the body's height as a ratio of
/// [`ALTIMETER_CEILING`], clamped to `[0, 1]`.
pub struct Altimeter {
    out: usize,
    reading: f64,
}

impl Altimeter {
    pub fn new(slots: PinSlots) -> Self {
        Self {
            out: slots.slot(0),
            reading: 0.0,
        }
    }
}

impl PartLogic for Altimeter {
    fn tick(&mut self, state: &mut StateArray) {
        state.set(self.out, self.reading);
    }
}

impl PartBehavior for Altimeter {
    fn update(&mut self, _dt: f32, ctx: &mut PartContext<'_>) {
        self.reading = match &ctx.body {
            Some(body) => f64::from((body.position().1 / ALTIMETER_CEILING).clamp(0.0, 1.0)),
            None => 0.0,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{ControlState, FreeBody};

    #[test]
    fn test_sonar_reads_proximity_ratio() {
        let mut sonar = Sonar::new(PinSlots::new(vec![1, 2]));
        let mut body = FreeBody::at(0.0, 3.0);
        let controls = ControlState::default();
        let mut ctx = PartContext {
            body: Some(&mut body),
            controls: &controls,
        };
        sonar.update(0.016, &mut ctx);

        let mut state = StateArray::new(3);
        state.set(1, 1.0); // powered
        sonar.tick(&mut state);
        let expected = 1.0 - 3.0 / f64::from(SONAR_RANGE);
        assert!((state.get(2) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_unpowered_sonar_emits_zero() {
        let mut sonar = Sonar::new(PinSlots::new(vec![1, 2]));
        let mut body = FreeBody::at(0.0, 3.0);
        let controls = ControlState::default();
        let mut ctx = PartContext {
            body: Some(&mut body),
            controls: &controls,
        };
        sonar.update(0.016, &mut ctx);

        let mut state = StateArray::new(3);
        sonar.tick(&mut state);
        assert_eq!(state.get(2), 0.0);
    }

    #[test]
    fn test_detached_sonar_emits_zero() {
        let mut sonar = Sonar::new(PinSlots::new(vec![1, 2]));
        let controls = ControlState::default();
        let mut ctx = PartContext {
            body: None,
            controls: &controls,
        };
        sonar.update(0.016, &mut ctx);

        let mut state = StateArray::new(3);
        state.set(1, 1.0);
        sonar.tick(&mut state);
        assert_eq!(state.get(2), 0.0);
    }

    #[test]
    fn test_altimeter_ratio_saturates_at_ceiling() {
        let mut altimeter = Altimeter::new(PinSlots::new(vec![1]));
        let controls = ControlState::default();

        let mut body = FreeBody::at(0.0, 50.0);
        let mut ctx = PartContext {
            body: Some(&mut body),
            controls: &controls,
        };
        altimeter.update(0.016, &mut ctx);
        let mut state = StateArray::new(2);
        altimeter.tick(&mut state);
        assert!((state.get(1) - 0.5).abs() < 1e-6);

        let mut high = FreeBody::at(0.0, 500.0);
        let mut ctx = PartContext {
            body: Some(&mut high),
            controls: &controls,
        };
        altimeter.update(0.016, &mut ctx);
        altimeter.tick(&mut state);
        assert_eq!(state.get(1), 1.0);
    }
}
