//! Physics actuators.
//!
//! `tick` latches the drive level from the input pins; `update` pushes the
//! corresponding force or torque into the body each frame. The physics
//! wrapper integrates over its own step.

use voltgrid_logic::tick::{PartLogic, StateArray};

use super::{PartBehavior, PinSlots};
use crate::physics::PartContext;

/// Torque per unit of throttle drive.
pub const MOTOR_TORQUE: f32 = 40.0;

/// Force per unit of thrust drive.
pub const THRUSTER_FORCE: f32 = 25.0;

/// Wheel motor. Pin 0: power input, pin 1: throttle input.
///
/// Applies torque proportional to the raw throttle value while powered,
/// so analog drives (a resistor chain, a sonar) modulate speed.
pub struct Motor {
    power: usize,
    throttle: usize,
    drive: f64,
}

impl Motor {
    pub fn new(slots: PinSlots) -> Self {
        Self {
            power: slots.slot(0),
            throttle: slots.slot(1),
            drive: 0.0,
        }
    }
}

impl PartLogic for Motor {
    fn tick(&mut self, state: &mut StateArray) {
        self.drive = if state.get(self.power) != 0.0 {
            state.get(self.throttle)
        } else {
            0.0
        };
    }
}

impl PartBehavior for Motor {
    fn update(&mut self, _dt: f32, ctx: &mut PartContext<'_>) {
        if self.drive == 0.0 {
            return;
        }
        if let Some(body) = ctx.body.as_mut() {
            body.apply_torque(self.drive as f32 * MOTOR_TORQUE);
        }
    }
}

/// Directional thruster. Pin 0: power input, pin 1: thrust input.
///
/// Pushes the body along its facing while powered and driven.
pub struct Thruster {
    power: usize,
    thrust: usize,
    drive: f64,
}

impl Thruster {
    pub fn new(slots: PinSlots) -> Self {
        Self {
            power: slots.slot(0),
            thrust: slots.slot(1),
            drive: 0.0,
        }
    }
}

impl PartLogic for Thruster {
    fn tick(&mut self, state: &mut StateArray) {
        self.drive = if state.get(self.power) != 0.0 {
            state.get(self.thrust)
        } else {
            0.0
        };
    }
}

impl PartBehavior for Thruster {
    fn update(&mut self, _dt: f32, ctx: &mut PartContext<'_>) {
        if self.drive == 0.0 {
            return;
        }
        if let Some(body) = ctx.body.as_mut() {
            let magnitude = self.drive as f32 * THRUSTER_FORCE;
            let angle = body.angle();
            body.apply_force(angle.cos() * magnitude, angle.sin() * magnitude);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{ControlState, FreeBody};

    #[test]
    fn test_motor_torques_body_while_powered() {
        let mut motor = Motor::new(PinSlots::new(vec![1, 2]));
        let mut state = StateArray::new(3);
        state.set(1, 1.0);
        state.set(2, 0.5);
        motor.tick(&mut state);

        let mut body = FreeBody::at(0.0, 0.0);
        let controls = ControlState::default();
        let mut ctx = PartContext {
            body: Some(&mut body),
            controls: &controls,
        };
        motor.update(0.016, &mut ctx);
        body.step(1.0);
        assert!((body.angular - 0.5 * MOTOR_TORQUE).abs() < 1e-4);
    }

    #[test]
    fn test_unpowered_motor_is_inert() {
        let mut motor = Motor::new(PinSlots::new(vec![1, 2]));
        let mut state = StateArray::new(3);
        state.set(2, 1.0); // throttle high, power low
        motor.tick(&mut state);

        let mut body = FreeBody::at(0.0, 0.0);
        let controls = ControlState::default();
        let mut ctx = PartContext {
            body: Some(&mut body),
            controls: &controls,
        };
        motor.update(0.016, &mut ctx);
        body.step(1.0);
        assert_eq!(body.angular, 0.0);
    }

    #[test]
    fn test_thruster_pushes_along_facing() {
        let mut thruster = Thruster::new(PinSlots::new(vec![1, 2]));
        let mut state = StateArray::new(3);
        state.set(1, 1.0);
        state.set(2, 1.0);
        thruster.tick(&mut state);

        let mut body = FreeBody::at(0.0, 0.0);
        let controls = ControlState::default();
        let mut ctx = PartContext {
            body: Some(&mut body),
            controls: &controls,
        };
        thruster.update(0.016, &mut ctx);
        body.step(1.0);
        // Facing 0 radians: all force lands on +x
        assert!((body.vx - THRUSTER_FORCE).abs() < 1e-4);
        assert!(body.vy.abs() < 1e-4);
    }
}
