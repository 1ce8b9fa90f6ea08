//! Collaborator seams: the physics capability and player controls.
//!
//! The game's physics wrapper implements [`PhysicsBody`]; the simulation
//! layer only consumes it. [`FreeBody`] is the headless stand-in used by
//! tests and the simtest harness.

use serde::{Deserialize, Serialize};

/// Opaque physics capability backing a placed part.
pub trait PhysicsBody {
    /// World position of the body center.
    fn position(&self) -> (f32, f32);
    /// Orientation in radians.
    fn angle(&self) -> f32;
    /// Accumulate a world-space force for the next physics step.
    fn apply_force(&mut self, fx: f32, fy: f32);
    /// Accumulate a torque for the next physics step.
    fn apply_torque(&mut self, torque: f32);
    /// Distance to the first obstacle along a body-local ray, if any
    /// within `max`.
    fn ray_distance(&self, dx: f32, dy: f32, max: f32) -> Option<f32>;
    /// Advance the body's own integration. Engine-backed bodies leave this
    /// as the no-op default — their physics world steps globally.
    fn step(&mut self, _dt: f32) {}
}

/// Player input snapshot, written by the host each frame and read by
/// controller-driven parts.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ControlState {
    buttons: [bool; Self::BUTTONS],
}

impl ControlState {
    pub const BUTTONS: usize = 4;

    pub fn held(&self, button: usize) -> bool {
        self.buttons.get(button).copied().unwrap_or(false)
    }

    pub fn set(&mut self, button: usize, held: bool) {
        if let Some(b) = self.buttons.get_mut(button) {
            *b = held;
        }
    }

    pub fn release_all(&mut self) {
        self.buttons = [false; Self::BUTTONS];
    }
}

/// Collaborators handed to part runtimes at initialize and each frame.
pub struct PartContext<'a> {
    /// The part's physics body, when the host attached one.
    pub body: Option<&'a mut dyn PhysicsBody>,
    pub controls: &'a ControlState,
}

/// Simple unconstrained body for headless runs: unit mass, no collision,
/// forces integrated by an explicit [`FreeBody::step`]. The ray query
/// reports a flat floor at `y = 0` below the body, whatever the ray
/// direction — enough for sensors to read something meaningful without a
/// physics engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct FreeBody {
    pub x: f32,
    pub y: f32,
    pub rotation: f32,
    pub vx: f32,
    pub vy: f32,
    pub angular: f32,
    fx: f32,
    fy: f32,
    torque: f32,
}

impl FreeBody {
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            ..Default::default()
        }
    }

    /// Integrate one physics step, consuming accumulated forces.
    pub fn step(&mut self, dt: f32) {
        self.vx += self.fx * dt;
        self.vy += self.fy * dt;
        self.angular += self.torque * dt;
        self.x += self.vx * dt;
        self.y += self.vy * dt;
        self.rotation += self.angular * dt;
        self.fx = 0.0;
        self.fy = 0.0;
        self.torque = 0.0;
    }
}

impl PhysicsBody for FreeBody {
    fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    fn angle(&self) -> f32 {
        self.rotation
    }

    fn apply_force(&mut self, fx: f32, fy: f32) {
        self.fx += fx;
        self.fy += fy;
    }

    fn apply_torque(&mut self, torque: f32) {
        self.torque += torque;
    }

    fn ray_distance(&self, _dx: f32, _dy: f32, max: f32) -> Option<f32> {
        if self.y > 0.0 && self.y <= max {
            Some(self.y)
        } else {
            None
        }
    }

    fn step(&mut self, dt: f32) {
        FreeBody::step(self, dt);
    }
}
