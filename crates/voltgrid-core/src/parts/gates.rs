//! Logic gates.
//!
//! Every gate is powered: a zero power pin forces the output low no matter
//! what the inputs carry. Input interpretation is per-gate: And demands
//! exactly 1 on both inputs (a resistor-dimmed 0.5 does not count), Or and
//! Xor accept any nonzero drive, Not emits high only for an exactly-zero
//! input.
//!
//! Two-input gates use pin order power, a, b, out; Not uses power, in, out.

use voltgrid_logic::tick::{PartLogic, StateArray};

use super::{PartBehavior, PinSlots};

pub struct GateAnd {
    power: usize,
    a: usize,
    b: usize,
    out: usize,
}

impl GateAnd {
    pub fn new(slots: PinSlots) -> Self {
        Self {
            power: slots.slot(0),
            a: slots.slot(1),
            b: slots.slot(2),
            out: slots.slot(3),
        }
    }
}

impl PartLogic for GateAnd {
    fn tick(&mut self, state: &mut StateArray) {
        let on = state.get(self.power) != 0.0
            && state.get(self.a) == 1.0
            && state.get(self.b) == 1.0;
        state.set(self.out, if on { 1.0 } else { 0.0 });
    }
}

impl PartBehavior for GateAnd {}

pub struct GateOr {
    power: usize,
    a: usize,
    b: usize,
    out: usize,
}

impl GateOr {
    pub fn new(slots: PinSlots) -> Self {
        Self {
            power: slots.slot(0),
            a: slots.slot(1),
            b: slots.slot(2),
            out: slots.slot(3),
        }
    }
}

impl PartLogic for GateOr {
    fn tick(&mut self, state: &mut StateArray) {
        let on = state.get(self.power) != 0.0
            && (state.get(self.a) != 0.0 || state.get(self.b) != 0.0);
        state.set(self.out, if on { 1.0 } else { 0.0 });
    }
}

impl PartBehavior for GateOr {}

pub struct GateXor {
    power: usize,
    a: usize,
    b: usize,
    out: usize,
}

impl GateXor {
    pub fn new(slots: PinSlots) -> Self {
        Self {
            power: slots.slot(0),
            a: slots.slot(1),
            b: slots.slot(2),
            out: slots.slot(3),
        }
    }
}

impl PartLogic for GateXor {
    fn tick(&mut self, state: &mut StateArray) {
        let on = state.get(self.power) != 0.0
            && ((state.get(self.a) != 0.0) ^ (state.get(self.b) != 0.0));
        state.set(self.out, if on { 1.0 } else { 0.0 });
    }
}

impl PartBehavior for GateXor {}

pub struct GateNot {
    power: usize,
    input: usize,
    out: usize,
}

impl GateNot {
    pub fn new(slots: PinSlots) -> Self {
        Self {
            power: slots.slot(0),
            input: slots.slot(1),
            out: slots.slot(2),
        }
    }
}

impl PartLogic for GateNot {
    fn tick(&mut self, state: &mut StateArray) {
        let on = state.get(self.power) != 0.0 && state.get(self.input) == 0.0;
        state.set(self.out, if on { 1.0 } else { 0.0 });
    }
}

impl PartBehavior for GateNot {}
