//! Signal graph building — nets, input wiring, and evaluation order.
//!
//! [`build_graph`] turns a board plus its placed parts into everything the
//! tick engine needs: part entries in producer-before-consumer order, the
//! conflicted nets for the editor to surface, and the state-array size.
//! The whole result is replaced on every rebuild; nothing is patched in
//! place.

use std::collections::VecDeque;

use crate::board::Board;
use crate::entry::{Fixture, PartEntry, PinKind};
use crate::tick::StateArray;
use crate::trace::{trace_path, Net, NetDriver};

/// Result of one graph build.
#[derive(Debug, Clone)]
pub struct SignalGraph {
    /// Part entries in evaluation order, one per fixture.
    pub order: Vec<PartEntry>,
    /// Multiply-driven nets, excluded from wiring. Wiring problems are
    /// data for the caller to surface, never errors.
    pub invalid_nets: Vec<Net>,
    /// Slot count for the matching [`StateArray`]: assigned outputs plus
    /// the ground slot.
    pub state_len: usize,
}

impl Default for SignalGraph {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            invalid_nets: Vec::new(),
            state_len: 1,
        }
    }
}

/// Build the signal graph for `fixtures` placed on `board`.
///
/// A board with zero parts is valid: empty order, one-slot state array.
pub fn build_graph(board: &Board, fixtures: &[Fixture]) -> SignalGraph {
    let mut entries: Vec<PartEntry> = fixtures
        .iter()
        .enumerate()
        .map(|(i, f)| PartEntry::new(i, f.id, &f.pins))
        .collect();

    // Phase 1: assign output slots and trace each output's net. A net that
    // lands on a trace already claimed by a valid net is a short circuit:
    // the trace moves to the invalid list carrying every driver seen so
    // far. Later outputs are checked against the remaining valid nets
    // only, so a third driver re-registers the same trace as valid — the
    // same discovery-order behavior the editor's conflict report has
    // always had.
    let mut nets: Vec<Net> = Vec::new();
    let mut invalid_nets: Vec<Net> = Vec::new();
    let mut next_slot = StateArray::GROUND + 1;
    for (part, fixture) in fixtures.iter().enumerate() {
        for (pin, spec) in fixture.pins.iter().enumerate() {
            if spec.kind != PinKind::Output {
                continue;
            }
            let slot = next_slot;
            next_slot += 1;
            entries[part].set_slot(pin, slot);
            let (px, py) = (fixture.x + spec.dx, fixture.y + spec.dy);
            if !board.contains(px, py) {
                // Slot stays reserved; the output drives nothing.
                continue;
            }
            let mut net = trace_path(board, px, py);
            match nets.iter().position(|other| other.overlaps(&net)) {
                Some(clash) => {
                    let prior = nets.remove(clash);
                    for driver in prior.drivers() {
                        net.add_driver(*driver);
                    }
                    net.add_driver(NetDriver { part, slot });
                    invalid_nets.push(net);
                }
                None => {
                    net.add_driver(NetDriver { part, slot });
                    nets.push(net);
                }
            }
        }
    }

    // Phase 2: point every input at its driving output's slot and record
    // the dependency edge. Inputs on no net, or on a conflicted net, stay
    // grounded.
    for (part, fixture) in fixtures.iter().enumerate() {
        for (pin, spec) in fixture.pins.iter().enumerate() {
            if spec.kind != PinKind::Input {
                continue;
            }
            let (px, py) = (fixture.x + spec.dx, fixture.y + spec.dy);
            let driver = nets
                .iter()
                .find(|net| net.contains(px, py))
                .and_then(|net| net.driver());
            if let Some(driver) = driver {
                entries[driver.part].add_consumer();
                entries[part].set_slot(pin, driver.slot);
                entries[part].add_source(driver.part);
            }
        }
    }

    // Phase 3: evaluation order.
    let order = order_entries(entries);

    SignalGraph {
        order,
        invalid_nets,
        state_len: next_slot,
    }
}

/// Reverse-topological ordering pass.
///
/// Zero-output parts seed the queue; placing a part releases each of its
/// producers once that producer's last consumer is placed. When the queue
/// drains with parts left over (a cycle, or a producer nothing consumes),
/// the stuck part with the most unplaced consumers is forced in as a new
/// root, first-placed winning ties. A forced cycle edge reads the previous
/// tick's value — accepted one-tick latency on that edge, not a bug.
fn order_entries(mut entries: Vec<PartEntry>) -> Vec<PartEntry> {
    let total = entries.len();
    let mut placed = vec![false; total];
    let mut order: VecDeque<usize> = VecDeque::with_capacity(total);
    // Seeded in reverse so prepending keeps sinks in placement order.
    let mut queue: VecDeque<usize> = (0..total)
        .rev()
        .filter(|&i| !entries[i].has_outputs())
        .collect();

    while order.len() < total {
        while let Some(part) = queue.pop_front() {
            if placed[part] {
                continue;
            }
            placed[part] = true;
            order.push_front(part);
            let sources = entries[part].sources().to_vec();
            for source in sources {
                if !placed[source] && entries[source].connect_output() {
                    queue.push_front(source);
                }
            }
        }
        if order.len() == total {
            break;
        }
        let mut forced = None;
        let mut best = 0;
        for (i, entry) in entries.iter().enumerate() {
            if placed[i] {
                continue;
            }
            let count = entry.required_outputs();
            if forced.is_none() || count > best {
                forced = Some(i);
                best = count;
            }
        }
        if let Some(root) = forced {
            queue.push_front(root);
        }
    }

    let mut taken: Vec<Option<PartEntry>> = entries.drain(..).map(Some).collect();
    order.iter().filter_map(|&i| taken[i].take()).collect()
}
