//! End-to-end signal graph scenarios: etch a board, place parts, build the
//! graph, and run logic ticks against the shared state array.

use voltgrid_logic::board::{Board, Dir};
use voltgrid_logic::entry::{Fixture, PartEntry, PinSpec};
use voltgrid_logic::graph::{build_graph, SignalGraph};
use voltgrid_logic::tick::{run_tick, PartLogic, StateArray};

struct Battery {
    out: usize,
}

impl PartLogic for Battery {
    fn tick(&mut self, state: &mut StateArray) {
        state.set(self.out, 1.0);
    }
}

/// Sink with no outputs — the graph wires its input slot; nothing to do.
struct Led;

impl PartLogic for Led {
    fn tick(&mut self, _state: &mut StateArray) {}
}

struct AndGate {
    a: usize,
    b: usize,
    out: usize,
}

impl PartLogic for AndGate {
    fn tick(&mut self, state: &mut StateArray) {
        let on = state.get(self.a) == 1.0 && state.get(self.b) == 1.0;
        state.set(self.out, if on { 1.0 } else { 0.0 });
    }
}

struct Inverter {
    input: usize,
    out: usize,
}

impl PartLogic for Inverter {
    fn tick(&mut self, state: &mut StateArray) {
        let low = state.get(self.input) == 0.0;
        state.set(self.out, if low { 1.0 } else { 0.0 });
    }
}

fn entry(graph: &SignalGraph, id: u64) -> &PartEntry {
    graph
        .order
        .iter()
        .find(|e| e.id() == id)
        .expect("part missing from order")
}

#[test]
fn battery_lights_led_after_one_tick() {
    let mut board = Board::new(8, 8);
    board.etch_run(0, 0, &[Dir::East, Dir::East]).unwrap();
    let fixtures = [
        Fixture::new(1, 0, 0, vec![PinSpec::output(0, 0)]),
        Fixture::new(2, 2, 0, vec![PinSpec::input(0, 0)]),
    ];
    let graph = build_graph(&board, &fixtures);
    let battery_out = entry(&graph, 1).slot(0);
    let led_in = entry(&graph, 2).slot(0);
    assert_eq!(battery_out, led_in);

    let mut state = StateArray::new(graph.state_len);
    let mut parts: Vec<Box<dyn PartLogic>> = vec![Box::new(Battery { out: battery_out }), Box::new(Led)];
    run_tick(&mut state, &graph.order, &mut parts);
    assert_eq!(state.get(led_in), 1.0);
}

#[test]
fn two_batteries_on_one_net_report_one_conflict() {
    let mut board = Board::new(8, 8);
    board.etch_run(0, 0, &[Dir::East, Dir::East, Dir::East]).unwrap();
    let fixtures = [
        Fixture::new(1, 0, 0, vec![PinSpec::output(0, 0)]),
        Fixture::new(2, 3, 0, vec![PinSpec::output(0, 0)]),
    ];
    let graph = build_graph(&board, &fixtures);
    assert_eq!(graph.invalid_nets.len(), 1);
    let net = &graph.invalid_nets[0];
    for x in 0..4 {
        assert!(net.contains(x, 0));
    }
    assert_eq!(net.drivers().len(), 2);
}

#[test]
fn and_gate_with_both_inputs_powered_outputs_one() {
    let mut board = Board::new(10, 10);
    board.etch_run(0, 0, &[Dir::East, Dir::East, Dir::East]).unwrap();
    board.etch_run(0, 2, &[Dir::East, Dir::East, Dir::East]).unwrap();
    board.etch_run(5, 1, &[Dir::East, Dir::East]).unwrap();
    let fixtures = [
        Fixture::new(1, 0, 0, vec![PinSpec::output(0, 0)]),
        Fixture::new(2, 0, 2, vec![PinSpec::output(0, 0)]),
        Fixture::new(
            3,
            3,
            0,
            vec![PinSpec::input(0, 0), PinSpec::input(0, 2), PinSpec::output(2, 1)],
        ),
        Fixture::new(4, 7, 1, vec![PinSpec::input(0, 0)]),
    ];
    let graph = build_graph(&board, &fixtures);
    assert!(graph.invalid_nets.is_empty());

    let gate = entry(&graph, 3);
    let mut parts: Vec<Box<dyn PartLogic>> = vec![
        Box::new(Battery { out: entry(&graph, 1).slot(0) }),
        Box::new(Battery { out: entry(&graph, 2).slot(0) }),
        Box::new(AndGate {
            a: gate.slot(0),
            b: gate.slot(1),
            out: gate.slot(2),
        }),
        Box::new(Led),
    ];
    let mut state = StateArray::new(graph.state_len);
    run_tick(&mut state, &graph.order, &mut parts);
    assert_eq!(state.get(entry(&graph, 4).slot(0)), 1.0);
}

#[test]
fn and_gate_with_one_input_grounded_outputs_zero() {
    let mut board = Board::new(10, 10);
    board.etch_run(0, 0, &[Dir::East, Dir::East, Dir::East]).unwrap();
    board.etch_run(5, 1, &[Dir::East, Dir::East]).unwrap();
    let fixtures = [
        Fixture::new(1, 0, 0, vec![PinSpec::output(0, 0)]),
        Fixture::new(
            3,
            3,
            0,
            vec![PinSpec::input(0, 0), PinSpec::input(0, 2), PinSpec::output(2, 1)],
        ),
        Fixture::new(4, 7, 1, vec![PinSpec::input(0, 0)]),
    ];
    let graph = build_graph(&board, &fixtures);
    let gate = entry(&graph, 3);
    assert_eq!(gate.slot(1), StateArray::GROUND);

    let mut parts: Vec<Box<dyn PartLogic>> = vec![
        Box::new(Battery { out: entry(&graph, 1).slot(0) }),
        Box::new(AndGate {
            a: gate.slot(0),
            b: gate.slot(1),
            out: gate.slot(2),
        }),
        Box::new(Led),
    ];
    let mut state = StateArray::new(graph.state_len);
    run_tick(&mut state, &graph.order, &mut parts);
    assert_eq!(state.get(entry(&graph, 4).slot(0)), 0.0);
}

#[test]
fn inverter_loop_settles_with_one_tick_latency_on_broken_edge() {
    let mut board = Board::new(8, 8);
    let relay_pins = || vec![PinSpec::input(0, 0), PinSpec::output(1, 0)];
    let fixtures = [
        Fixture::new(1, 0, 0, relay_pins()),
        Fixture::new(2, 0, 2, relay_pins()),
    ];
    board.etch_run(1, 0, &[Dir::SouthWest, Dir::South]).unwrap();
    board.etch_run(1, 2, &[Dir::North, Dir::NorthWest]).unwrap();

    let graph = build_graph(&board, &fixtures);
    assert_eq!(graph.order.len(), 2);

    let a = entry(&graph, 1);
    let b = entry(&graph, 2);
    let mut parts: Vec<Box<dyn PartLogic>> = vec![
        Box::new(Inverter { input: a.slot(0), out: a.slot(1) }),
        Box::new(Inverter { input: b.slot(0), out: b.slot(1) }),
    ];
    let (a_out, b_out) = (a.slot(1), b.slot(1));

    let mut state = StateArray::new(graph.state_len);
    for _ in 0..3 {
        run_tick(&mut state, &graph.order, &mut parts);
        // Part 1 is the forced cycle root and runs last, reading the
        // fresh value; part 2 reads the stale edge. The loop settles to
        // one high, one low output every tick.
        assert_eq!(state.get(b_out), 1.0);
        assert_eq!(state.get(a_out), 0.0);
    }
}

#[test]
fn empty_board_ticks_without_parts() {
    let board = Board::new(4, 4);
    let graph = build_graph(&board, &[]);
    assert_eq!(graph.state_len, 1);
    let mut state = StateArray::new(graph.state_len);
    let mut parts: Vec<Box<dyn PartLogic>> = Vec::new();
    run_tick(&mut state, &graph.order, &mut parts);
    assert_eq!(state.len(), 1);
}
