//! VoltGrid Headless Simulation Harness
//!
//! Validates the board topology, trace tracing, signal-graph building, and
//! the part library without a renderer or physics engine. Runs entirely
//! in-process — no window, no assets, no mods.
//!
//! Usage:
//!   cargo run -p voltgrid-simtest
//!   cargo run -p voltgrid-simtest -- --verbose

use rand::prelude::*;
use serde::Deserialize;
use voltgrid_core::config::SessionConfig;
use voltgrid_core::engine::GameSession;
use voltgrid_core::registry::{verify_manifest, PartRegistry};
use voltgrid_logic::board::{Board, Dir};
use voltgrid_logic::entry::{Fixture, PinSpec};
use voltgrid_logic::graph::build_graph;
use voltgrid_logic::trace::trace_path;

// ── Part manifest (same JSON the editor's part browser loads) ───────────
const MANIFEST_JSON: &str = include_str!("../../../data/part_manifest.json");

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct PartSpec {
    id: String,
    name: String,
    inputs: u32,
    outputs: u32,
    structural: u32,
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    env_logger::init();
    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== VoltGrid Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Part manifest vs. registry
    results.extend(validate_part_manifest(verbose));

    // 2. Board topology & etching
    results.extend(validate_board_topology(verbose));

    // 3. Trace tracing
    results.extend(validate_trace_nets(verbose));

    // 4. Signal graph building
    results.extend(validate_graph_build(verbose));

    // 5. Session end-to-end
    results.extend(validate_session(verbose));

    // 6. Randomized board sweep
    results.extend(validate_random_sweep(verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Part Manifest ────────────────────────────────────────────────────

fn validate_part_manifest(verbose: bool) -> Vec<TestResult> {
    println!("--- Part Manifest ---");
    let mut results = Vec::new();

    let manifest: Vec<PartSpec> = match serde_json::from_str(MANIFEST_JSON) {
        Ok(m) => m,
        Err(e) => {
            results.push(TestResult {
                name: "manifest_parse".into(),
                passed: false,
                detail: format!("JSON parse error: {}", e),
            });
            return results;
        }
    };

    results.push(TestResult {
        name: "manifest_not_empty".into(),
        passed: manifest.len() >= 10,
        detail: format!("{} part types loaded", manifest.len()),
    });

    // Ids unique
    let mut ids: Vec<&str> = manifest.iter().map(|p| p.id.as_str()).collect();
    ids.sort_unstable();
    let before = ids.len();
    ids.dedup();
    results.push(TestResult {
        name: "manifest_unique_ids".into(),
        passed: ids.len() == before,
        detail: format!("{} ids, {} distinct", before, ids.len()),
    });

    // Every part carries at least one electrical pin
    let inert: Vec<_> = manifest
        .iter()
        .filter(|p| p.inputs == 0 && p.outputs == 0)
        .collect();
    results.push(TestResult {
        name: "manifest_no_inert_parts".into(),
        passed: inert.is_empty(),
        detail: if inert.is_empty() {
            "every part has an input or output pin".into()
        } else {
            format!(
                "{} parts with no electrical pins: {}",
                inert.len(),
                inert
                    .iter()
                    .map(|p| p.id.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        },
    });

    // Registry cross-check
    let registry = PartRegistry::standard();
    let errors = verify_manifest(&registry, MANIFEST_JSON);
    results.push(TestResult {
        name: "manifest_matches_registry".into(),
        passed: errors.is_empty(),
        detail: if errors.is_empty() {
            format!("{} registered parts all consistent", registry.len())
        } else {
            format!(
                "{} disagreements: {}",
                errors.len(),
                errors
                    .iter()
                    .map(|e| e.to_string())
                    .collect::<Vec<_>>()
                    .join("; ")
            )
        },
    });

    // Key parts exist
    let key_parts = ["battery", "led", "gate_and", "gate_not", "resistor"];
    let missing: Vec<_> = key_parts
        .iter()
        .filter(|id| !manifest.iter().any(|p| p.id == **id))
        .collect();
    results.push(TestResult {
        name: "manifest_key_parts".into(),
        passed: missing.is_empty(),
        detail: format!("checked {:?}", key_parts),
    });

    if verbose {
        println!("  Pin shapes:");
        for p in &manifest {
            println!(
                "    {:12} {}in/{}out/{}mount",
                p.id, p.inputs, p.outputs, p.structural
            );
        }
    }

    results
}

// ── 2. Board Topology ───────────────────────────────────────────────────

fn validate_board_topology(_verbose: bool) -> Vec<TestResult> {
    println!("--- Board Topology ---");
    let mut results = Vec::new();

    // Etch mirrors on both endpoints
    let mut board = Board::new(8, 8);
    board.etch(2, 2, Dir::East).expect("on-board etch");
    let mirrored = board.point(2, 2).is_some_and(|p| p.has_trace(Dir::East))
        && board.point(3, 2).is_some_and(|p| p.has_trace(Dir::West));
    results.push(TestResult {
        name: "board_etch_mirrors".into(),
        passed: mirrored,
        detail: "east bit at (2,2) mirrored as west bit at (3,2)".into(),
    });

    // Erase clears both endpoints
    board.erase(2, 2, Dir::East).expect("on-board erase");
    let cleared = board.point(2, 2).is_some_and(|p| p.traces == 0)
        && board.point(3, 2).is_some_and(|p| p.traces == 0);
    results.push(TestResult {
        name: "board_erase_clears".into(),
        passed: cleared,
        detail: "both endpoints bare after erase".into(),
    });

    // Off-board etch fails and leaves the board unchanged
    let err = board.etch(0, 0, Dir::West).is_err();
    let untouched = board.point(0, 0).is_some_and(|p| p.traces == 0);
    results.push(TestResult {
        name: "board_offboard_etch_rejected".into(),
        passed: err && untouched,
        detail: "etch toward a missing neighbor errors, board unchanged".into(),
    });

    // Polyline etch lands where expected
    let end = board.etch_run(0, 0, &[Dir::East, Dir::SouthEast, Dir::South]);
    results.push(TestResult {
        name: "board_etch_run_endpoint".into(),
        passed: end == Ok((2, 2)),
        detail: format!("3-segment run ends at {:?}", end),
    });

    results
}

// ── 3. Trace Nets ───────────────────────────────────────────────────────

fn validate_trace_nets(_verbose: bool) -> Vec<TestResult> {
    println!("--- Trace Nets ---");
    let mut results = Vec::new();

    // A straight line traced from the middle yields the whole net
    let mut board = Board::new(10, 10);
    board
        .etch_run(0, 5, &[Dir::East; 6])
        .expect("line fits on the board");
    let net = trace_path(&board, 3, 5);
    results.push(TestResult {
        name: "trace_line_from_middle".into(),
        passed: net.len() == 7 && (0..7).all(|x| net.contains(x, 5)),
        detail: format!("{} of 7 points collected", net.len()),
    });

    // A branch is still one net
    board.etch(3, 5, Dir::North).expect("branch etch");
    board.etch(3, 4, Dir::North).expect("branch etch");
    let net = trace_path(&board, 0, 5);
    results.push(TestResult {
        name: "trace_branch_one_net".into(),
        passed: net.len() == 9 && net.contains(3, 3),
        detail: format!("branched net has {} points", net.len()),
    });

    // A closed loop terminates with each point once
    let mut ring = Board::new(5, 5);
    ring.etch_run(1, 1, &[Dir::East, Dir::South, Dir::West, Dir::North])
        .expect("ring fits on the board");
    let net = trace_path(&ring, 1, 1);
    results.push(TestResult {
        name: "trace_loop_terminates".into(),
        passed: net.len() == 4,
        detail: format!("ring net has {} points", net.len()),
    });

    // A bare point is a one-point net
    let bare = Board::new(3, 3);
    let net = trace_path(&bare, 1, 1);
    results.push(TestResult {
        name: "trace_bare_point".into(),
        passed: net.len() == 1 && net.start() == net.end(),
        detail: "unconnected pad traces to itself".into(),
    });

    results
}

// ── 4. Signal Graph ─────────────────────────────────────────────────────

fn validate_graph_build(_verbose: bool) -> Vec<TestResult> {
    println!("--- Signal Graph ---");
    let mut results = Vec::new();

    // Empty board: empty order, ground-only state
    let board = Board::new(8, 8);
    let graph = build_graph(&board, &[]);
    results.push(TestResult {
        name: "graph_empty_board".into(),
        passed: graph.order.is_empty() && graph.state_len == 1,
        detail: format!("order {} entries, state_len {}", graph.order.len(), graph.state_len),
    });

    // Straight wire: input resolves to the driving output's slot
    let mut board = Board::new(8, 8);
    board.etch_run(0, 0, &[Dir::East; 3]).expect("wire fits");
    let fixtures = [
        Fixture::new(1, 0, 0, vec![PinSpec::output(0, 0)]),
        Fixture::new(2, 3, 0, vec![PinSpec::input(0, 0)]),
    ];
    let graph = build_graph(&board, &fixtures);
    let src = graph.order.iter().find(|e| e.id() == 1).map(|e| e.slot(0));
    let dst = graph.order.iter().find(|e| e.id() == 2).map(|e| e.slot(0));
    results.push(TestResult {
        name: "graph_wire_resolves_slot".into(),
        passed: src.is_some() && src == dst,
        detail: format!("output slot {:?}, input slot {:?}", src, dst),
    });

    // Two drivers on one trace: one conflicted net, both drivers named
    let mut board = Board::new(8, 8);
    board.etch_run(0, 0, &[Dir::East; 3]).expect("wire fits");
    let fixtures = [
        Fixture::new(1, 0, 0, vec![PinSpec::output(0, 0)]),
        Fixture::new(2, 3, 0, vec![PinSpec::output(0, 0)]),
    ];
    let graph = build_graph(&board, &fixtures);
    results.push(TestResult {
        name: "graph_short_circuit_reported".into(),
        passed: graph.invalid_nets.len() == 1 && graph.invalid_nets[0].drivers().len() == 2,
        detail: format!(
            "{} invalid nets, {} drivers on the first",
            graph.invalid_nets.len(),
            graph.invalid_nets.first().map_or(0, |n| n.drivers().len())
        ),
    });

    // Discovery-order quirk: a third driver re-registers the trace as valid
    let mut board = Board::new(8, 8);
    board.etch_run(0, 0, &[Dir::East; 4]).expect("wire fits");
    let fixtures = [
        Fixture::new(1, 0, 0, vec![PinSpec::output(0, 0)]),
        Fixture::new(2, 2, 0, vec![PinSpec::output(0, 0)]),
        Fixture::new(3, 4, 0, vec![PinSpec::output(0, 0)]),
        Fixture::new(4, 1, 0, vec![PinSpec::input(0, 0)]),
    ];
    let graph = build_graph(&board, &fixtures);
    let rewired = graph.order.iter().find(|e| e.id() == 4).map(|e| e.slot(0));
    results.push(TestResult {
        name: "graph_third_driver_quirk".into(),
        passed: graph.invalid_nets.len() == 1 && rewired == Some(3),
        detail: "third output re-validates the shorted trace (known quirk)".into(),
    });

    // Chain battery → relay → sink orders producers before consumers
    let mut board = Board::new(12, 12);
    board.etch_run(0, 0, &[Dir::East; 2]).expect("wire fits");
    board.etch_run(3, 0, &[Dir::East; 2]).expect("wire fits");
    let fixtures = [
        Fixture::new(3, 5, 0, vec![PinSpec::input(0, 0)]),
        Fixture::new(2, 2, 0, vec![PinSpec::input(0, 0), PinSpec::output(1, 0)]),
        Fixture::new(1, 0, 0, vec![PinSpec::output(0, 0)]),
    ];
    let graph = build_graph(&board, &fixtures);
    let pos = |id: u64| graph.order.iter().position(|e| e.id() == id);
    let ordered = pos(1) < pos(2) && pos(2) < pos(3) && pos(1).is_some();
    results.push(TestResult {
        name: "graph_chain_topological".into(),
        passed: ordered,
        detail: format!("positions: src {:?}, relay {:?}, sink {:?}", pos(1), pos(2), pos(3)),
    });

    // Two-part cycle terminates with both parts exactly once
    let mut board = Board::new(8, 8);
    let relay = |id, x, y| Fixture::new(id, x, y, vec![PinSpec::input(0, 0), PinSpec::output(1, 0)]);
    board.etch_run(1, 0, &[Dir::SouthWest, Dir::South]).expect("wire fits");
    board.etch_run(1, 2, &[Dir::North, Dir::NorthWest]).expect("wire fits");
    let graph = build_graph(&board, &[relay(1, 0, 0), relay(2, 0, 2)]);
    results.push(TestResult {
        name: "graph_cycle_terminates".into(),
        passed: graph.order.len() == 2 && graph.order[0].id() != graph.order[1].id(),
        detail: format!("{} parts ordered", graph.order.len()),
    });

    results
}

// ── 5. Session End-to-End ───────────────────────────────────────────────

fn session() -> GameSession {
    let config = SessionConfig {
        board_width: 24,
        board_height: 24,
        tick_hz: 30.0,
    };
    GameSession::new(config, PartRegistry::standard()).expect("default-sized session")
}

fn validate_session(_verbose: bool) -> Vec<TestResult> {
    println!("--- Session End-to-End ---");
    let mut results = Vec::new();

    // Battery wired to an LED lights it
    let mut s = session();
    let _battery = s.place_part("battery", 0, 0).expect("battery fits");
    let led = s.place_part("led", 4, 0).expect("led fits");
    s.etch_run(0, 0, &[Dir::East; 4]).expect("wire fits");
    s.update(0.1);
    results.push(TestResult {
        name: "session_battery_lights_led".into(),
        passed: s.pin_level(led, 0) == Some(1.0),
        detail: format!("led level {:?}", s.pin_level(led, 0)),
    });

    // Two resistors in series quarter the signal
    let mut s = session();
    s.place_part("battery", 0, 0).expect("battery fits");
    s.place_part("resistor", 2, 0).expect("resistor fits");
    s.place_part("resistor", 4, 0).expect("resistor fits");
    let led = s.place_part("led", 6, 0).expect("led fits");
    s.etch_run(0, 0, &[Dir::East; 2]).expect("wire fits");
    s.etch(3, 0, Dir::East).expect("wire fits");
    s.etch(5, 0, Dir::East).expect("wire fits");
    s.update(0.1);
    results.push(TestResult {
        name: "session_resistor_chain".into(),
        passed: s.pin_level(led, 0) == Some(0.25),
        detail: format!("led level {:?} (expected 0.25)", s.pin_level(led, 0)),
    });

    // Powered AND gate follows its wired inputs
    let mut s = session();
    s.place_part("battery", 0, 0).expect("battery fits");
    s.place_part("battery", 0, 1).expect("battery fits");
    s.place_part("battery", 0, 2).expect("battery fits");
    let led = s.place_part("led", 8, 1).expect("led fits");
    s.place_part("gate_and", 4, 0).expect("gate fits");
    s.etch_run(0, 0, &[Dir::East; 4]).expect("wire fits");
    s.etch_run(0, 1, &[Dir::East; 4]).expect("wire fits");
    s.etch_run(0, 2, &[Dir::East; 4]).expect("wire fits");
    s.etch_run(6, 1, &[Dir::East; 2]).expect("wire fits");
    s.update(0.1);
    let both_high = s.pin_level(led, 0) == Some(1.0);
    // Cutting input b grounds it, and And demands exactly 1 on both
    s.erase(3, 2, Dir::East).expect("wire exists");
    s.update(0.1);
    let one_low = s.pin_level(led, 0) == Some(0.0);
    results.push(TestResult {
        name: "session_and_gate_truth".into(),
        passed: both_high && one_low,
        detail: format!("both wired → 1: {}, one cut → 0: {}", both_high, one_low),
    });

    // Short circuits surface through the session and an erase fixes them
    let mut s = session();
    s.place_part("battery", 0, 0).expect("battery fits");
    s.place_part("battery", 3, 0).expect("battery fits");
    s.etch_run(0, 0, &[Dir::East; 3]).expect("wire fits");
    s.update(0.1);
    let reported = s.invalid_nets().len() == 1;
    s.erase(1, 0, Dir::East).expect("wire exists");
    s.update(0.1);
    let resolved = s.invalid_nets().is_empty();
    results.push(TestResult {
        name: "session_short_report_and_fix".into(),
        passed: reported && resolved,
        detail: format!("reported: {}, resolved after erase: {}", reported, resolved),
    });

    // Controller buttons drive button parts
    let mut s = session();
    let _button = s.place_part("button_a", 0, 0).expect("button fits");
    let led = s.place_part("led", 2, 0).expect("led fits");
    s.etch_run(0, 0, &[Dir::East; 2]).expect("wire fits");
    s.update(0.1);
    let released = s.pin_level(led, 0) == Some(0.0);
    s.controls_mut().set(0, true);
    s.update(0.1);
    let held = s.pin_level(led, 0) == Some(1.0);
    results.push(TestResult {
        name: "session_button_drives_led".into(),
        passed: released && held,
        detail: format!("released → 0: {}, held → 1: {}", released, held),
    });

    results
}

// ── 6. Randomized Sweep ─────────────────────────────────────────────────

const SWEEP_ROUNDS: usize = 32;

fn validate_random_sweep(verbose: bool) -> Vec<TestResult> {
    println!("--- Randomized Sweep ---");
    let mut results = Vec::new();
    let mut rng = rand::thread_rng();

    let part_ids: Vec<String> = PartRegistry::standard()
        .defs()
        .iter()
        .map(|d| d.id.clone())
        .collect();

    let mut orders_complete = true;
    let mut state_sized = true;
    let mut rebuilds_idempotent = true;
    let mut values_finite = true;
    let mut total_parts = 0usize;
    let mut total_conflicts = 0usize;

    for _ in 0..SWEEP_ROUNDS {
        let mut s = session();

        for _ in 0..rng.gen_range(20..80) {
            let x = rng.gen_range(0..24);
            let y = rng.gen_range(0..24);
            let dir = Dir::ALL[rng.gen_range(0..8)];
            // Edge-adjacent etches legitimately fail; the sweep only cares
            // that nothing panics and the graph invariants hold after.
            let _ = s.etch(x, y, dir);
        }

        let mut outputs = 0u32;
        for _ in 0..rng.gen_range(5..25) {
            let id = &part_ids[rng.gen_range(0..part_ids.len())];
            let x = rng.gen_range(0..24);
            let y = rng.gen_range(0..24);
            if s.place_part(id, x, y).is_ok() {
                let def = s.registry().get(id).expect("standard part");
                outputs += def.shape().outputs;
            }
        }

        s.rebuild();
        total_parts += s.part_count();
        total_conflicts += s.invalid_nets().len();

        // Every placed part appears in the order exactly once
        let mut ordered: Vec<u64> = s.graph().order.iter().map(|e| e.id()).collect();
        let first_order = ordered.clone();
        ordered.sort_unstable();
        let mut placed: Vec<u64> = s
            .placements()
            .iter()
            .map(|e| e.to_bits().get())
            .collect();
        placed.sort_unstable();
        if ordered != placed {
            orders_complete = false;
        }

        // State array is exactly ground + one slot per output pin
        if s.graph().state_len != 1 + outputs as usize {
            state_sized = false;
        }

        // Rebuilding unchanged input reproduces the order and sizing
        s.rebuild();
        let second_order: Vec<u64> = s.graph().order.iter().map(|e| e.id()).collect();
        if second_order != first_order || s.graph().state_len != 1 + outputs as usize {
            rebuilds_idempotent = false;
        }

        // A few frames of simulation keep every slot finite
        for _ in 0..10 {
            s.update(1.0 / 30.0);
        }
        for slot in 0..s.state().len() {
            if !s.state().get(slot).is_finite() {
                values_finite = false;
            }
        }
    }

    results.push(TestResult {
        name: "sweep_orders_complete".into(),
        passed: orders_complete,
        detail: format!("{} parts across {} boards, each ordered once", total_parts, SWEEP_ROUNDS),
    });
    results.push(TestResult {
        name: "sweep_state_sized_to_outputs".into(),
        passed: state_sized,
        detail: "state_len == assigned outputs + ground".into(),
    });
    results.push(TestResult {
        name: "sweep_rebuild_idempotent".into(),
        passed: rebuilds_idempotent,
        detail: "second build of unchanged board matches the first".into(),
    });
    results.push(TestResult {
        name: "sweep_values_finite".into(),
        passed: values_finite,
        detail: "no NaN or infinity after 10 frames per board".into(),
    });

    if verbose {
        println!(
            "  {} boards, {} parts placed, {} wiring conflicts encountered",
            SWEEP_ROUNDS, total_parts, total_conflicts
        );
    }

    results
}
