//! Game session — main entry point for running a PCB sandbox.
//!
//! [`GameSession`] owns the board, the hecs world of placed parts, the
//! part registry, and the current signal graph, and drives per-frame
//! updates plus fixed-cadence logic ticks. Any edit marks the graph dirty;
//! the next update swaps in a complete fresh build before anything ticks,
//! so a partial graph is never evaluated.

use std::collections::HashMap;

use hecs::{Entity, World};
use log::{debug, info, warn};
use voltgrid_logic::board::{Board, Dir, EtchError};
use voltgrid_logic::entry::Fixture;
use voltgrid_logic::graph::{build_graph, SignalGraph};
use voltgrid_logic::tick::{run_tick, StateArray};
use voltgrid_logic::trace::Net;

use crate::components::{PartInstance, Placement};
use crate::config::{validate_config, ConfigError, SessionConfig};
use crate::parts::{PartBehavior, PinSlots};
use crate::physics::{ControlState, PartContext, PhysicsBody};
use crate::registry::PartRegistry;

/// Upper bound on logic ticks run in one frame. A long frame stall drops
/// its tick backlog instead of snowballing into a catch-up burst.
pub const MAX_TICKS_PER_FRAME: u32 = 8;

/// Error from a session editing operation.
#[derive(Debug)]
pub enum SessionError {
    /// Rejected configuration, with every problem found.
    InvalidConfig(Vec<ConfigError>),
    /// No part registered under this id.
    UnknownPart(String),
    /// A pin of the part would land off the board.
    PinOffBoard { id: String, x: i32, y: i32 },
    /// The point is already covered by another part's footprint.
    Occupied { x: i32, y: i32 },
    /// The entity is not a placed part of this session.
    NoSuchFixture,
    /// An etch or erase failed.
    Etch(EtchError),
}

impl From<EtchError> for SessionError {
    fn from(e: EtchError) -> Self {
        SessionError::Etch(e)
    }
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::InvalidConfig(errors) => {
                write!(f, "invalid session config: ")?;
                for (i, e) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{}", e)?;
                }
                Ok(())
            }
            SessionError::UnknownPart(id) => write!(f, "no part registered as '{}'", id),
            SessionError::PinOffBoard { id, x, y } => {
                write!(f, "pin of '{}' would land off the board at ({}, {})", id, x, y)
            }
            SessionError::Occupied { x, y } => {
                write!(f, "point ({}, {}) is already covered by a part", x, y)
            }
            SessionError::NoSuchFixture => write!(f, "no such placed part"),
            SessionError::Etch(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Etch(e) => Some(e),
            _ => None,
        }
    }
}

/// One editor/simulation session: a board, its placed parts, and the
/// running signal graph.
pub struct GameSession {
    config: SessionConfig,
    /// ECS world containing one entity per placed part.
    world: World,
    board: Board,
    registry: PartRegistry,
    /// Placed entities in placement-encounter order. This is the fixture
    /// order every rebuild sees, which keeps builds idempotent.
    placements: Vec<Entity>,
    graph: SignalGraph,
    state: StateArray,
    /// One runtime per fixture, indexed like the fixture list of the
    /// current graph.
    runtimes: Vec<Box<dyn PartBehavior>>,
    fixture_entities: Vec<Entity>,
    bodies: HashMap<Entity, Box<dyn PhysicsBody>>,
    controls: ControlState,
    sim_time: f64,
    tick_debt: f32,
    dirty: bool,
}

impl GameSession {
    pub fn new(config: SessionConfig, registry: PartRegistry) -> Result<Self, SessionError> {
        let errors = validate_config(&config);
        if !errors.is_empty() {
            return Err(SessionError::InvalidConfig(errors));
        }
        let board = Board::new(config.board_width, config.board_height);
        Ok(Self {
            config,
            world: World::new(),
            board,
            registry,
            placements: Vec::new(),
            graph: SignalGraph::default(),
            state: StateArray::new(1),
            runtimes: Vec::new(),
            fixture_entities: Vec::new(),
            bodies: HashMap::new(),
            controls: ControlState::default(),
            sim_time: 0.0,
            tick_debt: 0.0,
            dirty: false,
        })
    }

    /// Place a registered part with its origin at `(x, y)`.
    ///
    /// Every pin location is validated before anything is mutated: a
    /// failed placement leaves the board and world untouched.
    pub fn place_part(&mut self, def_id: &str, x: i32, y: i32) -> Result<Entity, SessionError> {
        let def = self
            .registry
            .get(def_id)
            .ok_or_else(|| SessionError::UnknownPart(def_id.to_string()))?;
        let pins = def.pins.clone();
        for pin in &pins {
            let (px, py) = (x + pin.dx, y + pin.dy);
            if !self.board.contains(px, py) {
                return Err(SessionError::PinOffBoard {
                    id: def_id.to_string(),
                    x: px,
                    y: py,
                });
            }
            if self.board.point(px, py).and_then(|p| p.fixture).is_some() {
                return Err(SessionError::Occupied { x: px, y: py });
            }
        }

        let entity = self
            .world
            .spawn((Placement::new(x, y), PartInstance::new(def_id)));
        let id = entity.to_bits().get();
        for pin in &pins {
            self.board.set_fixture(x + pin.dx, y + pin.dy, Some(id));
        }
        self.placements.push(entity);
        self.dirty = true;
        debug!("placed '{}' at ({}, {})", def_id, x, y);
        Ok(entity)
    }

    /// Remove a placed part, clearing its footprint and detaching its body.
    pub fn remove_part(&mut self, entity: Entity) -> Result<(), SessionError> {
        let (x, y, def_id) = {
            let placement = self
                .world
                .get::<&Placement>(entity)
                .map_err(|_| SessionError::NoSuchFixture)?;
            let instance = self
                .world
                .get::<&PartInstance>(entity)
                .map_err(|_| SessionError::NoSuchFixture)?;
            (placement.x, placement.y, instance.def_id.clone())
        };
        if let Some(def) = self.registry.get(&def_id) {
            for pin in &def.pins {
                self.board.set_fixture(x + pin.dx, y + pin.dy, None);
            }
        }
        let _ = self.world.despawn(entity);
        self.placements.retain(|&e| e != entity);
        self.bodies.remove(&entity);
        self.dirty = true;
        debug!("removed '{}' from ({}, {})", def_id, x, y);
        Ok(())
    }

    /// Etch a trace segment. See [`Board::etch`].
    pub fn etch(&mut self, x: i32, y: i32, dir: Dir) -> Result<(), SessionError> {
        self.board.etch(x, y, dir)?;
        self.dirty = true;
        Ok(())
    }

    /// Erase a trace segment. See [`Board::erase`].
    pub fn erase(&mut self, x: i32, y: i32, dir: Dir) -> Result<(), SessionError> {
        self.board.erase(x, y, dir)?;
        self.dirty = true;
        Ok(())
    }

    /// Etch a connected run of segments, returning the final coordinate.
    pub fn etch_run(&mut self, x: i32, y: i32, dirs: &[Dir]) -> Result<(i32, i32), SessionError> {
        // A failed run may already have etched its earlier segments.
        self.dirty = true;
        let end = self.board.etch_run(x, y, dirs)?;
        Ok(end)
    }

    /// Attach the physics body backing a placed part. Sensor and actuator
    /// runtimes find it through their [`PartContext`]; parts without a
    /// body degrade to inert readings.
    pub fn attach_body(&mut self, entity: Entity, body: Box<dyn PhysicsBody>) {
        self.bodies.insert(entity, body);
    }

    /// Rebuild the signal graph, state array, and part runtimes from the
    /// current board and placements.
    ///
    /// The previous build is replaced wholesale — order, state, and
    /// runtimes swap in together, and `initialize` runs on every runtime
    /// before the next tick. Part-internal state does not survive this.
    pub fn rebuild(&mut self) {
        let mut fixtures = Vec::with_capacity(self.placements.len());
        let mut fixture_entities = Vec::with_capacity(self.placements.len());
        for &entity in &self.placements {
            let placement = match self.world.get::<&Placement>(entity) {
                Ok(p) => *p,
                Err(_) => continue,
            };
            let def = match self
                .world
                .get::<&PartInstance>(entity)
                .ok()
                .and_then(|i| self.registry.get(&i.def_id))
            {
                Some(def) => def,
                None => continue,
            };
            fixtures.push(Fixture::new(
                entity.to_bits().get(),
                placement.x,
                placement.y,
                def.pins.clone(),
            ));
            fixture_entities.push(entity);
        }

        let graph = build_graph(&self.board, &fixtures);
        let state = StateArray::new(graph.state_len);
        let mut runtimes: Vec<Box<dyn PartBehavior>> = Vec::with_capacity(fixtures.len());
        for (i, &entity) in fixture_entities.iter().enumerate() {
            let slots = graph
                .order
                .iter()
                .find(|e| e.fixture() == i)
                .map(|e| PinSlots::new(e.slots().to_vec()))
                .unwrap_or_default();
            let def = self
                .world
                .get::<&PartInstance>(entity)
                .ok()
                .and_then(|i| self.registry.get(&i.def_id));
            if let Some(def) = def {
                runtimes.push(def.build(slots));
            }
        }

        info!(
            "graph rebuilt: {} parts, {} state slots, {} conflicted nets",
            graph.order.len(),
            graph.state_len,
            graph.invalid_nets.len()
        );
        for net in &graph.invalid_nets {
            warn!(
                "short circuit: {} outputs drive the {}-point net at {:?}",
                net.drivers().len(),
                net.len(),
                net.start()
            );
        }

        self.graph = graph;
        self.state = state;
        self.runtimes = runtimes;
        self.fixture_entities = fixture_entities;
        self.tick_debt = 0.0;
        self.dirty = false;

        for (i, runtime) in self.runtimes.iter_mut().enumerate() {
            let entity = self.fixture_entities[i];
            let mut ctx = PartContext {
                body: self.bodies.get_mut(&entity).map(|b| &mut **b as &mut dyn PhysicsBody),
                controls: &self.controls,
            };
            runtime.initialize(&mut ctx);
        }
    }

    /// Advance the session by one render frame.
    ///
    /// Rebuilds first if an edit dirtied the graph, runs every runtime's
    /// per-frame `update`, steps attached bodies, then fires zero or more
    /// logic ticks to hold the configured tick rate.
    pub fn update(&mut self, dt: f32) {
        if self.dirty {
            self.rebuild();
        }
        self.sim_time += f64::from(dt);

        for (i, runtime) in self.runtimes.iter_mut().enumerate() {
            let entity = self.fixture_entities[i];
            let mut ctx = PartContext {
                body: self.bodies.get_mut(&entity).map(|b| &mut **b as &mut dyn PhysicsBody),
                controls: &self.controls,
            };
            runtime.update(dt, &mut ctx);
        }
        for body in self.bodies.values_mut() {
            body.step(dt);
        }

        self.tick_debt += dt * self.config.tick_hz;
        let mut ticks = 0;
        while self.tick_debt >= 1.0 && ticks < MAX_TICKS_PER_FRAME {
            run_tick(&mut self.state, &self.graph.order, &mut self.runtimes);
            self.tick_debt -= 1.0;
            ticks += 1;
        }
        if ticks == MAX_TICKS_PER_FRAME {
            self.tick_debt = 0.0;
        }
    }

    /// Run exactly one logic tick, rebuilding first if needed. Bypasses
    /// the frame-rate machinery; harnesses and tests step with this.
    pub fn logic_tick(&mut self) {
        if self.dirty {
            self.rebuild();
        }
        run_tick(&mut self.state, &self.graph.order, &mut self.runtimes);
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn registry(&self) -> &PartRegistry {
        &self.registry
    }

    /// Host-writable controller snapshot. Button edits take effect at the
    /// next frame update; they never dirty the graph.
    pub fn controls_mut(&mut self) -> &mut ControlState {
        &mut self.controls
    }

    pub fn controls(&self) -> &ControlState {
        &self.controls
    }

    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    /// Count placed parts.
    pub fn part_count(&self) -> usize {
        self.world.query::<&PartInstance>().iter().count()
    }

    /// Placed entities in placement order.
    pub fn placements(&self) -> &[Entity] {
        &self.placements
    }

    /// Conflicted nets of the last build, for the editor to highlight.
    pub fn invalid_nets(&self) -> &[Net] {
        &self.graph.invalid_nets
    }

    pub fn graph(&self) -> &SignalGraph {
        &self.graph
    }

    pub fn state(&self) -> &StateArray {
        &self.state
    }

    /// State slot of a placed part's pin, per the last build. `None` for
    /// entities the build did not see.
    pub fn pin_slot(&self, entity: Entity, pin: usize) -> Option<usize> {
        let id = entity.to_bits().get();
        self.graph
            .order
            .iter()
            .find(|e| e.id() == id)
            .map(|e| e.slot(pin))
    }

    /// Current value on a placed part's pin, per the last build and tick.
    pub fn pin_level(&self, entity: Entity, pin: usize) -> Option<f64> {
        self.pin_slot(entity, pin).map(|slot| self.state.get(slot))
    }

    pub fn body(&self, entity: Entity) -> Option<&dyn PhysicsBody> {
        self.bodies.get(&entity).map(|b| b.as_ref())
    }
}
