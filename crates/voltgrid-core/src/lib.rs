//! VoltGrid Core - PCB sandbox session engine
//!
//! Everything around the pure signal-graph logic: the hecs world of placed
//! parts, the part registry with the built-in library, the collaborator
//! seams for physics and player input, and the session driver that
//! rebuilds the graph on edits and runs frame updates plus fixed-cadence
//! logic ticks.
//!
//! # Architecture
//!
//! - **Entities**: one per placed part, carrying `Placement` and
//!   `PartInstance` components
//! - **Board**: the etched-trace grid owned by the session, mutated only
//!   between ticks
//! - **Graph**: rebuilt as a unit whenever the board or placement changes;
//!   a partial graph is never ticked
//! - **Runtimes**: one `PartBehavior` box per fixture, created from the
//!   registry at each rebuild
//!
//! # Example
//!
//! ```rust,no_run
//! use voltgrid_core::prelude::*;
//! use voltgrid_logic::board::Dir;
//!
//! let mut session =
//!     GameSession::new(SessionConfig::default(), PartRegistry::standard()).unwrap();
//! session.place_part("battery", 0, 0).unwrap();
//! session.place_part("led", 4, 0).unwrap();
//! session.etch_run(0, 0, &[Dir::East; 4]).unwrap();
//!
//! loop {
//!     session.update(1.0 / 60.0); // 60 FPS
//! }
//! ```

pub mod components;
pub mod config;
pub mod engine;
pub mod parts;
pub mod physics;
pub mod registry;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::config::SessionConfig;
    pub use crate::engine::GameSession;
    pub use crate::registry::PartRegistry;
}
