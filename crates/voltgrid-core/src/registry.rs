//! Part registry — the table of placeable part types.
//!
//! The session owns an explicitly constructed [`PartRegistry`]; the
//! built-in library and any loaded mods register [`PartDef`]s into it, and
//! parts are resolved by id at placement time, never by evaluating code.
//! The JSON part manifest mirrors the registry for the editor's part
//! browser and is cross-checked by [`verify_manifest`].

use std::collections::HashMap;
use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};
use voltgrid_logic::entry::{PinKind, PinSpec};

use crate::parts::{
    Altimeter, Battery, Button, Comparator, GateAnd, GateNot, GateOr, GateXor, Led, Motor,
    PartBehavior, PinSlots, Resistor, Sonar, Thruster,
};

/// Constructor for a part's runtime, invoked at every graph rebuild with
/// the pin slots that build resolved.
pub type BuildFn = Box<dyn Fn(PinSlots) -> Box<dyn PartBehavior> + Send + Sync>;

/// Pin counts by kind — the shape the manifest declares per part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinShape {
    pub inputs: u32,
    pub outputs: u32,
    pub structural: u32,
}

impl PinShape {
    pub fn of(pins: &[PinSpec]) -> Self {
        let mut shape = Self {
            inputs: 0,
            outputs: 0,
            structural: 0,
        };
        for pin in pins {
            match pin.kind {
                PinKind::Input => shape.inputs += 1,
                PinKind::Output => shape.outputs += 1,
                PinKind::Structural => shape.structural += 1,
            }
        }
        shape
    }
}

impl fmt::Display for PinShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}in/{}out/{}mount",
            self.inputs, self.outputs, self.structural
        )
    }
}

/// One registered part type: identity, footprint, and runtime constructor.
pub struct PartDef {
    /// Stable identifier parts are placed and serialized by.
    pub id: String,
    /// Display name for the editor's part browser.
    pub name: String,
    /// Pin footprint, in the pin order the runtime constructor expects.
    pub pins: Vec<PinSpec>,
    build: BuildFn,
}

impl PartDef {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        pins: Vec<PinSpec>,
        build: impl Fn(PinSlots) -> Box<dyn PartBehavior> + Send + Sync + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            pins,
            build: Box::new(build),
        }
    }

    /// Construct the runtime for one placed instance.
    pub fn build(&self, slots: PinSlots) -> Box<dyn PartBehavior> {
        (self.build)(slots)
    }

    pub fn shape(&self) -> PinShape {
        PinShape::of(&self.pins)
    }
}

impl fmt::Debug for PartDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartDef")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("pins", &self.pins)
            .finish_non_exhaustive()
    }
}

/// Registration table keyed by part id, owned by the session.
#[derive(Debug, Default)]
pub struct PartRegistry {
    defs: Vec<PartDef>,
    by_id: HashMap<String, usize>,
}

impl PartRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a part type, replacing any existing def with the same id.
    /// Returns the replaced def, so mods can shadow built-ins at load time.
    pub fn register(&mut self, def: PartDef) -> Option<PartDef> {
        debug!("registering part '{}' ({})", def.id, def.shape());
        match self.by_id.get(&def.id) {
            Some(&i) => Some(std::mem::replace(&mut self.defs[i], def)),
            None => {
                self.by_id.insert(def.id.clone(), self.defs.len());
                self.defs.push(def);
                None
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&PartDef> {
        self.by_id.get(id).map(|&i| &self.defs[i])
    }

    /// Every registered def, in registration order.
    pub fn defs(&self) -> &[PartDef] {
        &self.defs
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// The built-in part library.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(PartDef::new(
            "battery",
            "Battery",
            vec![PinSpec::output(0, 0)],
            |slots| Box::new(Battery::new(slots)),
        ));
        registry.register(PartDef::new(
            "button_a",
            "Button A",
            vec![PinSpec::output(0, 0)],
            |slots| Box::new(Button::new(slots, 0)),
        ));
        registry.register(PartDef::new(
            "button_b",
            "Button B",
            vec![PinSpec::output(0, 0)],
            |slots| Box::new(Button::new(slots, 1)),
        ));
        registry.register(PartDef::new(
            "led",
            "LED",
            vec![PinSpec::input(0, 0)],
            |slots| Box::new(Led::new(slots)),
        ));
        registry.register(PartDef::new("gate_and", "AND Gate", gate_pins(), |slots| {
            Box::new(GateAnd::new(slots))
        }));
        registry.register(PartDef::new("gate_or", "OR Gate", gate_pins(), |slots| {
            Box::new(GateOr::new(slots))
        }));
        registry.register(PartDef::new("gate_xor", "XOR Gate", gate_pins(), |slots| {
            Box::new(GateXor::new(slots))
        }));
        registry.register(PartDef::new(
            "gate_not",
            "NOT Gate",
            vec![PinSpec::input(0, 1), PinSpec::input(0, 0), PinSpec::output(2, 1)],
            |slots| Box::new(GateNot::new(slots)),
        ));
        registry.register(PartDef::new(
            "comparator",
            "Comparator",
            vec![PinSpec::input(0, 0), PinSpec::input(0, 2), PinSpec::output(2, 1)],
            |slots| Box::new(Comparator::new(slots)),
        ));
        registry.register(PartDef::new(
            "resistor",
            "Resistor",
            vec![PinSpec::input(0, 0), PinSpec::output(1, 0)],
            |slots| Box::new(Resistor::new(slots)),
        ));
        registry.register(PartDef::new(
            "sonar",
            "Sonar",
            vec![PinSpec::input(0, 0), PinSpec::output(1, 0)],
            |slots| Box::new(Sonar::new(slots)),
        ));
        registry.register(PartDef::new(
            "altimeter",
            "Altimeter",
            vec![PinSpec::output(0, 0)],
            |slots| Box::new(Altimeter::new(slots)),
        ));
        registry.register(PartDef::new(
            "motor",
            "Motor",
            vec![PinSpec::input(0, 0), PinSpec::input(0, 1), PinSpec::structural(1, 0)],
            |slots| Box::new(Motor::new(slots)),
        ));
        registry.register(PartDef::new(
            "thruster",
            "Thruster",
            vec![PinSpec::input(0, 0), PinSpec::input(0, 1), PinSpec::structural(1, 0)],
            |slots| Box::new(Thruster::new(slots)),
        ));
        registry
    }
}

/// Power at left-middle, inputs on the left corners, output right-middle.
/// Pin order matches the two-input gate constructors: power, a, b, out.
fn gate_pins() -> Vec<PinSpec> {
    vec![
        PinSpec::input(0, 1),
        PinSpec::input(0, 0),
        PinSpec::input(0, 2),
        PinSpec::output(2, 1),
    ]
}

/// One entry of the part-pack manifest (`data/part_manifest.json`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub id: String,
    pub name: String,
    pub inputs: u32,
    pub outputs: u32,
    pub structural: u32,
}

impl ManifestEntry {
    pub fn shape(&self) -> PinShape {
        PinShape {
            inputs: self.inputs,
            outputs: self.outputs,
            structural: self.structural,
        }
    }
}

/// A disagreement between the manifest and the registry.
#[derive(Debug, Clone, PartialEq)]
pub enum ManifestError {
    /// The manifest JSON did not parse.
    Parse(String),
    /// The manifest names a part the registry does not have.
    UnknownPart { id: String },
    /// A registered part is missing from the manifest.
    Unlisted { id: String },
    /// Pin counts disagree for a part both sides know.
    ShapeMismatch {
        id: String,
        manifest: PinShape,
        registry: PinShape,
    },
    /// Display names disagree for a part both sides know.
    NameMismatch {
        id: String,
        manifest: String,
        registry: String,
    },
}

impl fmt::Display for ManifestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManifestError::Parse(e) => write!(f, "manifest parse error: {}", e),
            ManifestError::UnknownPart { id } => {
                write!(f, "manifest part '{}' is not registered", id)
            }
            ManifestError::Unlisted { id } => {
                write!(f, "registered part '{}' is missing from the manifest", id)
            }
            ManifestError::ShapeMismatch {
                id,
                manifest,
                registry,
            } => write!(
                f,
                "part '{}' pin shape mismatch: manifest {} vs registry {}",
                id, manifest, registry
            ),
            ManifestError::NameMismatch {
                id,
                manifest,
                registry,
            } => write!(
                f,
                "part '{}' name mismatch: manifest '{}' vs registry '{}'",
                id, manifest, registry
            ),
        }
    }
}

impl std::error::Error for ManifestError {}

/// Cross-check a part manifest against a registry, returning every
/// disagreement found.
pub fn verify_manifest(registry: &PartRegistry, json: &str) -> Vec<ManifestError> {
    let entries: Vec<ManifestEntry> = match serde_json::from_str(json) {
        Ok(entries) => entries,
        Err(e) => return vec![ManifestError::Parse(e.to_string())],
    };

    let mut errors = Vec::new();
    for entry in &entries {
        let def = match registry.get(&entry.id) {
            Some(def) => def,
            None => {
                errors.push(ManifestError::UnknownPart {
                    id: entry.id.clone(),
                });
                continue;
            }
        };
        if entry.shape() != def.shape() {
            errors.push(ManifestError::ShapeMismatch {
                id: entry.id.clone(),
                manifest: entry.shape(),
                registry: def.shape(),
            });
        }
        if entry.name != def.name {
            errors.push(ManifestError::NameMismatch {
                id: entry.id.clone(),
                manifest: entry.name.clone(),
                registry: def.name.clone(),
            });
        }
    }
    for def in registry.defs() {
        if !entries.iter().any(|e| e.id == def.id) {
            errors.push(ManifestError::Unlisted { id: def.id.clone() });
        }
    }
    errors
}
