//! Components for placed-part entities.

use serde::{Deserialize, Serialize};

/// Board coordinate of a placed part's origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub x: i32,
    pub y: i32,
}

impl Placement {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Which registered part type this entity is an instance of.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartInstance {
    pub def_id: String,
}

impl PartInstance {
    pub fn new(def_id: impl Into<String>) -> Self {
        Self {
            def_id: def_id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_construction() {
        let placement = Placement::new(3, -1);
        assert_eq!((placement.x, placement.y), (3, -1));
        let instance = PartInstance::new("battery");
        assert_eq!(instance.def_id, "battery");
    }
}
