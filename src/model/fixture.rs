use serde_json::{json, Map, Value};

use super::{
    ObjectProperties, PhysicsForce, PhysicsInteraction, PhysicsModelData, PhysicsObject,
    PhysicsSystem,
};

fn object(id: &str, kind: &str, position: [f32; 3], rotation: [f32; 3], scale: [f32; 3], color: &str, mass: f64) -> PhysicsObject {
    PhysicsObject {
        id: id.to_string(),
        kind: kind.to_string(),
        position,
        rotation,
        scale,
        color: color.to_string(),
        properties: ObjectProperties::with_mass(mass),
    }
}

fn properties(entries: &[(&str, Value)]) -> Map<String, Value> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

/// Built-in lever / fulcrum / weight system used for offline demonstration
pub fn sample_lever() -> PhysicsModelData {
    PhysicsModelData {
        objects: vec![
            object("lever", "box", [0.0, 0.0, 0.0], [0.0, 0.0, 0.0], [4.0, 0.2, 0.5], "#4287f5", 1.0),
            object("fulcrum", "cone", [0.0, -0.5, 0.0], [180.0, 0.0, 0.0], [0.5, 0.5, 0.5], "#3a3a3a", 5.0),
            object("weight", "box", [1.5, 0.5, 0.0], [0.0, 0.0, 0.0], [0.8, 0.8, 0.8], "#e84393", 2.0),
        ],
        physics: PhysicsSystem {
            kind: "lever".to_string(),
            properties: properties(&[("fulcrum_position", json!([0, 0, 0]))]),
            forces: vec![
                PhysicsForce {
                    kind: "gravity".to_string(),
                    magnitude: 9.8,
                    direction: [0.0, -1.0, 0.0],
                    application_point: [0.0, 0.0, 0.0],
                },
                PhysicsForce {
                    kind: "applied".to_string(),
                    magnitude: 5.0,
                    direction: [0.0, 1.0, 0.0],
                    application_point: [-1.5, 0.0, 0.0],
                },
            ],
        },
        interactions: vec![PhysicsInteraction {
            kind: "joint".to_string(),
            objects: vec!["lever".to_string(), "fulcrum".to_string()],
            properties: properties(&[("type", json!("pivot"))]),
        }],
    }
}
