//! Physics diagram schema shared by the analyzer and the scene renderer.
//!
//! The JSON field names are fixed by the prompt sent to the vision service, so
//! every `type` field is renamed explicitly and open `properties` maps are kept
//! as raw JSON.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub mod fixture;
pub mod validate;

pub use fixture::sample_lever;
pub use validate::{coerce, Coerced, SchemaError, SchemaWarning};

/// A 3-component numeric tuple as it appears in the schema
pub type Triple = [f32; 3];

/// Root value returned by analysis or supplied as a fixture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicsModelData {
    pub objects: Vec<PhysicsObject>,
    pub physics: PhysicsSystem,
    #[serde(default)]
    pub interactions: Vec<PhysicsInteraction>,
}

impl PhysicsModelData {
    pub fn object(&self, id: &str) -> Option<&PhysicsObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    /// Ids referenced by interactions that do not name any object
    pub fn dangling_references(&self) -> Vec<&str> {
        self.interactions
            .iter()
            .flat_map(|i| i.objects.iter())
            .filter(|id| self.object(id).is_none())
            .map(String::as_str)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicsObject {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub position: Triple,
    pub rotation: Triple,
    pub scale: Triple,
    pub color: String,
    pub properties: ObjectProperties,
}

/// Object properties: `mass` is always present, everything else is free-form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectProperties {
    pub mass: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ObjectProperties {
    pub fn with_mass(mass: f64) -> Self {
        Self { mass, extra: Map::new() }
    }
}

/// Overall mechanical configuration of the diagram
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicsSystem {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub properties: Map<String, Value>,
    #[serde(default)]
    pub forces: Vec<PhysicsForce>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicsForce {
    #[serde(rename = "type")]
    pub kind: String,
    pub magnitude: f32,
    pub direction: Triple,
    pub application_point: Triple,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicsInteraction {
    #[serde(rename = "type")]
    pub kind: String,
    pub objects: Vec<String>,
    #[serde(default)]
    pub properties: Map<String, Value>,
}
