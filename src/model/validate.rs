//! Coercion of untrusted JSON (as produced by the vision service) into the typed schema.
//!
//! Nothing the service returns is contractually guaranteed to match the schema, so the
//! value is walked field by field. Entries that cannot be rendered are skipped, optional
//! gaps are filled with defaults, and every repair is reported as a [`SchemaWarning`].

use std::collections::HashSet;
use std::fmt;

use serde_json::{Map, Value};
use thiserror::Error;

use super::{
    ObjectProperties, PhysicsForce, PhysicsInteraction, PhysicsModelData, PhysicsObject,
    PhysicsSystem, Triple,
};

pub const DEFAULT_OBJECT_TYPE: &str = "box";
pub const DEFAULT_COLOR: &str = "#808080";
pub const UNKNOWN_TAG: &str = "unknown";

#[derive(Debug, Error, PartialEq)]
pub enum SchemaError {
    #[error("Model data must be a JSON object, got {found}")]
    NotAnObject { found: &'static str },
}

/// A repair or skip applied while coercing the model
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaWarning {
    /// JSON path of the offending value, e.g. `objects[2].position`
    pub path: String,
    pub message: String,
}

impl SchemaWarning {
    fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { path: path.into(), message: message.into() }
    }
}

impl fmt::Display for SchemaWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Coerced {
    pub model: PhysicsModelData,
    pub warnings: Vec<SchemaWarning>,
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn triple(value: Option<&Value>) -> Result<Triple, String> {
    let value = value.ok_or_else(|| "missing".to_string())?;
    let items = value
        .as_array()
        .ok_or_else(|| format!("expected an array of 3 numbers, got {}", kind_of(value)))?;

    if items.len() != 3 {
        return Err(format!("expected 3 components, got {}", items.len()));
    }

    let mut out = [0.0_f32; 3];
    for (slot, item) in out.iter_mut().zip(items) {
        let component = item
            .as_f64()
            .ok_or_else(|| format!("component is {}, not a number", kind_of(item)))?;
        *slot = finite_f32(component).ok_or_else(|| format!("component {} is out of range", component))?;
    }
    Ok(out)
}

/// Narrow to `f32`, rejecting values that overflow to infinity
fn finite_f32(value: f64) -> Option<f32> {
    let narrowed = value as f32;
    narrowed.is_finite().then_some(narrowed)
}

fn tag(map: &Map<String, Value>, path: &str, warnings: &mut Vec<SchemaWarning>) -> String {
    match map.get("type").and_then(Value::as_str) {
        Some(kind) => kind.to_string(),
        None => {
            warnings.push(SchemaWarning::new(format!("{}.type", path), "missing type tag, using \"unknown\""));
            UNKNOWN_TAG.to_string()
        }
    }
}

fn open_map(map: &Map<String, Value>, key: &str) -> Map<String, Value> {
    map.get(key).and_then(Value::as_object).cloned().unwrap_or_default()
}

fn coerce_object(
    index: usize,
    value: &Value,
    seen: &mut HashSet<String>,
    warnings: &mut Vec<SchemaWarning>,
) -> Option<PhysicsObject> {
    let path = format!("objects[{}]", index);

    let Some(map) = value.as_object() else {
        warnings.push(SchemaWarning::new(&path, format!("skipped: expected an object, got {}", kind_of(value))));
        return None;
    };

    let Some(id) = map.get("id").and_then(Value::as_str) else {
        warnings.push(SchemaWarning::new(format!("{}.id", path), "skipped: missing string id"));
        return None;
    };

    if !seen.insert(id.to_string()) {
        warnings.push(SchemaWarning::new(format!("{}.id", path), format!("skipped: duplicate id \"{}\"", id)));
        return None;
    }

    let mut tuples = [[0.0_f32; 3]; 3];
    for (slot, field) in tuples.iter_mut().zip(["position", "rotation", "scale"]) {
        match triple(map.get(field)) {
            Ok(t) => *slot = t,
            Err(reason) => {
                warnings.push(SchemaWarning::new(format!("{}.{}", path, field), format!("skipped: {}", reason)));
                seen.remove(id);
                return None;
            }
        }
    }
    let [position, rotation, scale] = tuples;

    let kind = match map.get("type").and_then(Value::as_str) {
        Some(kind) => kind.to_string(),
        None => {
            warnings.push(SchemaWarning::new(format!("{}.type", path), "missing type, using box"));
            DEFAULT_OBJECT_TYPE.to_string()
        }
    };

    let color = match map.get("color").and_then(Value::as_str) {
        Some(color) => color.to_string(),
        None => {
            warnings.push(SchemaWarning::new(format!("{}.color", path), "missing color, using grey"));
            DEFAULT_COLOR.to_string()
        }
    };

    let mut extra = open_map(map, "properties");
    let mass = match extra.remove("mass").as_ref().and_then(Value::as_f64) {
        Some(mass) if mass.is_finite() => mass,
        _ => {
            warnings.push(SchemaWarning::new(format!("{}.properties.mass", path), "missing or non-numeric mass, using 0"));
            0.0
        }
    };
    if mass < 0.0 {
        warnings.push(SchemaWarning::new(format!("{}.properties.mass", path), format!("negative mass {}", mass)));
    }

    Some(PhysicsObject {
        id: id.to_string(),
        kind,
        position,
        rotation,
        scale,
        color,
        properties: ObjectProperties { mass, extra },
    })
}

fn coerce_force(index: usize, value: &Value, warnings: &mut Vec<SchemaWarning>) -> Option<PhysicsForce> {
    let path = format!("physics.forces[{}]", index);

    let Some(map) = value.as_object() else {
        warnings.push(SchemaWarning::new(&path, format!("skipped: expected an object, got {}", kind_of(value))));
        return None;
    };

    let magnitude = match map.get("magnitude").and_then(Value::as_f64) {
        Some(m) if m >= 0.0 => match finite_f32(m) {
            Some(m) => m,
            None => {
                warnings.push(SchemaWarning::new(format!("{}.magnitude", path), format!("skipped: magnitude {} is out of range", m)));
                return None;
            }
        },
        Some(m) => {
            warnings.push(SchemaWarning::new(format!("{}.magnitude", path), format!("skipped: negative magnitude {}", m)));
            return None;
        }
        None => {
            warnings.push(SchemaWarning::new(format!("{}.magnitude", path), "skipped: missing or non-numeric magnitude"));
            return None;
        }
    };

    let direction = match triple(map.get("direction")) {
        Ok(t) => t,
        Err(reason) => {
            warnings.push(SchemaWarning::new(format!("{}.direction", path), format!("skipped: {}", reason)));
            return None;
        }
    };

    let application_point = match triple(map.get("application_point")) {
        Ok(t) => t,
        Err(reason) => {
            warnings.push(SchemaWarning::new(format!("{}.application_point", path), format!("skipped: {}", reason)));
            return None;
        }
    };

    Some(PhysicsForce {
        kind: tag(map, &path, warnings),
        magnitude,
        direction,
        application_point,
    })
}

fn coerce_physics(value: Option<&Value>, warnings: &mut Vec<SchemaWarning>) -> PhysicsSystem {
    let Some(map) = value.and_then(Value::as_object) else {
        warnings.push(SchemaWarning::new("physics", "missing physics section, using an empty one"));
        return PhysicsSystem {
            kind: UNKNOWN_TAG.to_string(),
            properties: Map::new(),
            forces: Vec::new(),
        };
    };

    let forces = match map.get("forces") {
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .filter_map(|(i, f)| coerce_force(i, f, warnings))
            .collect(),
        Some(other) => {
            warnings.push(SchemaWarning::new("physics.forces", format!("ignored: expected an array, got {}", kind_of(other))));
            Vec::new()
        }
        None => Vec::new(),
    };

    PhysicsSystem {
        kind: tag(map, "physics", warnings),
        properties: open_map(map, "properties"),
        forces,
    }
}

fn coerce_interaction(index: usize, value: &Value, warnings: &mut Vec<SchemaWarning>) -> Option<PhysicsInteraction> {
    let path = format!("interactions[{}]", index);

    let Some(map) = value.as_object() else {
        warnings.push(SchemaWarning::new(&path, format!("skipped: expected an object, got {}", kind_of(value))));
        return None;
    };

    let objects = map
        .get("objects")
        .and_then(Value::as_array)
        .map(|ids| {
            ids.iter()
                .filter_map(|id| match id.as_str() {
                    Some(id) => Some(id.to_string()),
                    None => {
                        warnings.push(SchemaWarning::new(format!("{}.objects", path), format!("dropped non-string id ({})", kind_of(id))));
                        None
                    }
                })
                .collect()
        })
        .unwrap_or_default();

    Some(PhysicsInteraction {
        kind: tag(map, &path, warnings),
        objects,
        properties: open_map(map, "properties"),
    })
}

/// Coerce an untrusted JSON value into [`PhysicsModelData`].
///
/// Only a non-object root is fatal. Malformed objects and forces are skipped, missing
/// optional fields are defaulted, and dangling interaction references are kept.
pub fn coerce(value: Value) -> Result<Coerced, SchemaError> {
    let root = match value {
        Value::Object(root) => root,
        other => return Err(SchemaError::NotAnObject { found: kind_of(&other) }),
    };

    let mut warnings = Vec::new();

    let objects = match root.get("objects") {
        Some(Value::Array(items)) => {
            let mut seen = HashSet::new();
            items
                .iter()
                .enumerate()
                .filter_map(|(i, o)| coerce_object(i, o, &mut seen, &mut warnings))
                .collect()
        }
        Some(other) => {
            warnings.push(SchemaWarning::new("objects", format!("ignored: expected an array, got {}", kind_of(other))));
            Vec::new()
        }
        None => {
            warnings.push(SchemaWarning::new("objects", "missing objects list"));
            Vec::new()
        }
    };

    let physics = coerce_physics(root.get("physics"), &mut warnings);

    let interactions = match root.get("interactions") {
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .filter_map(|(i, v)| coerce_interaction(i, v, &mut warnings))
            .collect(),
        Some(other) => {
            warnings.push(SchemaWarning::new("interactions", format!("ignored: expected an array, got {}", kind_of(other))));
            Vec::new()
        }
        None => Vec::new(),
    };

    let model = PhysicsModelData { objects, physics, interactions };

    for id in model.dangling_references() {
        warnings.push(SchemaWarning::new("interactions", format!("references unknown object \"{}\"", id)));
    }

    Ok(Coerced { model, warnings })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cube(id: &str) -> Value {
        json!({
            "id": id,
            "type": "cube",
            "position": [0, 1, 2],
            "rotation": [0, 0, 90],
            "scale": [1, 1, 1],
            "color": "#ff0000",
            "properties": {"mass": 3, "material": "steel"}
        })
    }

    #[test]
    fn well_formed_value_has_no_warnings() {
        let value = serde_json::to_value(crate::model::sample_lever()).unwrap();
        let coerced = coerce(value).unwrap();
        assert!(coerced.warnings.is_empty(), "{:?}", coerced.warnings);
        assert_eq!(coerced.model, crate::model::sample_lever());
    }

    #[test]
    fn extra_properties_survive() {
        let coerced = coerce(json!({"objects": [cube("a")], "physics": {"type": "static"}})).unwrap();
        let object = &coerced.model.objects[0];
        assert_eq!(object.properties.mass, 3.0);
        assert_eq!(object.properties.extra["material"], "steel");
        assert_eq!(object.position, [0.0, 1.0, 2.0]);
    }

    #[test]
    fn rejects_non_object_root() {
        assert_eq!(coerce(json!([1, 2])), Err(SchemaError::NotAnObject { found: "an array" }));
    }

    #[test]
    fn skips_objects_with_bad_tuples() {
        let mut short = cube("short");
        short["position"] = json!([1, 2]);
        let mut texty = cube("texty");
        texty["scale"] = json!(["big", 1, 1]);
        let mut missing = cube("missing");
        missing.as_object_mut().unwrap().remove("rotation");

        let coerced = coerce(json!({
            "objects": [cube("ok"), short, texty, missing],
            "physics": {"type": "test", "forces": []}
        }))
        .unwrap();

        let ids: Vec<_> = coerced.model.objects.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["ok"]);
        assert_eq!(coerced.warnings.len(), 3);
        assert_eq!(coerced.warnings[0].path, "objects[1].position");
    }

    #[test]
    fn skips_duplicate_ids() {
        let coerced = coerce(json!({"objects": [cube("a"), cube("a")], "physics": {"type": "t"}})).unwrap();
        assert_eq!(coerced.model.objects.len(), 1);
        assert!(coerced.warnings[0].message.contains("duplicate"));
    }

    #[test]
    fn fills_missing_optional_fields() {
        let coerced = coerce(json!({
            "objects": [{"id": "bare", "position": [0, 0, 0], "rotation": [0, 0, 0], "scale": [1, 1, 1]}]
        }))
        .unwrap();

        let object = &coerced.model.objects[0];
        assert_eq!(object.kind, DEFAULT_OBJECT_TYPE);
        assert_eq!(object.color, DEFAULT_COLOR);
        assert_eq!(object.properties.mass, 0.0);
        assert_eq!(coerced.model.physics.kind, UNKNOWN_TAG);
        assert!(coerced.model.interactions.is_empty());
    }

    #[test]
    fn skips_bad_forces() {
        let coerced = coerce(json!({
            "objects": [],
            "physics": {
                "type": "incline",
                "forces": [
                    {"type": "gravity", "magnitude": 9.8, "direction": [0, -1, 0], "application_point": [0, 0, 0]},
                    {"type": "applied", "magnitude": -1, "direction": [1, 0, 0], "application_point": [0, 0, 0]},
                    {"type": "friction", "magnitude": 2, "direction": [1, 0], "application_point": [0, 0, 0]},
                    {"magnitude": 1, "direction": [1, 0, 0], "application_point": [0, 0, 0]}
                ]
            }
        }))
        .unwrap();

        let kinds: Vec<_> = coerced.model.physics.forces.iter().map(|f| f.kind.as_str()).collect();
        assert_eq!(kinds, vec!["gravity", UNKNOWN_TAG]);
    }

    #[test]
    fn keeps_dangling_interactions_with_warning() {
        let coerced = coerce(json!({
            "objects": [cube("a")],
            "physics": {"type": "t"},
            "interactions": [{"type": "joint", "objects": ["a", "ghost", 7]}]
        }))
        .unwrap();

        assert_eq!(coerced.model.interactions[0].objects, vec!["a", "ghost"]);
        assert!(coerced.warnings.iter().any(|w| w.message.contains("ghost")));
        assert!(coerced.warnings.iter().any(|w| w.message.contains("non-string")));
    }

    #[test]
    fn out_of_range_numbers_are_skipped() {
        let mut huge = cube("huge");
        huge["position"] = json!([1e39, 0, 0]);
        let coerced = coerce(json!({
            "objects": [huge, cube("ok")],
            "physics": {
                "type": "t",
                "forces": [
                    {"type": "push", "magnitude": 1e39, "direction": [0, 0, 0], "application_point": [0, 0, 0]},
                    {"type": "pull", "magnitude": 1, "direction": [1e39, 0, 0], "application_point": [0, 0, 0]},
                    {"type": "gravity", "magnitude": 9.8, "direction": [0, -1, 0], "application_point": [0, 0, 0]}
                ]
            }
        }))
        .unwrap();

        let ids: Vec<_> = coerced.model.objects.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["ok"]);
        let kinds: Vec<_> = coerced.model.physics.forces.iter().map(|f| f.kind.as_str()).collect();
        assert_eq!(kinds, vec!["gravity"]);

        let paths: Vec<_> = coerced.warnings.iter().map(|w| w.path.as_str()).collect();
        assert!(paths.contains(&"objects[0].position"), "{:?}", paths);
        assert!(paths.contains(&"physics.forces[0].magnitude"), "{:?}", paths);
        assert!(paths.contains(&"physics.forces[1].direction"), "{:?}", paths);
    }

    #[test]
    fn coerced_model_renders_identically_twice() {
        let mut huge = cube("huge");
        huge["scale"] = json!([1, 1e39, 1]);
        let coerced = coerce(json!({"objects": [huge, cube("a")], "physics": {"type": "t"}})).unwrap();

        let model = coerced.model;
        assert_eq!(crate::scene::render(&model), crate::scene::render(&model));
    }
}
