/// Instruction sent alongside every diagram. The JSON shape is load-bearing: field names
/// and nesting must match [`crate::model::PhysicsModelData`].
pub const DIAGRAM_PROMPT: &str = r#"
Analyze this physics diagram and provide detailed information for creating a 3D model:
1. Identify all objects and their physical properties (size, shape, mass if indicated)
2. Identify physical concepts shown (levers, forces, etc.)
3. Provide exact measurements and positions for all objects
4. Describe how objects interact with each other
5. Format the response as a JSON object with the following structure:
{
  "objects": [
    {
      "id": "unique_id",
      "type": "cube|sphere|cylinder|etc",
      "position": [x, y, z],
      "rotation": [x, y, z],
      "scale": [x, y, z],
      "color": "hexcolor",
      "properties": {
        "mass": number,
        "other_relevant_properties": values
      }
    }
  ],
  "physics": {
    "type": "lever|pendulum|etc",
    "properties": {
      "relevant_properties": values
    },
    "forces": [
      {
        "type": "gravity|applied|etc",
        "magnitude": number,
        "direction": [x, y, z],
        "application_point": [x, y, z]
      }
    ]
  },
  "interactions": [
    {
      "type": "collision|joint|etc",
      "objects": ["object_id1", "object_id2"],
      "properties": {
        "relevant_properties": values
      }
    }
  ]
}
"#;

#[cfg(test)]
mod tests {
    use super::DIAGRAM_PROMPT;

    #[test]
    fn prompt_names_every_schema_field() {
        for field in [
            "\"objects\"", "\"id\"", "\"type\"", "\"position\"", "\"rotation\"", "\"scale\"",
            "\"color\"", "\"mass\"", "\"physics\"", "\"forces\"", "\"magnitude\"",
            "\"direction\"", "\"application_point\"", "\"interactions\"",
        ] {
            assert!(DIAGRAM_PROMPT.contains(field), "prompt is missing {}", field);
        }
    }
}
