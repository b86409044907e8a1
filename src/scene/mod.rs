//! Declarative mapping from [`PhysicsModelData`] to a renderable scene graph.
//!
//! [`render`] is a pure function: it allocates a fresh camera (which is how the view is
//! reset for every new model), the fixed lights and grid, one mesh per object and one
//! arrow per force. Interactions are counted but have no visual representation.

use glam::{EulerRot, Mat4, Quat, Vec3};
use tracing::{debug, warn};

use crate::model::{PhysicsModelData, PhysicsObject};
use crate::utils::math::euler_degrees_to_radians;
use crate::utils::Color;

pub mod camera;
pub mod glyph;
pub mod light;
pub mod primitives;

pub use camera::{Camera, OrbitControls};
pub use glyph::{force_endpoint, force_glyph, ArrowheadMode, ForceGlyph};
pub use light::Light;
pub use primitives::{Primitive, Wireframe};

pub const DIRECTIONAL_LIGHT_POSITION: Vec3 = Vec3::new(10.0, 10.0, 5.0);

/// Translation, Euler rotation in radians (XYZ order) and scale
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Transform {
    pub fn rotation_quat(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation_quat(), self.translation)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialKind {
    /// Lit by the scene lights
    Standard,
    /// Flat color, ignores lights
    Basic,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub color: Color,
    pub kind: MaterialKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MeshNode {
    /// Object id, used as the rendering key
    pub key: String,
    pub primitive: Primitive,
    /// `true` when the object's type tag was not recognized and a unit box stands in
    pub fallback: bool,
    pub transform: Transform,
    pub material: Material,
}

/// Ground reference grid in the XZ plane
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub height: f32,
    pub cell_size: f32,
    pub section_size: f32,
    pub half_extent: f32,
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            height: -0.01,
            cell_size: 0.5,
            section_size: 1.0,
            half_extent: 10.0,
        }
    }
}

impl Grid {
    /// Grid lines as `(start, end, is_section_line)`
    pub fn lines(&self) -> Vec<(Vec3, Vec3, bool)> {
        let count = (self.half_extent / self.cell_size).round() as i32;
        let ratio = (self.section_size / self.cell_size).round().max(1.0) as i32;
        let e = self.half_extent;
        let y = self.height;

        (-count..=count)
            .flat_map(|i| {
                let offset = i as f32 * self.cell_size;
                let section = i % ratio == 0;
                [
                    (Vec3::new(offset, y, -e), Vec3::new(offset, y, e), section),
                    (Vec3::new(-e, y, offset), Vec3::new(e, y, offset), section),
                ]
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneOptions {
    pub arrowhead: ArrowheadMode,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneGraph {
    pub camera: Camera,
    pub controls: OrbitControls,
    pub lights: Vec<Light>,
    pub grid: Grid,
    pub meshes: Vec<MeshNode>,
    pub force_glyphs: Vec<ForceGlyph>,
    /// Interactions present in the model; none are drawn
    pub interaction_count: usize,
}

impl SceneGraph {
    pub fn mesh(&self, key: &str) -> Option<&MeshNode> {
        self.meshes.iter().find(|m| m.key == key)
    }
}

fn mesh_node(object: &PhysicsObject) -> MeshNode {
    let (primitive, fallback) = match Primitive::for_type(&object.kind) {
        Some(primitive) => (primitive, false),
        None => {
            debug!("Object {} has unrecognized type {:?}, drawing a box", object.id, object.kind);
            (Primitive::UNIT_BOX, true)
        }
    };

    let color = Color::parse(&object.color).unwrap_or_else(|e| {
        warn!("Object {}: {}, using grey", object.id, e);
        Color::GREY
    });

    MeshNode {
        key: object.id.clone(),
        primitive,
        fallback,
        transform: Transform {
            translation: Vec3::from(object.position),
            rotation: euler_degrees_to_radians(object.rotation),
            scale: Vec3::from(object.scale),
        },
        material: Material { color, kind: MaterialKind::Standard },
    }
}

pub fn render(model: &PhysicsModelData) -> SceneGraph {
    render_with(model, &SceneOptions::default())
}

pub fn render_with(model: &PhysicsModelData, options: &SceneOptions) -> SceneGraph {
    SceneGraph {
        camera: Camera::default(),
        controls: OrbitControls::default(),
        lights: vec![
            Light::ambient(0.5),
            Light::directional(DIRECTIONAL_LIGHT_POSITION, 1.0),
        ],
        grid: Grid::default(),
        meshes: model.objects.iter().map(mesh_node).collect(),
        force_glyphs: model
            .physics
            .forces
            .iter()
            .map(|f| force_glyph(f, options.arrowhead))
            .collect(),
        interaction_count: model.interactions.len(),
    }
}
