use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::primitives::Primitive;
use super::Transform;
use crate::model::PhysicsForce;
use crate::utils::Color;

pub const ARROWHEAD: Primitive = Primitive::Cone { radius: 0.1, height: 0.3, radial_segments: 8 };

/// How the cone at the tip of a force arrow is oriented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrowheadMode {
    /// Rotate about Z only by `atan2(y, x)`. Arrows with a large Z component get a
    /// misleading head.
    #[default]
    Planar,
    /// Rotate the cone's +Y axis onto the force direction.
    Aligned,
}

/// Static arrow marking a force: shaft from `start` to `end`, cone head at `end`
#[derive(Debug, Clone, PartialEq)]
pub struct ForceGlyph {
    pub label: String,
    pub magnitude: f32,
    pub start: Vec3,
    pub end: Vec3,
    pub color: Color,
    pub head: Primitive,
    pub head_transform: Transform,
}

/// `application_point + normalize(direction) * magnitude`; a zero direction yields a
/// zero-length arrow
pub fn force_endpoint(force: &PhysicsForce) -> Vec3 {
    Vec3::from(force.application_point) + force_vector(force)
}

fn force_vector(force: &PhysicsForce) -> Vec3 {
    Vec3::from(force.direction).normalize_or_zero() * force.magnitude
}

fn head_rotation(vector: Vec3, mode: ArrowheadMode) -> Vec3 {
    match mode {
        ArrowheadMode::Planar => Vec3::new(0.0, 0.0, vector.y.atan2(vector.x)),
        ArrowheadMode::Aligned => {
            let dir = vector.normalize_or_zero();
            if dir == Vec3::ZERO {
                return Vec3::ZERO;
            }
            let (x, y, z) = Quat::from_rotation_arc(Vec3::Y, dir).to_euler(EulerRot::XYZ);
            Vec3::new(x, y, z)
        }
    }
}

pub fn force_glyph(force: &PhysicsForce, mode: ArrowheadMode) -> ForceGlyph {
    let start = Vec3::from(force.application_point);
    let end = force_endpoint(force);

    ForceGlyph {
        label: force.kind.clone(),
        magnitude: force.magnitude,
        start,
        end,
        color: Color::RED,
        head: ARROWHEAD,
        head_transform: Transform {
            translation: end,
            rotation: head_rotation(force_vector(force), mode),
            scale: Vec3::ONE,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn force(magnitude: f32, direction: [f32; 3]) -> PhysicsForce {
        PhysicsForce {
            kind: "applied".to_string(),
            magnitude,
            direction,
            application_point: [1.0, 2.0, 3.0],
        }
    }

    #[test]
    fn direction_is_normalized_before_scaling() {
        let end = force_endpoint(&force(2.0, [0.0, 0.0, 10.0]));
        assert_eq!(end, Vec3::new(1.0, 2.0, 5.0));
    }

    #[test]
    fn zero_direction_collapses_to_start() {
        let glyph = force_glyph(&force(4.0, [0.0, 0.0, 0.0]), ArrowheadMode::Planar);
        assert_eq!(glyph.start, glyph.end);
        assert_eq!(glyph.head_transform.rotation, Vec3::ZERO);
    }

    #[test]
    fn planar_head_rotates_about_z_only() {
        let glyph = force_glyph(&force(1.0, [0.0, 1.0, 0.0]), ArrowheadMode::Planar);
        let r = glyph.head_transform.rotation;
        assert_eq!((r.x, r.y), (0.0, 0.0));
        assert!((r.z - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn aligned_head_points_along_force() {
        for direction in [[0.0, 0.0, 1.0], [1.0, -1.0, 0.5], [0.0, -1.0, 0.0]] {
            let glyph = force_glyph(&force(3.0, direction), ArrowheadMode::Aligned);
            let tip = glyph.head_transform.rotation_quat() * Vec3::Y;
            let expected = Vec3::from(direction).normalize();
            assert!((tip - expected).length() < 1e-4, "{:?} -> {:?}", direction, tip);
        }
    }
}
