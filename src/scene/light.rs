use glam::Vec3;

use crate::utils::Color;

#[derive(Debug, Clone, PartialEq)]
pub enum Light {
    Ambient { color: Color, intensity: f32 },
    Directional { position: Vec3, color: Color, intensity: f32 },
}

impl Light {
    pub fn ambient(intensity: f32) -> Self {
        Light::Ambient { color: Color { r: 1.0, g: 1.0, b: 1.0 }, intensity }
    }

    pub fn directional(position: Vec3, intensity: f32) -> Self {
        Light::Directional { position, color: Color { r: 1.0, g: 1.0, b: 1.0 }, intensity }
    }

    /// Lambert contribution for a surface facing `normal`
    pub fn contribution(&self, normal: Vec3) -> f32 {
        match self {
            Light::Ambient { intensity, .. } => *intensity,
            // Directional lights shine from `position` toward the origin.
            Light::Directional { position, intensity, .. } => {
                let to_light = position.normalize_or_zero();
                intensity * normal.normalize_or_zero().dot(to_light).max(0.0)
            }
        }
    }
}

/// Shade a base color under all lights, clamped to displayable range
pub fn shade(base: Color, normal: Vec3, lights: &[Light]) -> Color {
    let factor: f32 = lights.iter().map(|l| l.contribution(normal)).sum();
    Color {
        r: (base.r * factor).min(1.0),
        g: (base.g * factor).min(1.0),
        b: (base.b * factor).min(1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn back_faces_get_ambient_only() {
        let lights = [Light::ambient(0.5), Light::directional(Vec3::new(0.0, 10.0, 0.0), 1.0)];
        let lit = shade(Color::GREY, Vec3::Y, &lights);
        let unlit = shade(Color::GREY, -Vec3::Y, &lights);
        assert!(lit.r > unlit.r);
        assert!((unlit.r - Color::GREY.r * 0.5).abs() < 1e-6);
    }
}
