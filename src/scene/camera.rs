//! Perspective camera and orbit-style interactive controls.

use glam::{Mat4, Vec2, Vec3};

pub const DEFAULT_CAMERA_POSITION: Vec3 = Vec3::new(5.0, 5.0, 5.0);

#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    /// Fixed vantage point looking at the origin
    fn default() -> Self {
        Self {
            position: DEFAULT_CAMERA_POSITION,
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl Camera {
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y_degrees.to_radians(), aspect, self.near, self.far)
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    pub fn distance(&self) -> f32 {
        (self.position - self.target).length()
    }

    /// Project a world-space point to viewport pixels (origin top-left).
    ///
    /// Returns `None` for points behind the near plane.
    pub fn project(&self, view_projection: &Mat4, point: Vec3, viewport: Vec2) -> Option<Vec2> {
        let clip = *view_projection * point.extend(1.0);
        if clip.w <= self.near * 0.5 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        Some(Vec2::new(
            (ndc.x + 1.0) * 0.5 * viewport.x,
            (1.0 - ndc.y) * 0.5 * viewport.y,
        ))
    }
}

/// Rotate / zoom / pan around the camera target
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitControls {
    pub enable_rotate: bool,
    pub enable_zoom: bool,
    pub enable_pan: bool,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            enable_rotate: true,
            enable_zoom: true,
            enable_pan: true,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            min_distance: 0.5,
            max_distance: 500.0,
        }
    }
}

const POLAR_EPSILON: f32 = 1e-3;

impl OrbitControls {
    /// Orbit by a pointer drag of `delta` pixels in a viewport `viewport_height` tall
    pub fn rotate(&self, camera: &mut Camera, delta: Vec2, viewport_height: f32) {
        if !self.enable_rotate || viewport_height <= 0.0 {
            return;
        }

        let offset = camera.position - camera.target;
        let radius = offset.length();
        if radius == 0.0 {
            return;
        }

        let mut theta = offset.x.atan2(offset.z);
        let mut phi = (offset.y / radius).clamp(-1.0, 1.0).acos();

        let scale = std::f32::consts::TAU * self.rotate_speed / viewport_height;
        theta -= delta.x * scale;
        phi = (phi - delta.y * scale).clamp(POLAR_EPSILON, std::f32::consts::PI - POLAR_EPSILON);

        camera.position = camera.target
            + Vec3::new(
                radius * phi.sin() * theta.sin(),
                radius * phi.cos(),
                radius * phi.sin() * theta.cos(),
            );
    }

    /// Dolly toward (positive `steps`) or away from the target
    pub fn zoom(&self, camera: &mut Camera, steps: f32) {
        if !self.enable_zoom {
            return;
        }

        let offset = camera.position - camera.target;
        let radius = offset.length();
        if radius == 0.0 {
            return;
        }

        let scale = 0.95_f32.powf(steps * self.zoom_speed);
        let new_radius = (radius * scale).clamp(self.min_distance, self.max_distance);
        camera.position = camera.target + offset * (new_radius / radius);
    }

    /// Slide camera and target together in the view plane
    pub fn pan(&self, camera: &mut Camera, delta: Vec2, viewport_height: f32) {
        if !self.enable_pan || viewport_height <= 0.0 {
            return;
        }

        let forward = (camera.target - camera.position).normalize_or_zero();
        let right = forward.cross(camera.up).normalize_or_zero();
        let up = right.cross(forward);

        let half_fov = camera.fov_y_degrees.to_radians() / 2.0;
        let units_per_pixel = 2.0 * camera.distance() * half_fov.tan() / viewport_height;

        let shift = (-delta.x * right + delta.y * up) * units_per_pixel;
        camera.position += shift;
        camera.target += shift;
    }
}
