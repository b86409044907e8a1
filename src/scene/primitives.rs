//! Geometric primitives selected by an object's `type` tag.
//!
//! Conventions follow the usual Y-up scene layout: every primitive is centered on its
//! local origin, cylinders and cones extend along Y from `-height/2` to `+height/2`
//! (cone apex on top) and planes lie in the XY plane facing +Z.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

/// Segment count cap used when tessellating for the wireframe viewport.
pub const WIREFRAME_MAX_SEGMENTS: u32 = 16;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    Box { width: f32, height: f32, depth: f32 },
    Sphere { radius: f32, width_segments: u32, height_segments: u32 },
    Cylinder { radius_top: f32, radius_bottom: f32, height: f32, radial_segments: u32 },
    Cone { radius: f32, height: f32, radial_segments: u32 },
    Plane { width: f32, height: f32 },
}

impl Primitive {
    pub const UNIT_BOX: Primitive = Primitive::Box { width: 1.0, height: 1.0, depth: 1.0 };

    /// Default primitive for a recognized type tag (case-insensitive)
    pub fn for_type(tag: &str) -> Option<Primitive> {
        match tag.trim().to_lowercase().as_str() {
            "cube" | "box" => Some(Self::UNIT_BOX),
            "sphere" => Some(Primitive::Sphere { radius: 0.5, width_segments: 32, height_segments: 32 }),
            "cylinder" => Some(Primitive::Cylinder {
                radius_top: 0.5,
                radius_bottom: 0.5,
                height: 1.0,
                radial_segments: 32,
            }),
            "cone" => Some(Primitive::Cone { radius: 0.5, height: 1.0, radial_segments: 32 }),
            "plane" => Some(Primitive::Plane { width: 1.0, height: 1.0 }),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Primitive::Box { .. } => "box",
            Primitive::Sphere { .. } => "sphere",
            Primitive::Cylinder { .. } => "cylinder",
            Primitive::Cone { .. } => "cone",
            Primitive::Plane { .. } => "plane",
        }
    }

    pub fn wireframe(&self) -> Wireframe {
        match *self {
            Primitive::Box { width, height, depth } => box_wireframe(width, height, depth),
            Primitive::Sphere { radius, width_segments, height_segments } => sphere_wireframe(
                radius,
                width_segments.clamp(3, WIREFRAME_MAX_SEGMENTS),
                height_segments.clamp(2, WIREFRAME_MAX_SEGMENTS),
            ),
            Primitive::Cylinder { radius_top, radius_bottom, height, radial_segments } => cylinder_wireframe(
                radius_top,
                radius_bottom,
                height,
                radial_segments.clamp(3, WIREFRAME_MAX_SEGMENTS),
            ),
            Primitive::Cone { radius, height, radial_segments } => {
                cone_wireframe(radius, height, radial_segments.clamp(3, WIREFRAME_MAX_SEGMENTS))
            }
            Primitive::Plane { width, height } => plane_wireframe(width, height),
        }
    }
}

/// Line-list geometry in local space
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Wireframe {
    pub vertices: Vec<Vec3>,
    pub edges: Vec<[u32; 2]>,
}

impl Wireframe {
    fn push(&mut self, v: Vec3) -> u32 {
        self.vertices.push(v);
        (self.vertices.len() - 1) as u32
    }

    fn ring(&mut self, y: f32, radius: f32, segments: u32) -> u32 {
        let first = self.vertices.len() as u32;
        for i in 0..segments {
            let theta = TAU * i as f32 / segments as f32;
            self.push(Vec3::new(radius * theta.sin(), y, radius * theta.cos()));
        }
        for i in 0..segments {
            self.edges.push([first + i, first + (i + 1) % segments]);
        }
        first
    }

    /// Segment endpoints, resolved
    pub fn segments(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        self.edges
            .iter()
            .map(|[a, b]| (self.vertices[*a as usize], self.vertices[*b as usize]))
    }
}

fn box_wireframe(width: f32, height: f32, depth: f32) -> Wireframe {
    let (hx, hy, hz) = (width / 2.0, height / 2.0, depth / 2.0);
    let mut wf = Wireframe::default();
    for i in 0..8u32 {
        let sx = if i & 1 == 0 { -hx } else { hx };
        let sy = if i & 2 == 0 { -hy } else { hy };
        let sz = if i & 4 == 0 { -hz } else { hz };
        wf.push(Vec3::new(sx, sy, sz));
    }
    // Corners differing in exactly one bit share an edge.
    for a in 0..8u32 {
        for bit in [1, 2, 4] {
            let b = a | bit;
            if b != a {
                wf.edges.push([a, b]);
            }
        }
    }
    wf
}

fn sphere_wireframe(radius: f32, width_segments: u32, height_segments: u32) -> Wireframe {
    let mut wf = Wireframe::default();
    let columns = width_segments;

    for row in 0..=height_segments {
        let phi = PI * row as f32 / height_segments as f32;
        for col in 0..columns {
            let theta = TAU * col as f32 / columns as f32;
            wf.push(Vec3::new(
                -radius * theta.cos() * phi.sin(),
                radius * phi.cos(),
                radius * theta.sin() * phi.sin(),
            ));
        }
    }

    let index = |row: u32, col: u32| row * columns + col % columns;
    for row in 0..=height_segments {
        for col in 0..columns {
            // Latitude rings, skipping the degenerate poles
            if row > 0 && row < height_segments {
                wf.edges.push([index(row, col), index(row, col + 1)]);
            }
            if row < height_segments {
                wf.edges.push([index(row, col), index(row + 1, col)]);
            }
        }
    }
    wf
}

fn cylinder_wireframe(radius_top: f32, radius_bottom: f32, height: f32, segments: u32) -> Wireframe {
    let mut wf = Wireframe::default();
    let top = wf.ring(height / 2.0, radius_top, segments);
    let bottom = wf.ring(-height / 2.0, radius_bottom, segments);
    for i in 0..segments {
        wf.edges.push([top + i, bottom + i]);
    }
    wf
}

fn cone_wireframe(radius: f32, height: f32, segments: u32) -> Wireframe {
    let mut wf = Wireframe::default();
    let base = wf.ring(-height / 2.0, radius, segments);
    let apex = wf.push(Vec3::new(0.0, height / 2.0, 0.0));
    for i in 0..segments {
        wf.edges.push([apex, base + i]);
    }
    wf
}

fn plane_wireframe(width: f32, height: f32) -> Wireframe {
    let (hx, hy) = (width / 2.0, height / 2.0);
    let mut wf = Wireframe::default();
    for (x, y) in [(-hx, -hy), (hx, -hy), (hx, hy), (-hx, hy)] {
        wf.push(Vec3::new(x, y, 0.0));
    }
    wf.edges.extend([[0, 1], [1, 2], [2, 3], [3, 0]]);
    wf
}
