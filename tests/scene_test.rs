use diagram3d::model::{sample_lever, ObjectProperties, PhysicsForce, PhysicsModelData, PhysicsObject, PhysicsSystem};
use diagram3d::scene::{self, force_endpoint, ArrowheadMode, Camera, Light, MaterialKind, Primitive, SceneOptions};
use diagram3d::utils::math::radians_to_degrees;
use diagram3d::utils::Color;
use glam::Vec3;

fn object(id: &str, kind: &str, rotation: [f32; 3]) -> PhysicsObject {
    PhysicsObject {
        id: id.to_string(),
        kind: kind.to_string(),
        position: [1.0, 2.0, 3.0],
        rotation,
        scale: [1.0, 1.0, 1.0],
        color: "#ff0000".to_string(),
        properties: ObjectProperties::with_mass(1.0),
    }
}

fn single(object: PhysicsObject) -> PhysicsModelData {
    PhysicsModelData {
        objects: vec![object],
        physics: PhysicsSystem {
            kind: "test".to_string(),
            properties: Default::default(),
            forces: vec![],
        },
        interactions: vec![],
    }
}

#[test]
fn render_is_pure() {
    let model = sample_lever();
    let before = model.clone();

    let first = scene::render(&model);
    let second = scene::render(&model);

    assert_eq!(first, second);
    assert_eq!(model, before);
}

#[test]
fn one_mesh_per_object_one_arrow_per_force() {
    let graph = scene::render(&sample_lever());
    assert_eq!(graph.meshes.len(), 3);
    assert_eq!(graph.force_glyphs.len(), 2);
    assert_eq!(graph.interaction_count, 1);

    let fulcrum = graph.mesh("fulcrum").unwrap();
    assert!(matches!(fulcrum.primitive, Primitive::Cone { .. }));
    assert_eq!(fulcrum.material.kind, MaterialKind::Standard);
    assert_eq!(fulcrum.material.color, Color::from_rgb8(0x3a, 0x3a, 0x3a));
}

#[test]
fn rotation_degrees_become_radians() {
    let graph = scene::render(&single(object("a", "sphere", [90.0, 180.0, -45.0])));
    let rotation = graph.mesh("a").unwrap().transform.rotation;

    assert!((rotation.x - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    assert!((rotation.y - std::f32::consts::PI).abs() < 1e-6);
    assert!((rotation.z + std::f32::consts::FRAC_PI_4).abs() < 1e-6);

    let back = [rotation.x, rotation.y, rotation.z].map(radians_to_degrees);
    for (got, want) in back.iter().zip([90.0, 180.0, -45.0]) {
        assert!((got - want).abs() < 1e-4, "{} != {}", got, want);
    }
}

#[test]
fn gravity_arrow_ends_below_application_point() {
    let gravity = PhysicsForce {
        kind: "gravity".to_string(),
        magnitude: 9.8,
        direction: [0.0, -1.0, 0.0],
        application_point: [0.0, 0.0, 0.0],
    };

    let end = force_endpoint(&gravity);
    assert!((end - Vec3::new(0.0, -9.8, 0.0)).length() < 1e-5);

    let graph = scene::render(&sample_lever());
    let glyph = &graph.force_glyphs[0];
    assert_eq!(glyph.color, Color::RED);
    assert!(matches!(glyph.head, Primitive::Cone { radius, height, radial_segments: 8 } if radius == 0.1 && height == 0.3));
    assert_eq!(glyph.head_transform.translation, glyph.end);
}

#[test]
fn unknown_type_falls_back_to_unit_box() {
    let graph = scene::render(&single(object("ring", "torus", [0.0; 3])));
    let mesh = graph.mesh("ring").unwrap();

    assert!(mesh.fallback);
    assert_eq!(mesh.primitive, Primitive::UNIT_BOX);
    assert_eq!(mesh.transform.translation, Vec3::new(1.0, 2.0, 3.0));
}

#[test]
fn unparseable_color_renders_grey() {
    let mut obj = object("a", "box", [0.0; 3]);
    obj.color = "not-a-color".to_string();
    let graph = scene::render(&single(obj));
    assert_eq!(graph.mesh("a").unwrap().material.color, Color::GREY);
}

#[test]
fn every_render_starts_from_the_default_camera() {
    let model = sample_lever();
    let mut graph = scene::render(&model);
    graph.controls.rotate(&mut graph.camera, glam::Vec2::new(120.0, 40.0), 600.0);
    graph.controls.zoom(&mut graph.camera, 3.0);
    assert_ne!(graph.camera, Camera::default());

    let fresh = scene::render(&model);
    assert_eq!(fresh.camera, Camera::default());
    assert_eq!(fresh.camera.position, Vec3::new(5.0, 5.0, 5.0));
    assert_eq!(fresh.camera.target, Vec3::ZERO);
}

#[test]
fn fixed_lights_and_grid() {
    let graph = scene::render(&sample_lever());
    assert_eq!(graph.lights.len(), 2);
    assert!(matches!(graph.lights[0], Light::Ambient { intensity, .. } if intensity == 0.5));
    assert!(matches!(
        graph.lights[1],
        Light::Directional { position, intensity, .. } if position == Vec3::new(10.0, 10.0, 5.0) && intensity == 1.0
    ));
    assert_eq!(graph.grid.height, -0.01);
    assert!(!graph.grid.lines().is_empty());
}

#[test]
fn arrowhead_mode_is_an_option() {
    let model = sample_lever();
    let planar = scene::render(&model);
    let aligned = scene::render_with(&model, &SceneOptions { arrowhead: ArrowheadMode::Aligned });

    // Gravity points straight down: planar spins about Z, aligned flips the cone
    let planar_rot = planar.force_glyphs[0].head_transform.rotation;
    let aligned_tip = aligned.force_glyphs[0].head_transform.rotation_quat() * Vec3::Y;
    assert_eq!((planar_rot.x, planar_rot.y), (0.0, 0.0));
    assert!((aligned_tip - Vec3::NEG_Y).length() < 1e-4);
}
