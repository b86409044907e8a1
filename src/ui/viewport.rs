//! 3D viewport: paints the [`SceneGraph`] as a projected, lit wireframe with egui's
//! painter and maps pointer input onto the orbit controls.

use eframe::egui;
use egui::{Align2, Color32, FontId, PointerButton, Pos2, Sense, Stroke};
use glam::{Mat4, Vec3};

use crate::model::PhysicsModelData;
use crate::scene::{self, light, Camera, MaterialKind, SceneGraph, SceneOptions};
use crate::ui::components::show_spinner_with_text;
use crate::ui::UiState;
use crate::utils::Color;

const MIN_CANVAS_HEIGHT: f32 = 240.0;
const SCROLL_PER_ZOOM_STEP: f32 = 50.0;

/// Scene built for the shell's current model, rebuilt whenever the model changes
pub struct ViewportState {
    options: SceneOptions,
    scene: Option<SceneGraph>,
    generation: u64,
}

impl ViewportState {
    pub fn new(options: SceneOptions) -> Self {
        Self { options, scene: None, generation: 0 }
    }

    fn sync(&mut self, model: Option<&PhysicsModelData>, generation: u64) {
        match model {
            None => self.scene = None,
            Some(model) if self.scene.is_none() || self.generation != generation => {
                self.scene = Some(scene::render_with(model, &self.options));
                self.generation = generation;
            }
            Some(_) => {}
        }
    }
}

pub fn show_viewport(ctx: &egui::Context, ui_state: &mut UiState) {
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.heading("3D Physics Model");
        ui.add_space(6.0);

        if ui_state.shell.is_analyzing() {
            ui.centered_and_justified(|ui| show_spinner_with_text(ui, "Analyzing diagram..."));
            return;
        }

        ui_state.viewport.sync(ui_state.shell.model(), ui_state.shell.model_generation());

        match (ui_state.shell.model(), ui_state.viewport.scene.as_mut()) {
            (Some(model), Some(scene)) => {
                paint_scene(ui, scene);
                show_properties(ui, model, scene);
            }
            _ => show_placeholder(ui),
        }
    });
}

fn show_placeholder(ui: &mut egui::Ui) {
    ui.vertical_centered(|ui| {
        ui.add_space(120.0);
        ui.label(egui::RichText::new("No 3D Model Yet").size(18.0).strong());
        ui.add_space(6.0);
        ui.label(
            "Upload a physics diagram and click \"Analyze with Gemini\" to generate a 3D model, \
             or click \"Use Sample Data\" to see an example.",
        );
    });
}

fn show_properties(ui: &mut egui::Ui, model: &PhysicsModelData, scene: &mut SceneGraph) {
    ui.add_space(8.0);
    egui::Frame::group(ui.style()).inner_margin(10.0).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.horizontal(|ui| {
            ui.strong("Physics Properties");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Reset view").clicked() {
                    scene.camera = Camera::default();
                }
            });
        });
        ui.label(format!("Type: {}", model.physics.kind));
        ui.label(format!("Objects: {}", model.objects.len()));
        if !model.physics.forces.is_empty() {
            ui.label(format!("Forces: {}", model.physics.forces.len()));
        }
        if scene.interaction_count > 0 {
            ui.label(format!("Interactions: {}", scene.interaction_count));
        }
        ui.label(
            egui::RichText::new("Tip: drag to rotate, scroll to zoom, right-drag to pan.").weak(),
        );
    });
}

fn paint_scene(ui: &mut egui::Ui, scene: &mut SceneGraph) {
    let height = (ui.available_height() - 140.0).max(MIN_CANVAS_HEIGHT);
    let (response, painter) =
        ui.allocate_painter(egui::vec2(ui.available_width(), height), Sense::click_and_drag());
    let rect = response.rect;

    let delta = response.drag_delta();
    let delta = glam::Vec2::new(delta.x, delta.y);
    if response.dragged_by(PointerButton::Primary) {
        scene.controls.rotate(&mut scene.camera, delta, rect.height());
    } else if response.dragged_by(PointerButton::Secondary) {
        scene.controls.pan(&mut scene.camera, delta, rect.height());
    }
    if response.hovered() {
        let scroll = ui.input(|i| i.smooth_scroll_delta.y);
        if scroll != 0.0 {
            scene.controls.zoom(&mut scene.camera, scroll / SCROLL_PER_ZOOM_STEP);
        }
    }

    painter.rect_filled(rect, 4.0, ui.visuals().extreme_bg_color);

    let projector = Projector {
        camera: &scene.camera,
        view_projection: scene.camera.view_projection(rect.aspect_ratio()),
        rect,
    };

    let (minor, section) = if ui.visuals().dark_mode {
        (Color32::from_gray(60), Color32::from_gray(110))
    } else {
        (Color32::from_gray(215), Color32::from_gray(150))
    };
    for (a, b, is_section) in scene.grid.lines() {
        let color = if is_section { section } else { minor };
        projector.segment(&painter, a, b, Stroke::new(1.0, color));
    }

    for mesh in &scene.meshes {
        let matrix = mesh.transform.matrix();
        let center = mesh.transform.translation;
        let wireframe = mesh.primitive.wireframe();

        for (a, b) in wireframe.segments() {
            let a = matrix.transform_point3(a);
            let b = matrix.transform_point3(b);
            let color = match mesh.material.kind {
                MaterialKind::Standard => {
                    let normal = (a + b) * 0.5 - center;
                    light::shade(mesh.material.color, normal, &scene.lights)
                }
                MaterialKind::Basic => mesh.material.color,
            };
            projector.segment(&painter, a, b, Stroke::new(1.5, to_color32(color)));
        }

        if let Some(anchor) = projector.point(center) {
            painter.text(
                anchor + egui::vec2(6.0, -6.0),
                Align2::LEFT_BOTTOM,
                &mesh.key,
                FontId::proportional(11.0),
                ui.visuals().weak_text_color(),
            );
        }
    }

    for glyph in &scene.force_glyphs {
        let color = to_color32(glyph.color);
        projector.segment(&painter, glyph.start, glyph.end, Stroke::new(2.0, color));

        let head = glyph.head_transform.matrix();
        for (a, b) in glyph.head.wireframe().segments() {
            projector.segment(&painter, head.transform_point3(a), head.transform_point3(b), Stroke::new(1.0, color));
        }

        if let Some(tip) = projector.point(glyph.end) {
            painter.text(
                tip + egui::vec2(4.0, 0.0),
                Align2::LEFT_CENTER,
                format!("{} ({:.1})", glyph.label, glyph.magnitude),
                FontId::proportional(11.0),
                color,
            );
        }
    }
}

struct Projector<'a> {
    camera: &'a Camera,
    view_projection: Mat4,
    rect: egui::Rect,
}

impl Projector<'_> {
    fn point(&self, p: Vec3) -> Option<Pos2> {
        let viewport = glam::Vec2::new(self.rect.width(), self.rect.height());
        self.camera
            .project(&self.view_projection, p, viewport)
            .map(|s| self.rect.min + egui::vec2(s.x, s.y))
    }

    /// Segments with an endpoint behind the camera are skipped
    fn segment(&self, painter: &egui::Painter, a: Vec3, b: Vec3, stroke: Stroke) {
        if let (Some(a), Some(b)) = (self.point(a), self.point(b)) {
            painter.line_segment([a, b], stroke);
        }
    }
}

fn to_color32(color: Color) -> Color32 {
    let [r, g, b] = color.to_rgb8();
    Color32::from_rgb(r, g, b)
}
