use eframe::egui;
use egui::{RichText, Vec2};

use crate::ui::components::{
    error_banner, form_section, BannerAction, ButtonStyle, FormField, StatusMessage, StyledButton,
};
use crate::ui::{KeyStatus, UiState};

const PREVIEW_HEIGHT: f32 = 192.0;
const API_KEY_URL: &str = "https://ai.google.dev/";

pub fn show_controls(ctx: &egui::Context, ui_state: &mut UiState) {
    egui::SidePanel::left("controls")
        .resizable(true)
        .default_width(340.0)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.add_space(8.0);
                ui.heading("Physics Visualizer");
                ui.label("Upload a physics diagram and see it as a 3D model.");
                ui.add_space(12.0);

                form_section(ui, "1. Enter API Key", |ui| show_api_key(ui, ui_state));
                ui.add_space(8.0);
                form_section(ui, "2. Upload Physics Diagram", |ui| show_upload(ctx, ui, ui_state));
                ui.add_space(8.0);
                form_section(ui, "3. Generate 3D Model", |ui| show_actions(ui, ui_state));
            });
        });
}

fn show_api_key(ui: &mut egui::Ui, ui_state: &mut UiState) {
    let masked = !ui_state.show_api_key;
    let response = FormField::new("Gemini API key:", &mut ui_state.api_key_input)
        .password(masked)
        .placeholder("Paste your API key")
        .show(ui);
    if response.changed() {
        ui_state.api_key_edited();
    }
    ui.horizontal(|ui| {
        ui.checkbox(&mut ui_state.show_api_key, "Show key");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.hyperlink_to("Get an API key", API_KEY_URL);
        });
    });

    ui.horizontal(|ui| {
        let has_input = !ui_state.api_key_input.trim().is_empty();
        if StyledButton::new("Save").enabled(has_input).show(ui).clicked() {
            ui_state.save_api_key();
        }
        if StyledButton::new("Clear").style(ButtonStyle::Danger).show(ui).clicked() {
            ui_state.clear_api_key();
        }
    });

    match &ui_state.key_status {
        Some(KeyStatus::Saved) => StatusMessage::success("API key saved").show(ui),
        Some(KeyStatus::Cleared) => StatusMessage::info("API key cleared").show(ui),
        Some(KeyStatus::Failed(reason)) => StatusMessage::error(reason.as_str()).show(ui),
        None => {}
    }

    if !ui_state.credentials.is_persistent() {
        StatusMessage::info("No system keychain available; the key is kept for this session only.")
            .show(ui);
    }
}

fn show_upload(ctx: &egui::Context, ui: &mut egui::Ui, ui_state: &mut UiState) {
    ui.label(format!(
        "Drop a {} image onto the window, or enter its path (max {}MB).",
        ui_state.upload_policy.accepted_label(),
        ui_state.upload_policy.max_size_mb
    ));

    let response = FormField::new("Image path:", &mut ui_state.path_input)
        .placeholder("/path/to/diagram.png")
        .show(ui);
    let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

    let has_path = !ui_state.path_input.trim().is_empty();
    if (StyledButton::new("Load").style(ButtonStyle::Secondary).enabled(has_path).show(ui).clicked() || submitted)
        && has_path
    {
        ui_state.load_path_input(ctx);
    }

    if let Some(message) = ui_state.shell.upload_error() {
        StatusMessage::error(message).show(ui);
    }

    if let Some(image) = ui_state.shell.image() {
        ui.add_space(8.0);
        ui.label(RichText::new("Selected Image:").strong());
        ui.label(format!("{} ({}, {} KB)", image.name, image.mime_type, image.bytes.len() / 1024));

        if let Some(preview) = &ui_state.preview {
            let [w, h] = preview.size;
            let scale = (PREVIEW_HEIGHT / h.max(1) as f32).min(ui.available_width() / w.max(1) as f32);
            let sized = egui::load::SizedTexture::from_handle(&preview.texture);
            ui.add(egui::Image::new(sized).fit_to_exact_size(Vec2::new(w as f32, h as f32) * scale));
        }
    }
}

fn show_actions(ui: &mut egui::Ui, ui_state: &mut UiState) {
    let analyzing = ui_state.shell.is_analyzing();

    ui.horizontal(|ui| {
        let label = if analyzing { "Analyzing..." } else { "Analyze with Gemini" };
        if StyledButton::new(label)
            .enabled(ui_state.shell.can_analyze())
            .busy(analyzing)
            .min_size(Vec2::new(150.0, 28.0))
            .show(ui)
            .clicked()
        {
            ui_state.analyze();
        }

        if StyledButton::new("Use Sample Data")
            .style(ButtonStyle::Success)
            .min_size(Vec2::new(130.0, 28.0))
            .show(ui)
            .clicked()
        {
            ui_state.use_sample();
        }
    });

    if let Some(message) = ui_state.shell.error().map(str::to_owned) {
        ui.add_space(8.0);
        let can_retry = ui_state.shell.image().is_some() && ui_state.shell.has_credential();
        match error_banner(ui, &message, can_retry) {
            BannerAction::Retry => ui_state.analyze(),
            BannerAction::Dismiss => ui_state.shell.dismiss_error(),
            BannerAction::None => {}
        }
    }
}
