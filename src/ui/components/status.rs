use eframe::egui;
use egui::Color32;

pub enum StatusLevel {
    Info,
    Success,
    Error,
}

impl StatusLevel {
    fn color(&self) -> Color32 {
        match self {
            StatusLevel::Info => Color32::from_rgb(23, 162, 184),
            StatusLevel::Success => Color32::from_rgb(40, 167, 69),
            StatusLevel::Error => Color32::from_rgb(220, 53, 69),
        }
    }

    fn icon(&self) -> &'static str {
        match self {
            StatusLevel::Info => "ⓘ",
            StatusLevel::Success => "✓",
            StatusLevel::Error => "✗",
        }
    }
}

pub struct StatusMessage {
    pub level: StatusLevel,
    pub message: String,
}

impl StatusMessage {
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: StatusLevel::Info, message: message.into() }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self { level: StatusLevel::Success, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: StatusLevel::Error, message: message.into() }
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        ui.horizontal_wrapped(|ui| {
            ui.colored_label(self.level.color(), self.level.icon());
            ui.colored_label(self.level.color(), &self.message);
        });
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerAction {
    None,
    Retry,
    Dismiss,
}

/// Framed error message with optional Retry and a Dismiss button
pub fn error_banner(ui: &mut egui::Ui, message: &str, can_retry: bool) -> BannerAction {
    let mut action = BannerAction::None;

    egui::Frame::group(ui.style())
        .fill(Color32::from_rgb(254, 226, 226))
        .stroke(egui::Stroke::new(1.0, StatusLevel::Error.color()))
        .inner_margin(10.0)
        .show(ui, |ui| {
            StatusMessage::error(message).show(ui);
            ui.horizontal(|ui| {
                if can_retry && ui.button("Retry").clicked() {
                    action = BannerAction::Retry;
                }
                if ui.button("Dismiss").clicked() {
                    action = BannerAction::Dismiss;
                }
            });
        });

    action
}

pub fn show_spinner_with_text(ui: &mut egui::Ui, text: &str) {
    ui.horizontal(|ui| {
        ui.spinner();
        ui.label(text);
    });
}
