use eframe::egui;
use egui::{Color32, RichText, Vec2};

pub enum ButtonStyle {
    Primary,
    Secondary,
    Danger,
    Success,
}

impl ButtonStyle {
    fn color(&self) -> Color32 {
        match self {
            ButtonStyle::Primary => Color32::from_rgb(37, 99, 235),
            ButtonStyle::Secondary => Color32::GRAY,
            ButtonStyle::Danger => Color32::from_rgb(220, 53, 69),
            ButtonStyle::Success => Color32::from_rgb(22, 163, 74),
        }
    }
}

pub struct StyledButton {
    text: String,
    style: ButtonStyle,
    min_size: Option<Vec2>,
    enabled: bool,
    busy: bool,
}

impl StyledButton {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: ButtonStyle::Primary,
            min_size: None,
            enabled: true,
            busy: false,
        }
    }

    pub fn style(mut self, style: ButtonStyle) -> Self {
        self.style = style;
        self
    }

    pub fn min_size(mut self, size: Vec2) -> Self {
        self.min_size = Some(size);
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Shows a spinner beside the button and disables it
    pub fn busy(mut self, busy: bool) -> Self {
        self.busy = busy;
        self
    }

    pub fn show(self, ui: &mut egui::Ui) -> egui::Response {
        let enabled = self.enabled && !self.busy;
        let mut button = egui::Button::new(RichText::new(&self.text).color(Color32::WHITE));

        // Disabled buttons keep the theme's greyed look
        if enabled {
            button = button.fill(self.style.color());
        }

        if let Some(size) = self.min_size {
            button = button.min_size(size);
        }

        ui.horizontal(|ui| {
            if self.busy {
                ui.spinner();
            }
            ui.add_enabled(enabled, button)
        })
        .inner
    }
}
