use eframe::egui;

pub struct FormField<'a> {
    pub label: &'a str,
    pub value: &'a mut String,
    pub password: bool,
    pub placeholder: Option<&'a str>,
}

impl<'a> FormField<'a> {
    pub fn new(label: &'a str, value: &'a mut String) -> Self {
        Self {
            label,
            value,
            password: false,
            placeholder: None,
        }
    }

    /// Masks the input while `masked` is set
    pub fn password(mut self, masked: bool) -> Self {
        self.password = masked;
        self
    }

    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    pub fn show(&mut self, ui: &mut egui::Ui) -> egui::Response {
        ui.label(self.label);

        let mut text_edit = egui::TextEdit::singleline(self.value).desired_width(f32::INFINITY);

        if self.password {
            text_edit = text_edit.password(true);
        }

        if let Some(placeholder) = self.placeholder {
            text_edit = text_edit.hint_text(placeholder);
        }

        let response = ui.add(text_edit);
        ui.add_space(6.0);
        response
    }
}

/// Numbered, framed step of the side panel
pub fn form_section<R>(
    ui: &mut egui::Ui,
    title: &str,
    content: impl FnOnce(&mut egui::Ui) -> R,
) -> R {
    egui::Frame::group(ui.style())
        .inner_margin(12.0)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.strong(title);
            ui.add_space(6.0);
            content(ui)
        })
        .inner
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_masking_follows_toggle() {
        let mut value = String::from("secret");
        assert!(FormField::new("Key:", &mut value).password(true).password);
        assert!(!FormField::new("Key:", &mut value).password(false).password);
    }

    #[test]
    fn masked_field_keeps_text() {
        let ctx = egui::Context::default();
        let mut value = String::from("secret");
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                FormField::new("Key:", &mut value).password(true).show(ui);
            });
        });
        assert_eq!(value, "secret");
    }
}
