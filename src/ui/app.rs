use std::time::Duration;

use eframe::egui;

use crate::ui::UiState;

/// How often to poll for analysis results while a request is in flight
const ANALYSIS_POLL_INTERVAL: Duration = Duration::from_millis(100);

pub struct DiagramApp {
    ui_state: UiState,
}

impl DiagramApp {
    pub fn new(ui_state: UiState) -> Self {
        Self { ui_state }
    }
}

impl eframe::App for DiagramApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        handle_analysis_results(&mut self.ui_state);
        handle_dropped_files(ctx, &mut self.ui_state);

        crate::ui::panel::show_controls(ctx, &mut self.ui_state);
        crate::ui::viewport::show_viewport(ctx, &mut self.ui_state);

        if self.ui_state.shell.is_analyzing() {
            ctx.request_repaint_after(ANALYSIS_POLL_INTERVAL);
        }
    }
}

fn handle_analysis_results(ui_state: &mut UiState) {
    ui_state.dispatcher.poll(&mut ui_state.shell);
}

fn handle_dropped_files(ctx: &egui::Context, ui_state: &mut UiState) {
    let dropped = ctx.input(|i| i.raw.dropped_files.clone());
    if !dropped.is_empty() {
        ui_state.accept_dropped(ctx, &dropped);
    }
}
