use std::sync::Arc;

use anyhow::{anyhow, Context};
use tracing::info;

use diagram3d::auth::CredentialStore;
use diagram3d::config::load_settings;
use diagram3d::ui::{DiagramApp, UiState};
use diagram3d::utils::logging::{init_logging, log_system_info};
use diagram3d::{GeminiClient, VisionClient, APP_NAME, VERSION};

fn main() -> anyhow::Result<()> {
    init_logging();
    log_system_info();

    let settings = load_settings();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("diagram3d-io")
        .build()
        .context("Failed to start async runtime")?;
    let _guard = runtime.enter();

    let client: Arc<dyn VisionClient> = Arc::new(
        GeminiClient::new(&settings.analyzer.endpoint, settings.analyzer.model.clone())
            .map_err(|e| anyhow!("Invalid analyzer settings: {}", e))?,
    );
    info!("Using model {} at {}", settings.analyzer.model, settings.analyzer.endpoint);

    let ui_state = UiState::new(runtime.handle().clone(), client, CredentialStore::system(), &settings);
    let app = DiagramApp::new(ui_state);

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        &format!("{} {}", APP_NAME, VERSION),
        options,
        Box::new(move |_cc| Ok(Box::new(app))),
    )
    .map_err(|e| anyhow!("Window error: {}", e))?;

    info!("Shutting down");
    Ok(())
}
