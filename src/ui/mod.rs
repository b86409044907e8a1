use std::path::PathBuf;
use std::sync::Arc;

use eframe::egui;
use tracing::{info, warn};

use crate::analyzer::VisionClient;
use crate::auth::CredentialStore;
use crate::config::AppSettings;
use crate::scene::SceneOptions;
use crate::shell::{AnalysisDispatcher, AppShell, SelectedImage, ShellError, UploadPolicy};

pub mod app;
pub mod components;
pub mod panel;
pub mod viewport;

pub use app::DiagramApp;
use viewport::ViewportState;

/// Outcome of the last save/clear on the API key field
pub enum KeyStatus {
    Saved,
    Cleared,
    Failed(String),
}

pub struct ImagePreview {
    pub texture: egui::TextureHandle,
    pub size: [usize; 2],
}

pub struct UiState {
    pub shell: AppShell,
    pub dispatcher: AnalysisDispatcher,
    pub credentials: CredentialStore,
    pub upload_policy: UploadPolicy,
    pub api_key_input: String,
    pub key_status: Option<KeyStatus>,
    pub show_api_key: bool,
    pub path_input: String,
    pub preview: Option<ImagePreview>,
    pub viewport: ViewportState,
}

impl UiState {
    pub fn new(
        runtime: tokio::runtime::Handle,
        client: Arc<dyn VisionClient>,
        credentials: CredentialStore,
        settings: &AppSettings,
    ) -> Self {
        let dispatcher = AnalysisDispatcher::new(runtime, client)
            .with_outgoing_mime(settings.analyzer.outgoing_mime)
            .with_timeout(settings.analyzer.timeout());

        let mut shell = AppShell::new();
        let mut api_key_input = String::new();
        let mut key_status = None;
        if let Some(key) = credentials.load_api_key() {
            shell.set_credential(&key);
            api_key_input = key;
            key_status = Some(KeyStatus::Saved);
        }

        Self {
            shell,
            dispatcher,
            credentials,
            upload_policy: settings.upload.policy(),
            api_key_input,
            key_status,
            show_api_key: false,
            path_input: String::new(),
            preview: None,
            viewport: ViewportState::new(SceneOptions { arrowhead: settings.scene.arrowhead }),
        }
    }

    /// Field edits apply to the session right away; only Save persists them
    pub fn api_key_edited(&mut self) {
        self.shell.set_credential(&self.api_key_input);
        self.key_status = None;
    }

    pub fn save_api_key(&mut self) {
        self.key_status = Some(match self.credentials.store_api_key(&self.api_key_input) {
            Ok(()) => {
                self.shell.set_credential(&self.api_key_input);
                KeyStatus::Saved
            }
            Err(e) => {
                warn!("Failed to save API key: {}", e);
                KeyStatus::Failed(e.to_string())
            }
        });
    }

    pub fn clear_api_key(&mut self) {
        self.api_key_input.clear();
        self.shell.clear_credential();
        self.key_status = Some(match self.credentials.delete_api_key() {
            Ok(()) => KeyStatus::Cleared,
            Err(e) => {
                warn!("Failed to clear API key: {}", e);
                KeyStatus::Failed(e.to_string())
            }
        });
    }

    pub fn load_path_input(&mut self, ctx: &egui::Context) {
        let path = PathBuf::from(self.path_input.trim());
        match self.upload_policy.load_path(&path) {
            Ok(image) => self.accept_image(ctx, image),
            Err(e) => self.shell.reject_upload(&e),
        }
    }

    /// Only the first dropped file is considered
    pub fn accept_dropped(&mut self, ctx: &egui::Context, files: &[egui::DroppedFile]) {
        let Some(file) = files.first() else {
            return;
        };

        let result = match (&file.bytes, &file.path) {
            (Some(bytes), _) => self.upload_policy.accept_bytes(&file.name, &file.mime, bytes.to_vec()),
            (None, Some(path)) => {
                self.path_input = path.display().to_string();
                self.upload_policy.load_path(path)
            }
            (None, None) => return,
        };

        match result {
            Ok(image) => self.accept_image(ctx, image),
            Err(e) => self.shell.reject_upload(&e),
        }
    }

    fn accept_image(&mut self, ctx: &egui::Context, image: SelectedImage) {
        self.dispatcher.cancel();
        self.preview = decode_preview(ctx, &image);
        self.shell.select_image(image);
    }

    pub fn analyze(&mut self) {
        match self.dispatcher.start(&mut self.shell) {
            Ok(()) => info!("Analysis dispatched"),
            Err(ShellError::AlreadyAnalyzing) => {}
            Err(e) => warn!("Cannot analyze: {}", e),
        }
    }

    pub fn use_sample(&mut self) {
        self.dispatcher.cancel();
        self.shell.load_sample();
    }
}

const PREVIEW_MAX: u32 = 512;

fn decode_preview(ctx: &egui::Context, selected: &SelectedImage) -> Option<ImagePreview> {
    let decoded = match image::load_from_memory(&selected.bytes) {
        Ok(decoded) => decoded,
        Err(e) => {
            warn!("Cannot preview {}: {}", selected.name, e);
            return None;
        }
    };

    let rgba = decoded.thumbnail(PREVIEW_MAX, PREVIEW_MAX).to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    let color_image = egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw());
    let texture = ctx.load_texture(&selected.name, color_image, egui::TextureOptions::LINEAR);

    Some(ImagePreview { texture, size })
}
