//! Application shell: owns the selected image, the credential, the current model and
//! the analysis lifecycle.
//!
//! The shell itself is synchronous. [`dispatch::AnalysisDispatcher`] runs the analysis on
//! the tokio runtime and feeds outcomes back through [`AppShell::complete_analysis`].

use std::fmt;

use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::analyzer::AnalysisError;
use crate::model::{self, PhysicsModelData};

pub mod dispatch;
pub mod intake;

pub use dispatch::{AnalysisDispatcher, AnalysisOutcome};
pub use intake::{IntakeError, SelectedImage, UploadPolicy};

/// Identifies one analysis request; results carrying a stale token are dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestToken(Uuid);

impl RequestToken {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestToken {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellState {
    Idle,
    ImageSelected,
    Analyzing { token: RequestToken },
    Result,
    Failed,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ShellError {
    #[error("Please provide both an API key and an image to analyze.")]
    MissingInputs,

    #[error("An analysis is already in progress")]
    AlreadyAnalyzing,
}

/// Everything a background task needs to run one analysis
#[derive(Clone)]
pub struct AnalysisTicket {
    pub token: RequestToken,
    pub image: SelectedImage,
    pub api_key: String,
}

impl fmt::Debug for AnalysisTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisTicket")
            .field("token", &self.token)
            .field("image", &self.image)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

pub struct AppShell {
    state: ShellState,
    image: Option<SelectedImage>,
    api_key: Option<String>,
    model: Option<PhysicsModelData>,
    error: Option<String>,
    upload_error: Option<String>,
    model_generation: u64,
}

impl Default for AppShell {
    fn default() -> Self {
        Self::new()
    }
}

impl AppShell {
    pub fn new() -> Self {
        Self {
            state: ShellState::Idle,
            image: None,
            api_key: None,
            model: None,
            error: None,
            upload_error: None,
            model_generation: 0,
        }
    }

    pub fn state(&self) -> ShellState {
        self.state
    }

    pub fn image(&self) -> Option<&SelectedImage> {
        self.image.as_ref()
    }

    pub fn model(&self) -> Option<&PhysicsModelData> {
        self.model.as_ref()
    }

    /// Bumped every time a new model is installed, so views know to rebuild
    pub fn model_generation(&self) -> u64 {
        self.model_generation
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn upload_error(&self) -> Option<&str> {
        self.upload_error.as_deref()
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn is_analyzing(&self) -> bool {
        matches!(self.state, ShellState::Analyzing { .. })
    }

    pub fn can_analyze(&self) -> bool {
        self.image.is_some() && self.api_key.is_some() && !self.is_analyzing()
    }

    /// Blank keys count as no key
    pub fn set_credential(&mut self, key: &str) {
        let key = key.trim();
        if key.is_empty() {
            self.api_key = None;
        } else {
            self.api_key = Some(key.to_string());
        }
    }

    pub fn clear_credential(&mut self) {
        self.api_key = None;
    }

    /// Replaces the current image and clears the model. An in-flight analysis is
    /// superseded and its result will be ignored.
    pub fn select_image(&mut self, image: SelectedImage) {
        if let ShellState::Analyzing { token } = self.state {
            debug!("Superseding analysis {:?}", token);
        }
        info!("Selected image {} ({})", image.name, image.mime_type);
        self.image = Some(image);
        self.model = None;
        self.upload_error = None;
        self.error = None;
        self.state = ShellState::ImageSelected;
    }

    /// Rejected uploads leave the state and the previous image untouched
    pub fn reject_upload(&mut self, err: &IntakeError) {
        warn!("Upload rejected: {}", err);
        self.upload_error = Some(err.to_string());
    }

    pub fn begin_analysis(&mut self) -> Result<AnalysisTicket, ShellError> {
        if self.is_analyzing() {
            return Err(ShellError::AlreadyAnalyzing);
        }

        let (Some(image), Some(api_key)) = (self.image.clone(), self.api_key.clone()) else {
            self.error = Some(ShellError::MissingInputs.to_string());
            return Err(ShellError::MissingInputs);
        };

        let token = RequestToken::new();
        self.state = ShellState::Analyzing { token };
        self.error = None;
        debug!("Analysis {:?} started", token);

        Ok(AnalysisTicket { token, image, api_key })
    }

    /// Applies an analysis outcome. Returns false when the token is stale.
    pub fn complete_analysis(
        &mut self,
        token: RequestToken,
        result: Result<PhysicsModelData, AnalysisError>,
    ) -> bool {
        if self.state != (ShellState::Analyzing { token }) {
            debug!("Dropping stale analysis result {:?}", token);
            return false;
        }

        match result {
            Ok(model) => {
                info!("Analysis {:?} succeeded", token);
                self.install_model(model);
            }
            Err(e) => {
                warn!("Analysis {:?} failed: {}", token, e);
                self.error = Some(format!("Error analyzing image: {}", e));
                self.state = ShellState::Failed;
            }
        }
        true
    }

    /// Shows the built-in lever model without contacting the service
    pub fn load_sample(&mut self) {
        info!("Loading sample model");
        self.install_model(model::sample_lever());
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
        self.upload_error = None;
    }

    fn install_model(&mut self, model: PhysicsModelData) {
        self.model = Some(model);
        self.model_generation += 1;
        self.error = None;
        self.state = ShellState::Result;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png() -> SelectedImage {
        SelectedImage {
            name: "lever.png".to_string(),
            mime_type: "image/png".to_string(),
            bytes: vec![1u8, 2, 3].into(),
        }
    }

    #[test]
    fn blank_credential_is_ignored() {
        let mut shell = AppShell::new();
        shell.set_credential("   ");
        assert!(!shell.has_credential());
    }

    #[test]
    fn second_begin_is_rejected() {
        let mut shell = AppShell::new();
        shell.set_credential("key");
        shell.select_image(png());
        shell.begin_analysis().unwrap();
        assert_eq!(shell.begin_analysis().unwrap_err(), ShellError::AlreadyAnalyzing);
    }

    #[test]
    fn sample_bumps_generation() {
        let mut shell = AppShell::new();
        shell.load_sample();
        shell.load_sample();
        assert_eq!(shell.model_generation(), 2);
        assert_eq!(shell.state(), ShellState::Result);
    }
}
