//! Diagram analysis: prompt + image out to a vision-language service, schema JSON back.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::model::{self, PhysicsModelData};

pub mod extract;
pub mod gemini;
pub mod prompt;

pub use extract::extract_json;
pub use gemini::GeminiClient;
pub use prompt::DIAGRAM_PROMPT;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("No API key configured")]
    MissingCredential,

    #[error("API key rejected: {reason}")]
    InvalidCredential { reason: String },

    #[error("Network error: {reason}")]
    Network { reason: String },

    #[error("Vision service returned {status}: {message}")]
    Service { status: u16, message: String },

    #[error("Vision service returned no text")]
    EmptyResponse,

    #[error("Vision service did not answer within {secs}s")]
    Timeout { secs: u64 },

    #[error("No valid JSON found in response")]
    NoJsonFound,

    #[error("Failed to parse 3D model data from response: {reason}")]
    MalformedJson { reason: String },

    #[error("Response does not describe a physics model: {reason}")]
    Schema { reason: String },
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// How the outgoing image part is tagged.
///
/// `AlwaysPng` labels every upload as PNG regardless of its real type,
/// `Declared` sends the MIME type the upload was accepted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutgoingMime {
    #[default]
    Declared,
    AlwaysPng,
}

impl OutgoingMime {
    pub fn resolve<'a>(&self, declared: &'a str) -> &'a str {
        match self {
            OutgoingMime::Declared => declared,
            OutgoingMime::AlwaysPng => "image/png",
        }
    }
}

/// Image bytes attached inline to a request
#[derive(Clone, PartialEq)]
pub struct InlineImage {
    pub mime_type: String,
    pub data_base64: String,
}

impl fmt::Debug for InlineImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InlineImage")
            .field("mime_type", &self.mime_type)
            .field("data_base64_len", &self.data_base64.len())
            .finish()
    }
}

/// A single prompt + image call
#[derive(Clone)]
pub struct VisionRequest {
    pub api_key: String,
    pub prompt: String,
    pub image: InlineImage,
}

impl fmt::Debug for VisionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisionRequest")
            .field("api_key", &"<redacted>")
            .field("prompt_len", &self.prompt.len())
            .field("image", &self.image)
            .finish()
    }
}

/// External vision-language service returning one text response per request
#[async_trait]
pub trait VisionClient: Send + Sync {
    async fn generate(&self, request: VisionRequest) -> AnalysisResult<String>;
}

/// Turns an uploaded diagram into [`PhysicsModelData`].
///
/// One request per call: no caching, no retry. Schema repairs are logged as warnings.
pub struct DiagramAnalyzer {
    client: Arc<dyn VisionClient>,
    api_key: String,
    outgoing_mime: OutgoingMime,
    timeout: Duration,
}

impl DiagramAnalyzer {
    pub fn new(client: Arc<dyn VisionClient>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            outgoing_mime: OutgoingMime::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_outgoing_mime(mut self, outgoing_mime: OutgoingMime) -> Self {
        self.outgoing_mime = outgoing_mime;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build_request(&self, image: &[u8], mime_type: &str) -> VisionRequest {
        VisionRequest {
            api_key: self.api_key.clone(),
            prompt: DIAGRAM_PROMPT.to_string(),
            image: InlineImage {
                mime_type: self.outgoing_mime.resolve(mime_type).to_string(),
                data_base64: STANDARD.encode(image),
            },
        }
    }

    pub async fn analyze(&self, image: &[u8], mime_type: &str) -> AnalysisResult<PhysicsModelData> {
        if self.api_key.trim().is_empty() {
            return Err(AnalysisError::MissingCredential);
        }

        let request = self.build_request(image, mime_type);
        info!(
            "Analyzing diagram: {} bytes, declared {}, sent as {}",
            image.len(),
            mime_type,
            request.image.mime_type
        );

        let text = tokio::time::timeout(self.timeout, self.client.generate(request))
            .await
            .map_err(|_| AnalysisError::Timeout { secs: self.timeout.as_secs() })??;

        debug!("Vision service returned {} characters", text.len());

        let value = extract_json(&text)?;
        let coerced = model::coerce(value).map_err(|e| AnalysisError::Schema { reason: e.to_string() })?;

        for warning in &coerced.warnings {
            warn!("Schema repair: {}", warning);
        }
        info!(
            "Analysis produced {} objects, {} forces, {} interactions ({} repairs)",
            coerced.model.objects.len(),
            coerced.model.physics.forces.len(),
            coerced.model.interactions.len(),
            coerced.warnings.len()
        );

        Ok(coerced.model)
    }
}
