use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use url::Url;

use super::{AnalysisError, AnalysisResult, VisionClient, VisionRequest};

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/";
pub const DEFAULT_MODEL: &str = "gemini-1.5-pro";

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text { text: &'a str },
    InlineData { inline_data: InlineData<'a> },
}

#[derive(Serialize)]
struct InlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// Google Gemini `generateContent` client
pub struct GeminiClient {
    http: HttpClient,
    endpoint: Url,
    model: String,
}

impl GeminiClient {
    pub fn new(endpoint: &str, model: impl Into<String>) -> AnalysisResult<Self> {
        // Url::join drops the last path segment unless it ends with '/'
        let normalized = if endpoint.ends_with('/') {
            endpoint.to_string()
        } else {
            format!("{}/", endpoint)
        };

        let endpoint = Url::parse(&normalized).map_err(|e| AnalysisError::Network {
            reason: format!("Invalid endpoint {}: {}", endpoint, e),
        })?;

        let http = HttpClient::builder().build().map_err(|e| AnalysisError::Network {
            reason: format!("Failed to build HTTP client: {}", e),
        })?;

        Ok(Self { http, endpoint, model: model.into() })
    }

    pub fn generate_url(&self) -> AnalysisResult<Url> {
        self.endpoint
            .join(&format!("v1beta/models/{}:generateContent", self.model))
            .map_err(|e| AnalysisError::Network { reason: format!("Invalid model path: {}", e) })
    }
}

/// Map a non-success response to the error taxonomy
pub(crate) fn classify_failure(status: u16, body: &str) -> AnalysisError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.trim().to_string());

    let mentions_key = message.to_lowercase().contains("api key");
    match status {
        401 | 403 => AnalysisError::InvalidCredential { reason: message },
        400 if mentions_key => AnalysisError::InvalidCredential { reason: message },
        _ => AnalysisError::Service { status, message },
    }
}

/// Concatenate the text parts of the first candidate
pub(crate) fn response_text(body: &str) -> AnalysisResult<String> {
    let response: GenerateContentResponse =
        serde_json::from_str(body).map_err(|e| AnalysisError::Service {
            status: 200,
            message: format!("Unexpected response body: {}", e),
        })?;

    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(AnalysisError::EmptyResponse);
    }
    Ok(text)
}

impl GeminiClient {
    /// Builds the `generateContent` POST without sending it
    pub(crate) fn build_request(&self, request: &VisionRequest) -> AnalysisResult<reqwest::Request> {
        let url = self.generate_url()?;

        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text { text: &request.prompt },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: &request.image.mime_type,
                            data: &request.image.data_base64,
                        },
                    },
                ],
            }],
        };

        self.http
            .post(url)
            .header("x-goog-api-key", &request.api_key)
            .json(&body)
            .build()
            .map_err(|e| AnalysisError::Network { reason: format!("Failed to build request: {}", e) })
    }
}

#[async_trait]
impl VisionClient for GeminiClient {
    async fn generate(&self, request: VisionRequest) -> AnalysisResult<String> {
        let http_request = self.build_request(&request)?;
        debug!("POST {} ({:?})", http_request.url(), request);

        let response = self
            .http
            .execute(http_request)
            .await
            .map_err(|e| AnalysisError::Network { reason: e.to_string() })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AnalysisError::Network { reason: format!("Failed to read response: {}", e) })?;

        if !status.is_success() {
            let failure = classify_failure(status.as_u16(), &text);
            error!("Vision request failed: {}", failure);
            return Err(failure);
        }

        response_text(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::InlineImage;

    #[test]
    fn builds_generate_url_with_or_without_trailing_slash() {
        for endpoint in ["https://example.test", "https://example.test/"] {
            let client = GeminiClient::new(endpoint, "gemini-1.5-pro").unwrap();
            assert_eq!(
                client.generate_url().unwrap().as_str(),
                "https://example.test/v1beta/models/gemini-1.5-pro:generateContent"
            );
        }
    }

    #[test]
    fn joins_text_parts_of_first_candidate() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"Here: "},{"text":"{\"a\":1}"}]}},
                       {"content":{"parts":[{"text":"ignored"}]}}]}"#;
        assert_eq!(response_text(body).unwrap(), "Here: {\"a\":1}");
    }

    #[test]
    fn empty_candidates_are_an_error() {
        assert_eq!(response_text(r#"{"candidates":[]}"#), Err(AnalysisError::EmptyResponse));
        assert_eq!(response_text(r#"{}"#), Err(AnalysisError::EmptyResponse));
    }

    #[test]
    fn classifies_key_errors() {
        let body = r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key.","status":"INVALID_ARGUMENT"}}"#;
        assert!(matches!(classify_failure(400, body), AnalysisError::InvalidCredential { .. }));
        assert!(matches!(classify_failure(403, "forbidden"), AnalysisError::InvalidCredential { .. }));
        assert_eq!(
            classify_failure(503, r#"{"error":{"message":"overloaded"}}"#),
            AnalysisError::Service { status: 503, message: "overloaded".to_string() }
        );
    }

    #[test]
    fn request_carries_key_header_and_inline_image() {
        let client = GeminiClient::new("https://example.test", "gemini-1.5-pro").unwrap();
        let request = VisionRequest {
            api_key: "test-key".to_string(),
            prompt: "Describe the diagram".to_string(),
            image: InlineImage { mime_type: "image/png".to_string(), data_base64: "iVBORw0K".to_string() },
        };

        let http_request = client.build_request(&request).unwrap();
        assert_eq!(http_request.method(), reqwest::Method::POST);
        assert_eq!(
            http_request.url().as_str(),
            "https://example.test/v1beta/models/gemini-1.5-pro:generateContent"
        );
        assert_eq!(http_request.headers()["x-goog-api-key"], "test-key");
        assert_eq!(http_request.headers()[reqwest::header::CONTENT_TYPE], "application/json");
        assert!(http_request.url().query().is_none());

        let bytes = http_request.body().and_then(|b| b.as_bytes()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(bytes).unwrap();
        let parts = &value["contents"][0]["parts"];
        assert_eq!(parts[0]["text"], "Describe the diagram");
        assert_eq!(parts[1]["inline_data"]["mime_type"], "image/png");
        assert_eq!(parts[1]["inline_data"]["data"], "iVBORw0K");
    }

    #[test]
    fn request_body_matches_rest_shape() {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text { text: "prompt" },
                    Part::InlineData { inline_data: InlineData { mime_type: "image/jpeg", data: "AAAA" } },
                ],
            }],
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["contents"][0]["parts"][0]["text"], "prompt");
        assert_eq!(value["contents"][0]["parts"][1]["inline_data"]["mime_type"], "image/jpeg");
    }
}
