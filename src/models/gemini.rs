//! Gemini REST backend
//!
//! Calls `POST {base_url}/models/{model}:generateContent` and classifies
//! failures into [`BackendError`] variants at the boundary.

use crate::analysis::assembler::SYSTEM_INSTRUCTION;
use crate::error::{AppError, AppResult};
use crate::models::{BackendError, Credential, ModelBackend};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

/// Header carrying the API key
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Status marker Gemini uses for quota rejections
const QUOTA_MARKER: &str = "RESOURCE_EXHAUSTED";

/// Maximum length of an error body copied into error messages
const MAX_ERROR_BODY: usize = 500;

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

/// Backend for the Gemini `generateContent` REST API
pub struct GeminiBackend {
    http: Client,
    base_url: String,
    search_grounding: bool,
}

impl GeminiBackend {
    /// Create a backend for the given API base URL
    ///
    /// `timeout_seconds` bounds each HTTP request; a timeout is reported as a
    /// connection error.
    pub fn new(base_url: &str, timeout_seconds: u64, search_grounding: bool) -> AppResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            search_grounding,
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }

    fn request_body(&self, prompt: &str) -> serde_json::Value {
        let mut body = json!({
            "systemInstruction": {
                "parts": [{ "text": SYSTEM_INSTRUCTION }]
            },
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }]
            }]
        });

        if self.search_grounding {
            body["tools"] = json!([{ "google_search": {} }]);
        }

        body
    }
}

/// Classify a non-success HTTP response
fn classify_http_error(status: u16, body: &str) -> BackendError {
    let envelope = serde_json::from_str::<ErrorEnvelope>(body).ok();
    let marker_status = envelope
        .as_ref()
        .and_then(|e| e.error.status.as_deref())
        .is_some_and(|s| s == QUOTA_MARKER);
    let message = envelope
        .and_then(|e| e.error.message)
        .unwrap_or_else(|| truncate(body.trim(), MAX_ERROR_BODY));

    if status == 429 || marker_status || body.contains(QUOTA_MARKER) {
        BackendError::QuotaExhausted { status, message }
    } else {
        BackendError::Http { status, message }
    }
}

/// Classify a transport failure raised before any response arrived
fn classify_transport_error(error: &reqwest::Error) -> BackendError {
    if error.is_connect() || error.is_timeout() {
        BackendError::Connection(error.to_string())
    } else {
        BackendError::Other(error.to_string())
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let mut truncated: String = text.chars().take(max_chars).collect();
        truncated.push_str("...");
        truncated
    }
}

/// Concatenate the text parts of the first candidate
fn collect_text(response: GenerateContentResponse) -> String {
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<String>()
        })
        .unwrap_or_default()
}

#[async_trait]
impl ModelBackend for GeminiBackend {
    async fn generate(
        &self,
        model: &str,
        credential: &Credential,
        prompt: &str,
    ) -> Result<String, BackendError> {
        let url = self.endpoint(model);

        tracing::debug!(
            model = %model,
            url = %url,
            prompt_length = prompt.len(),
            search_grounding = self.search_grounding,
            "Sending generateContent request"
        );

        let response = self
            .http
            .post(&url)
            .header(API_KEY_HEADER, credential.expose())
            .json(&self.request_body(prompt))
            .send()
            .await
            .map_err(|e| classify_transport_error(&e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| classify_transport_error(&e))?;

        if !status.is_success() {
            return Err(classify_http_error(status.as_u16(), &body));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body).map_err(|e| {
            BackendError::Other(format!("Malformed generateContent response: {}", e))
        })?;

        Ok(collect_text(parsed))
    }
}
