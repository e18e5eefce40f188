//! Analyze endpoint handler
//!
//! Handles `POST /analyze`: validates the request, runs the fallback
//! orchestrator and returns the report envelope.

use crate::analysis::{AnalysisEnvelope, AnalysisJob, PROMPT_VERSION};
use crate::error::{AppError, AppResult};
use crate::handlers::AppState;
use crate::middleware::RequestId;
use crate::models::Credential;
use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
};
use serde::Deserialize;
use tracing::Instrument;

/// Maximum allowed length of each free-text field in characters
const MAX_FIELD_LENGTH: usize = 10_000;

/// Analysis request from client
///
/// Validation is enforced during deserialization - invalid instances cannot exist.
/// A blank `custom_api_key` is treated as absent.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawAnalyzeRequest")]
pub struct AnalyzeRequest {
    idea: String,
    industry: String,
    extra_context: String,
    custom_api_key: Option<Credential>,
}

#[derive(Deserialize)]
struct RawAnalyzeRequest {
    idea: String,
    industry: String,
    #[serde(default)]
    extra_context: Option<String>,
    #[serde(default)]
    custom_api_key: Option<String>,
}

impl TryFrom<RawAnalyzeRequest> for AnalyzeRequest {
    type Error = String;

    fn try_from(raw: RawAnalyzeRequest) -> Result<Self, Self::Error> {
        let extra_context = raw.extra_context.unwrap_or_default();

        for (field, value) in [
            ("idea", &raw.idea),
            ("industry", &raw.industry),
            ("extra_context", &extra_context),
        ] {
            if field != "extra_context" && value.trim().is_empty() {
                return Err(format!("{} cannot be empty or contain only whitespace", field));
            }
            let length = value.chars().count();
            if length > MAX_FIELD_LENGTH {
                return Err(format!(
                    "{} exceeds maximum length of {} characters (got {})",
                    field, MAX_FIELD_LENGTH, length
                ));
            }
        }

        Ok(Self {
            idea: raw.idea.trim().to_string(),
            industry: raw.industry.trim().to_string(),
            extra_context: extra_context.trim().to_string(),
            custom_api_key: raw.custom_api_key.and_then(Credential::new),
        })
    }
}

impl AnalyzeRequest {
    pub fn idea(&self) -> &str {
        &self.idea
    }

    pub fn industry(&self) -> &str {
        &self.industry
    }

    pub fn extra_context(&self) -> &str {
        &self.extra_context
    }

    pub fn custom_api_key(&self) -> Option<&Credential> {
        self.custom_api_key.as_ref()
    }

    /// Convert request to the orchestrator's job description
    pub fn to_job(&self) -> AnalysisJob {
        AnalysisJob::new(&self.idea, &self.industry, &self.extra_context)
    }
}

fn rejection_message(rejection: &JsonRejection) -> String {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => "No JSON data provided".to_string(),
        other => other.body_text(),
    }
}

/// Analyze handler
///
/// # Responses
///
/// - `200` with `{idea, industry, research, strategy}` once a model call succeeded
/// - `429` with `{error: "API_QUOTA_EXHAUSTED", message}` when quota ran out
/// - `500` with `{error: "Agent Execution Failed", details}` for other failures
/// - `400` with `{error}` for a missing or invalid body
pub async fn handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> AppResult<Json<AnalysisEnvelope>> {
    let Json(request) = payload.map_err(|rejection| {
        let message = rejection_message(&rejection);
        tracing::warn!(request_id = %request_id, error = %message, "Rejected analyze request");
        AppError::Validation(message)
    })?;

    let span = tracing::info_span!(
        "analyze",
        request_id = %request_id,
        custom_key = request.custom_api_key().is_some()
    );

    async move {
        tracing::info!(
            idea = %request.idea(),
            industry = %request.industry(),
            prompt_version = PROMPT_VERSION,
            "Starting analysis"
        );

        let envelope = state
            .orchestrator()
            .run(&request.to_job(), request.custom_api_key())
            .await?;

        tracing::info!(
            degraded = envelope.is_degraded(),
            viability_score = ?envelope.report.viability_score(),
            "Analysis complete"
        );

        Ok(Json(envelope))
    }
    .instrument(span)
    .await
}
