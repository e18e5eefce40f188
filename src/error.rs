//! Error types for FoundersLens
//!
//! `AppError` is the HTTP-facing error and implements `IntoResponse` for Axum
//! handlers. Orchestration failures arrive as [`OrchestratorError`] and are
//! mapped onto the wire contract of `POST /analyze`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Error code returned to clients when every model identity hit its quota
pub const QUOTA_EXHAUSTED_CODE: &str = "API_QUOTA_EXHAUSTED";

/// Error label returned to clients for non-quota invocation failures
pub const EXECUTION_FAILED_LABEL: &str = "Agent Execution Failed";

/// Terminal failures of the fallback orchestrator
///
/// Parse failures never appear here: they are recovered locally by the
/// report assembler and always degrade to a placeholder report.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrchestratorError {
    /// Primary and fallback models both rejected the request for quota reasons
    #[error(
        "Daily API Quota Exceeded for ALL available models. Please check billing or try again later."
    )]
    AllModelsExhausted,

    /// The caller-supplied credential is rate limited or out of quota
    #[error(
        "API Quota Exceeded for the supplied API key. Please check its billing or try again later."
    )]
    AllCredentialsExhausted,

    /// A non-quota failure ended the request without further attempts
    #[error("{model}: {detail}")]
    ExecutionFailed { model: String, detail: String },
}

impl OrchestratorError {
    /// Returns true if this error reports quota exhaustion (HTTP 429)
    pub fn is_quota(&self) -> bool {
        match self {
            Self::AllModelsExhausted | Self::AllCredentialsExhausted => true,
            Self::ExecutionFailed { .. } => false,
        }
    }
}

/// Main error type for the application
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read config file {path}: {source}")]
    ConfigFileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration in {path}: {reason}")]
    ConfigValidationFailed { path: String, reason: String },

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error(transparent)]
    Orchestration(#[from] OrchestratorError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                serde_json::json!({ "error": msg }),
            ),
            Self::Orchestration(err) if err.is_quota() => (
                StatusCode::TOO_MANY_REQUESTS,
                serde_json::json!({
                    "error": QUOTA_EXHAUSTED_CODE,
                    "message": err.to_string(),
                }),
            ),
            Self::Orchestration(OrchestratorError::ExecutionFailed { detail, .. }) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::json!({
                    "error": EXECUTION_FAILED_LABEL,
                    "details": detail,
                }),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::json!({ "error": self.to_string() }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

/// Convenience type alias for Results
pub type AppResult<T> = Result<T, AppError>;
