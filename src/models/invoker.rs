//! Model invoker
//!
//! Runs one prompt against one [`ModelIdentity`], applying that identity's
//! transport retry policy, and reduces the result to an [`InvocationOutcome`].

use crate::models::{BackendError, InvocationRequest, ModelBackend, RetryPolicy};
use std::sync::Arc;
use std::time::Duration;

/// Maximum backoff duration in milliseconds (30 seconds)
pub const MAX_BACKOFF_MS: u64 = 30_000;

/// Detail attached to a success that carried no text
pub const EMPTY_RESPONSE_DETAIL: &str = "empty response";

/// Classified kind of a failed invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Rate limited or out of quota; the orchestrator may fall back
    QuotaExhausted,
    /// Transient transport fault; the same identity may be retried
    ConnectionError,
    /// Anything else; surfaced to the caller
    ExecutionError,
}

impl FailureKind {
    /// Label used in logs and metrics
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::QuotaExhausted => "quota_exhausted",
            FailureKind::ConnectionError => "connection_error",
            FailureKind::ExecutionError => "execution_error",
        }
    }
}

impl From<&BackendError> for FailureKind {
    fn from(error: &BackendError) -> Self {
        match error {
            BackendError::QuotaExhausted { .. } => FailureKind::QuotaExhausted,
            BackendError::Connection(_) => FailureKind::ConnectionError,
            BackendError::Http { .. } | BackendError::Other(_) => FailureKind::ExecutionError,
        }
    }
}

/// Result of one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationOutcome {
    Success { text: String },
    Failure { kind: FailureKind, detail: String },
}

impl InvocationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, InvocationOutcome::Success { .. })
    }

    /// Metrics label for this outcome
    pub fn label(&self) -> &'static str {
        match self {
            InvocationOutcome::Success { .. } => "success",
            InvocationOutcome::Failure { kind, .. } => kind.as_str(),
        }
    }
}

/// Calculate exponential backoff with overflow protection
///
/// The formula is `base * 2^(attempt-1)`, capped at [`MAX_BACKOFF_MS`].
pub fn calculate_backoff(policy: &RetryPolicy, attempt: u32) -> u64 {
    let exponent = attempt.saturating_sub(1);
    policy
        .backoff_ms()
        .saturating_mul(2_u64.saturating_pow(exponent))
        .min(MAX_BACKOFF_MS)
}

/// Whether `error` is retried against the same identity under `policy`
fn is_transport_retryable(policy: &RetryPolicy, error: &BackendError) -> bool {
    match error {
        BackendError::Connection(_) => true,
        BackendError::Http { status, .. } => policy.retries_status(*status),
        BackendError::QuotaExhausted { .. } | BackendError::Other(_) => false,
    }
}

/// Invokes prompts against model identities through a [`ModelBackend`]
#[derive(Clone)]
pub struct ModelInvoker {
    backend: Arc<dyn ModelBackend>,
}

impl ModelInvoker {
    pub fn new(backend: Arc<dyn ModelBackend>) -> Self {
        Self { backend }
    }

    /// Run `request` and classify the result
    ///
    /// Retries happen only when the identity's retry policy allows them
    /// (connection faults and configured status codes). Quota rejections are
    /// never retried here; model-level fallback belongs to the orchestrator.
    pub async fn invoke(&self, request: InvocationRequest<'_>) -> InvocationOutcome {
        let identity = request.identity();
        let policy = identity.retry();
        let max_attempts = policy.max_attempts();

        let mut attempt = 1;
        loop {
            tracing::debug!(
                model = %identity.name(),
                attempt = attempt,
                max_attempts = max_attempts,
                prompt_length = request.prompt().len(),
                "Invoking model"
            );

            let error = match self
                .backend
                .generate(identity.name(), identity.credential(), request.prompt())
                .await
            {
                Ok(text) if text.is_empty() => {
                    tracing::error!(
                        model = %identity.name(),
                        failure_kind = FailureKind::ExecutionError.as_str(),
                        attempt = attempt,
                        "Model returned empty response"
                    );
                    return InvocationOutcome::Failure {
                        kind: FailureKind::ExecutionError,
                        detail: EMPTY_RESPONSE_DETAIL.to_string(),
                    };
                }
                Ok(text) => {
                    tracing::info!(
                        model = %identity.name(),
                        attempt = attempt,
                        response_length = text.len(),
                        "Model invocation succeeded"
                    );
                    return InvocationOutcome::Success { text };
                }
                Err(error) => error,
            };

            let kind = FailureKind::from(&error);

            if attempt < max_attempts && is_transport_retryable(policy, &error) {
                let backoff_ms = calculate_backoff(policy, attempt);
                tracing::warn!(
                    model = %identity.name(),
                    failure_kind = kind.as_str(),
                    error = %error,
                    attempt = attempt,
                    max_attempts = max_attempts,
                    backoff_ms = backoff_ms,
                    "Transient model failure, retrying same identity"
                );
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                attempt += 1;
                continue;
            }

            tracing::error!(
                model = %identity.name(),
                failure_kind = kind.as_str(),
                error = %error,
                attempt = attempt,
                max_attempts = max_attempts,
                "Model invocation failed"
            );

            return InvocationOutcome::Failure {
                kind,
                detail: error.to_string(),
            };
        }
    }
}
