//! Model backend boundary
//!
//! A backend sends one prompt to one model and either returns raw text or a
//! typed [`BackendError`]. Classification of raw transport failures happens
//! here, once, so nothing above this layer inspects error strings.

use crate::models::Credential;
use async_trait::async_trait;

/// Typed failure surface of a model backend
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// Rate limit or usage cap rejection (HTTP 429 or a quota-exhausted marker)
    #[error("Quota exhausted (status {status}): {message}")]
    QuotaExhausted { status: u16, message: String },

    /// DNS, connect or timeout fault before a response arrived
    #[error("Connection error: {0}")]
    Connection(String),

    /// Non-success HTTP status that is not a quota rejection
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Any other failure (malformed body, request construction, etc.)
    #[error("{0}")]
    Other(String),
}

/// Trait for model backends
///
/// Allows dependency injection of different backends, enabling testing with
/// scripted backends that don't make real network calls.
#[async_trait]
pub trait ModelBackend: Send + Sync {
    /// Send `prompt` to `model` using `credential`
    ///
    /// # Returns
    ///
    /// The raw model text on success (possibly empty; emptiness is judged by
    /// the invoker), or a classified [`BackendError`].
    async fn generate(
        &self,
        model: &str,
        credential: &Credential,
        prompt: &str,
    ) -> Result<String, BackendError>;
}
