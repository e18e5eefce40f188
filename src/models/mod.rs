//! Model identities, backends and invocation
//!
//! Provides the model backend boundary (with the Gemini REST implementation)
//! and the invoker that classifies each attempt into an outcome.

pub mod backend;
pub mod gemini;
pub mod identity;
pub mod invoker;

pub use backend::{BackendError, ModelBackend};
pub use gemini::GeminiBackend;
pub use identity::{Credential, InvocationRequest, ModelIdentity, RetryPolicy};
pub use invoker::{FailureKind, InvocationOutcome, ModelInvoker};
