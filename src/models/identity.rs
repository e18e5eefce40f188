//! Model identities and credentials
//!
//! A [`ModelIdentity`] pairs a model name with the credential used to call it
//! and the transport retry policy applied to each attempt. Identities are
//! immutable; a per-request credential override produces a new identity
//! instead of mutating shared state.

use std::fmt;

/// Number of trailing characters of a credential that may appear in logs
const REDACTED_SUFFIX_LEN: usize = 5;

/// API credential for the model backend
///
/// `Debug` and `Display` never print the secret. Use [`Credential::expose`]
/// only at the point where the value is written into a request.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a raw credential, returning `None` for blank input
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Get the secret value
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Redacted form safe for logs, e.g. `...f3a9c`
    pub fn redacted(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        let start = chars.len().saturating_sub(REDACTED_SUFFIX_LEN);
        let suffix: String = chars[start..].iter().collect();
        format!("...{}", suffix)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential({})", self.redacted())
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted())
    }
}

/// Transport-level retry policy for a single identity
///
/// This is distinct from model-level fallback, which the orchestrator owns.
/// The default policy makes exactly one attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    retryable_status_codes: Vec<u16>,
    backoff_ms: u64,
}

/// Default HTTP status codes retried at the transport level
pub const DEFAULT_RETRYABLE_STATUS_CODES: [u16; 3] = [500, 503, 504];

/// Default base backoff between transport retries in milliseconds
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 100;

impl RetryPolicy {
    /// Create a retry policy
    ///
    /// # Errors
    /// Returns an error if `max_attempts` is 0 (at least 1 attempt is required)
    pub fn new(
        max_attempts: u32,
        retryable_status_codes: Vec<u16>,
        backoff_ms: u64,
    ) -> Result<Self, &'static str> {
        if max_attempts == 0 {
            return Err("max_attempts must be at least 1");
        }
        Ok(Self {
            max_attempts,
            retryable_status_codes,
            backoff_ms,
        })
    }

    /// Total attempts allowed, including the first
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// HTTP status codes that are retried against the same identity
    pub fn retryable_status_codes(&self) -> &[u16] {
        &self.retryable_status_codes
    }

    /// Base backoff in milliseconds (doubles each retry)
    pub fn backoff_ms(&self) -> u64 {
        self.backoff_ms
    }

    /// Whether the given HTTP status is retried by this policy
    pub fn retries_status(&self, status: u16) -> bool {
        self.retryable_status_codes.contains(&status)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            retryable_status_codes: DEFAULT_RETRYABLE_STATUS_CODES.to_vec(),
            backoff_ms: DEFAULT_RETRY_BACKOFF_MS,
        }
    }
}

/// A (model name, credential, retry policy) tuple used for one invocation attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelIdentity {
    name: String,
    credential: Credential,
    retry: RetryPolicy,
}

impl ModelIdentity {
    pub fn new(name: impl Into<String>, credential: Credential, retry: RetryPolicy) -> Self {
        Self {
            name: name.into(),
            credential,
            retry,
        }
    }

    /// Get the model name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the credential used for this identity
    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Get the transport retry policy
    pub fn retry(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Same model and retry policy, different credential
    pub fn with_credential(&self, credential: Credential) -> Self {
        Self {
            name: self.name.clone(),
            credential,
            retry: self.retry.clone(),
        }
    }
}

/// One prompt addressed to one model identity
#[derive(Debug, Clone, Copy)]
pub struct InvocationRequest<'a> {
    prompt: &'a str,
    identity: &'a ModelIdentity,
}

impl<'a> InvocationRequest<'a> {
    pub fn new(prompt: &'a str, identity: &'a ModelIdentity) -> Self {
        Self { prompt, identity }
    }

    pub fn prompt(&self) -> &'a str {
        self.prompt
    }

    pub fn identity(&self) -> &'a ModelIdentity {
        self.identity
    }
}
