//! Configuration management for FoundersLens
//!
//! Parses TOML configuration files and provides typed access to settings.
//! The default API credential is not stored in the file: it is read from the
//! environment variable named by `credentials.api_key_env` at startup.

use crate::error::{AppError, AppResult};
use crate::models::{Credential, ModelIdentity, RetryPolicy};
use crate::models::identity::{DEFAULT_RETRY_BACKOFF_MS, DEFAULT_RETRYABLE_STATUS_CODES};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Maximum request timeout in seconds (10 minutes)
const MAX_REQUEST_TIMEOUT_SECONDS: u64 = 600;

/// Maximum transport attempts per identity
const MAX_RETRY_ATTEMPTS: u32 = 10;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub models: ModelsConfig,
    #[serde(default)]
    pub credentials: CredentialsConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Upper bound for one HTTP call to the model backend
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_request_timeout() -> u64 {
    120
}

/// Model configuration: backend location, primary and fallback model names
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelsConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Cheaper model with a stricter quota, tried first
    #[serde(default = "default_primary_model")]
    pub primary: String,
    /// Model used after the primary runs out of quota, and for custom keys
    #[serde(default = "default_fallback_model")]
    pub fallback: String,
    /// Attach the Google Search grounding tool to requests
    #[serde(default)]
    pub search_grounding: bool,
    #[serde(default)]
    pub retry: RetryConfig,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            primary: default_primary_model(),
            fallback: default_fallback_model(),
            search_grounding: false,
            retry: RetryConfig::default(),
        }
    }
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_primary_model() -> String {
    "gemini-2.5-flash-lite".to_string()
}

fn default_fallback_model() -> String {
    "gemini-2.5-flash".to_string()
}

impl ModelsConfig {
    /// Primary identity bound to `credential`
    pub fn primary_identity(&self, credential: Credential) -> AppResult<ModelIdentity> {
        Ok(ModelIdentity::new(
            self.primary.clone(),
            credential,
            self.retry.policy()?,
        ))
    }

    /// Fallback identity bound to `credential`
    pub fn fallback_identity(&self, credential: Credential) -> AppResult<ModelIdentity> {
        Ok(ModelIdentity::new(
            self.fallback.clone(),
            credential,
            self.retry.policy()?,
        ))
    }
}

/// Transport retry policy applied to every identity
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RetryConfig {
    #[serde(default = "default_attempts")]
    pub attempts: u32,
    #[serde(default = "default_status_codes")]
    pub http_status_codes: Vec<u16>,
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            attempts: default_attempts(),
            http_status_codes: default_status_codes(),
            backoff_ms: default_backoff_ms(),
        }
    }
}

fn default_attempts() -> u32 {
    1
}

fn default_status_codes() -> Vec<u16> {
    DEFAULT_RETRYABLE_STATUS_CODES.to_vec()
}

fn default_backoff_ms() -> u64 {
    DEFAULT_RETRY_BACKOFF_MS
}

impl RetryConfig {
    /// Build the validated retry policy
    pub fn policy(&self) -> AppResult<RetryPolicy> {
        RetryPolicy::new(self.attempts, self.http_status_codes.clone(), self.backoff_ms)
            .map_err(|e| AppError::Config(format!("models.retry: {}", e)))
    }
}

/// Where the default credential comes from
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CredentialsConfig {
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_api_key_env(),
        }
    }
}

fn default_api_key_env() -> String {
    "GOOGLE_API_KEY".to_string()
}

/// Observability configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let path_display = path.as_ref().display().to_string();

        // Phase 1: Read file (preserves io::Error context)
        let content =
            std::fs::read_to_string(path.as_ref()).map_err(|source| AppError::ConfigFileRead {
                path: path_display.clone(),
                source,
            })?;

        // Phase 2: Parse TOML (preserves toml::de::Error context)
        let config: Self =
            toml::from_str(&content).map_err(|source| AppError::ConfigParseFailed {
                path: path_display.clone(),
                source,
            })?;

        // Phase 3: Validate parsed config (provides contextual reason)
        config
            .validate()
            .map_err(|e| AppError::ConfigValidationFailed {
                path: path_display,
                reason: e.to_string(),
            })?;

        Ok(config)
    }

    /// Validate configuration after parsing
    ///
    /// This is called automatically by `from_file()` and `from_str()`.
    pub fn validate(&self) -> AppResult<()> {
        if self.server.request_timeout_seconds == 0 {
            return Err(AppError::Config(
                "server.request_timeout_seconds must be greater than 0".to_string(),
            ));
        }
        if self.server.request_timeout_seconds > MAX_REQUEST_TIMEOUT_SECONDS {
            return Err(AppError::Config(format!(
                "server.request_timeout_seconds cannot exceed {} seconds, got {}",
                MAX_REQUEST_TIMEOUT_SECONDS, self.server.request_timeout_seconds
            )));
        }

        if !self.models.base_url.starts_with("http://")
            && !self.models.base_url.starts_with("https://")
        {
            return Err(AppError::Config(format!(
                "models.base_url '{}' must start with 'http://' or 'https://'",
                self.models.base_url
            )));
        }

        for (field, name) in [
            ("models.primary", &self.models.primary),
            ("models.fallback", &self.models.fallback),
        ] {
            if name.trim().is_empty() {
                return Err(AppError::Config(format!("{} cannot be empty", field)));
            }
            if name.contains('/') || name.contains(':') {
                return Err(AppError::Config(format!(
                    "{} '{}' must be a bare model name (no '/' or ':')",
                    field, name
                )));
            }
        }

        let retry = &self.models.retry;
        if retry.attempts == 0 || retry.attempts > MAX_RETRY_ATTEMPTS {
            return Err(AppError::Config(format!(
                "models.retry.attempts must be between 1 and {}, got {}",
                MAX_RETRY_ATTEMPTS, retry.attempts
            )));
        }
        if let Some(code) = retry
            .http_status_codes
            .iter()
            .find(|code| !(100..=599).contains(*code))
        {
            return Err(AppError::Config(format!(
                "models.retry.http_status_codes contains invalid HTTP status {}",
                code
            )));
        }

        if self.credentials.api_key_env.trim().is_empty() {
            return Err(AppError::Config(
                "credentials.api_key_env cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Resolve the default credential from the process environment
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the variable is unset or blank; the
    /// server must not start without a default credential.
    pub fn resolve_credential(&self) -> AppResult<Credential> {
        self.resolve_credential_with(|name| std::env::var(name).ok())
    }

    /// Resolve the default credential through a custom variable lookup
    pub fn resolve_credential_with<F>(&self, lookup: F) -> AppResult<Credential>
    where
        F: FnOnce(&str) -> Option<String>,
    {
        let var = &self.credentials.api_key_env;
        lookup(var).and_then(Credential::new).ok_or_else(|| {
            AppError::Config(format!(
                "{} is missing. Set it in the environment before starting the server.",
                var
            ))
        })
    }
}

impl FromStr for Config {
    type Err = AppError;

    fn from_str(toml_str: &str) -> Result<Self, Self::Err> {
        let config: Config =
            toml::from_str(toml_str).map_err(|source| AppError::ConfigParseFailed {
                path: "<string>".to_string(),
                source,
            })?;

        config.validate()?;
        Ok(config)
    }
}
