//! Command-line interface for FoundersLens
//!
//! Provides argument parsing and subcommand handling for the FoundersLens binary.

use clap::{Parser, Subcommand};

/// Structured startup-idea analysis backed by Gemini models
#[derive(Parser)]
#[command(name = "founderslens")]
#[command(version)]
#[command(about = "Structured startup-idea analysis backed by Gemini models")]
#[command(
    long_about = "FoundersLens turns a startup idea and an industry into a structured market \
    and strategy report. Requests go to a primary model first and fall back to a second \
    model when the primary runs out of quota."
)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml", global = true)]
    pub config: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server (default)
    Serve,

    /// Generate a template configuration file
    Config {
        /// Output file path (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Analyze one idea and print the report as JSON
    Analyze {
        /// The startup idea to analyze
        #[arg(long)]
        idea: String,

        /// Industry the idea competes in
        #[arg(long)]
        industry: String,

        /// Extra context for the analyst (target market, constraints)
        #[arg(long, default_value = "")]
        extra_context: String,
    },
}

/// Generate template configuration content
pub fn generate_config_template() -> &'static str {
    r#"# FoundersLens Configuration
# ==========================
#
# This file configures the HTTP server, the analyst models, where the default
# API key comes from, and observability settings.

# ─────────────────────────────────────────────────────────────────────────────
# SERVER CONFIGURATION
# ─────────────────────────────────────────────────────────────────────────────

[server]
# IP address to bind to (0.0.0.0 for all interfaces, 127.0.0.1 for localhost only)
host = "0.0.0.0"

# Port to listen on
port = 8000

# Upper bound in seconds for one call to the model backend (1-600)
request_timeout_seconds = 120

# ─────────────────────────────────────────────────────────────────────────────
# MODELS
# ─────────────────────────────────────────────────────────────────────────────
#
# The primary model is tried first. When it reports an exhausted quota the
# request moves to the fallback model. Requests that bring their own API key
# go straight to the fallback model with that key.

[models]
base_url = "https://generativelanguage.googleapis.com/v1beta"
primary = "gemini-2.5-flash-lite"
fallback = "gemini-2.5-flash"

# Attach the Google Search grounding tool to every request
search_grounding = false

# Transport-level retries against the same model (not model fallback)
[models.retry]
attempts = 1
http_status_codes = [500, 503, 504]
backoff_ms = 100

# ─────────────────────────────────────────────────────────────────────────────
# CREDENTIALS
# ─────────────────────────────────────────────────────────────────────────────

[credentials]
# Environment variable holding the default API key. The server refuses to
# start when it is missing.
api_key_env = "GOOGLE_API_KEY"

# ─────────────────────────────────────────────────────────────────────────────
# OBSERVABILITY
# ─────────────────────────────────────────────────────────────────────────────

[observability]
# Log level: "trace", "debug", "info", "warn", "error"
log_level = "info"

# Prometheus metrics are always available at /metrics on the server port
"#
}
