//! Logging setup
//!
//! All log output goes to stderr. Stdout belongs to command output: the
//! `analyze` and `config` subcommands print their result there and must stay
//! machine-readable.

use std::io::IsTerminal;
use std::sync::Once;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: Once = Once::new();

const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Filter directive used when `RUST_LOG` is not set
///
/// Unknown levels fall back to `info` rather than silencing the crate.
pub fn default_directive(level: &str) -> String {
    let level = level.trim().to_ascii_lowercase();
    let level = if LEVELS.contains(&level.as_str()) {
        level
    } else {
        "info".to_string()
    };
    format!("founderslens={},tower_http=debug", level)
}

/// Install the global subscriber
///
/// Only the first call has an effect. `RUST_LOG` overrides `default_level`.
/// ANSI colors are enabled only when stderr is a terminal.
pub fn init(default_level: &str) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directive(default_level)));

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(std::io::stderr().is_terminal());

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    });
}
