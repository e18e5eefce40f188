//! Response extractor
//!
//! Model output often wraps the JSON payload in prose or code fences. The
//! payload is taken as the span from the first `{` to the last `}` in the
//! text (a greedy span, not the first balanced object), then parsed.

use crate::analysis::report::StructuredReport;
use serde_json::Value;

/// Reasons raw model text could not be turned into a report
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Empty response from agent")]
    Empty,

    #[error("No valid JSON found in response")]
    NoJsonSpan,

    #[error("Invalid JSON payload: {0}")]
    InvalidJson(String),
}

/// Locate the greedy `{ ... }` span in `raw`
fn json_span(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&raw[start..=end])
}

/// Parse raw model text into a report
///
/// Missing `research` or `strategy` keys default to empty objects. Present
/// values are passed through as-is, whatever their inner shape.
pub fn extract(raw: &str) -> Result<StructuredReport, ParseError> {
    if raw.is_empty() {
        return Err(ParseError::Empty);
    }

    let span = json_span(raw).ok_or(ParseError::NoJsonSpan)?;
    let mut document: Value =
        serde_json::from_str(span).map_err(|e| ParseError::InvalidJson(e.to_string()))?;

    let mut take = |key: &str| {
        document
            .get_mut(key)
            .map(Value::take)
            .unwrap_or_else(|| Value::Object(Default::default()))
    };
    let research = take("research");
    let strategy = take("strategy");

    Ok(StructuredReport::new(research, strategy))
}
