//! Response Parser: Turns raw LLM text into a provisional JSON object.
//!
//! Models wrap JSON in code fences despite being told not to. Handled shapes:
//! a ```json fence anywhere in the text, a bare ``` fence around the whole
//! text, or no fence at all. Anything fancier is not this module's problem.

use serde_json::{Map, Value};
use thiserror::Error;

/// Max characters of the raw response carried in a `ParseError`.
pub const PREVIEW_CHARS: usize = 200;

const JSON_FENCE: &str = "```json";
const FENCE: &str = "```";

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("response is not valid JSON ({source}); raw response: {preview}")]
    InvalidJson {
        preview: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("response JSON is not an object; raw response: {preview}")]
    NotAnObject { preview: String },
}

impl ParseError {
    /// The capped raw-response snippet, for operator diagnostics.
    pub fn preview(&self) -> &str {
        match self {
            ParseError::InvalidJson { preview, .. } | ParseError::NotAnObject { preview } => {
                preview
            }
        }
    }
}

/// A decoded JSON object that has not been checked for the required email fields.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEmailRecord(Map<String, Value>);

impl RawEmailRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

/// Strips code fences and decodes the remainder as a JSON object.
pub fn parse_response(raw: &str) -> Result<RawEmailRecord, ParseError> {
    let cleaned = strip_code_fences(raw);

    let value: Value =
        serde_json::from_str(cleaned).map_err(|source| ParseError::InvalidJson {
            preview: preview(raw),
            source,
        })?;

    match value {
        Value::Object(fields) => Ok(RawEmailRecord(fields)),
        _ => Err(ParseError::NotAnObject {
            preview: preview(raw),
        }),
    }
}

/// Removes one layer of ```json ... ``` or ``` ... ``` fencing.
///
/// For ```json the span runs from the first opening marker to the LAST ```,
/// so stray fences inside the body do not cut it short. If no closing fence
/// follows the opener, the trimmed text is returned untouched.
pub fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();

    if let Some(open) = text.find(JSON_FENCE) {
        let start = open + JSON_FENCE.len();
        return match text.rfind(FENCE) {
            Some(end) if end > start => text[start..end].trim(),
            _ => text,
        };
    }

    text.strip_prefix(FENCE)
        .and_then(|inner| inner.strip_suffix(FENCE))
        .map(str::trim)
        .unwrap_or(text)
}

fn preview(raw: &str) -> String {
    let mut chars = raw.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
