//! Two-stage JSON extraction for model replies.

use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;

lazy_static::lazy_static! {
    // Greedy: first `{` through the last `}`.
    static ref BRACED: Regex = Regex::new(r"\{[\s\S]*\}").expect("static regex");
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("reply is not JSON ({strict}) and contains no braced object")]
    NoObjectFound {
        strict: serde_json::Error,
        raw: String,
    },

    #[error("reply is not JSON ({strict}) and the braced span failed too ({extracted})")]
    ExtractedInvalid {
        strict: serde_json::Error,
        extracted: serde_json::Error,
        raw: String,
    },

    #[error("reply is JSON {kind}, expected an object")]
    NotAnObject { kind: &'static str, raw: String },
}

impl ParseError {
    /// The provider text that failed to parse.
    pub fn raw(&self) -> &str {
        match self {
            ParseError::NoObjectFound { raw, .. }
            | ParseError::ExtractedInvalid { raw, .. }
            | ParseError::NotAnObject { raw, .. } => raw,
        }
    }
}

/// Parse `text` strictly, falling back to the outermost braced span.
pub fn coerce(text: &str) -> Result<Map<String, Value>, ParseError> {
    let strict = match serde_json::from_str::<Value>(text) {
        Ok(value) => return into_object(value, text),
        Err(err) => err,
    };
    tracing::error!("Failed to parse JSON response: {}", text);

    let Some(span) = BRACED.find(text) else {
        return Err(ParseError::NoObjectFound {
            strict,
            raw: text.to_string(),
        });
    };

    match serde_json::from_str::<Value>(span.as_str()) {
        Ok(value) => into_object(value, text),
        Err(extracted) => {
            tracing::error!("Failed to parse extracted JSON");
            Err(ParseError::ExtractedInvalid {
                strict,
                extracted,
                raw: text.to_string(),
            })
        }
    }
}

fn into_object(value: Value, raw: &str) -> Result<Map<String, Value>, ParseError> {
    let kind = match value {
        Value::Object(map) => return Ok(map),
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
    };
    Err(ParseError::NotAnObject {
        kind,
        raw: raw.to_string(),
    })
}
