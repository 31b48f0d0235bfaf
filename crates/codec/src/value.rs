//! Typed binary annotation values
//!
//! Zipkin v1 binary annotations carry their value as raw JSON plus an
//! out-of-band type tag. Decoding is best-effort: a value that does not match
//! its tag renders as an empty string instead of failing the span.

use serde::de::DeserializeOwned;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Type tag of a binary annotation value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnnotationType {
    Bool,
    Bytes,
    I16,
    I32,
    I64,
    Double,
    #[default]
    String,
}

impl AnnotationType {
    /// Resolve a wire tag, treating a missing or unknown tag as STRING
    pub fn from_tag(tag: Option<&str>) -> Self {
        tag.and_then(|t| t.parse().ok()).unwrap_or_default()
    }
}

impl FromStr for AnnotationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BOOL" => Ok(AnnotationType::Bool),
            "BYTES" => Ok(AnnotationType::Bytes),
            "I16" => Ok(AnnotationType::I16),
            "I32" => Ok(AnnotationType::I32),
            "I64" => Ok(AnnotationType::I64),
            "DOUBLE" => Ok(AnnotationType::Double),
            "STRING" => Ok(AnnotationType::String),
            other => Err(format!("not a valid AnnotationType string: {}", other)),
        }
    }
}

impl fmt::Display for AnnotationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnnotationType::Bool => write!(f, "BOOL"),
            AnnotationType::Bytes => write!(f, "BYTES"),
            AnnotationType::I16 => write!(f, "I16"),
            AnnotationType::I32 => write!(f, "I32"),
            AnnotationType::I64 => write!(f, "I64"),
            AnnotationType::Double => write!(f, "DOUBLE"),
            AnnotationType::String => write!(f, "STRING"),
        }
    }
}

/// Render a raw JSON value according to its type tag
///
/// A JSON `null` renders as the zero value of the tagged type; BYTES keeps
/// the raw text.
pub fn decode_value(raw: &str, kind: AnnotationType) -> String {
    if raw.trim() == "null" {
        return match kind {
            AnnotationType::Bool => "false".to_string(),
            AnnotationType::Bytes => raw.to_string(),
            AnnotationType::I16
            | AnnotationType::I32
            | AnnotationType::I64
            | AnnotationType::Double => "0".to_string(),
            AnnotationType::String => String::new(),
        };
    }

    let decoded = match kind {
        AnnotationType::Bool => parse::<bool>(raw).map(|v| v.to_string()),
        AnnotationType::Bytes => Some(raw.to_string()),
        AnnotationType::I16 | AnnotationType::I32 | AnnotationType::I64 => {
            parse::<i64>(raw).map(|v| v.to_string())
        }
        // f64's Display is the shortest representation that round-trips
        AnnotationType::Double => parse::<f64>(raw).map(|v| v.to_string()),
        AnnotationType::String => parse::<String>(raw),
    };

    decoded.unwrap_or_else(|| {
        debug!("Could not decode binary annotation value {} as {}", raw, kind);
        String::new()
    })
}

fn parse<T: DeserializeOwned>(raw: &str) -> Option<T> {
    serde_json::from_str(raw).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_tag() {
        assert_eq!(AnnotationType::from_tag(Some("BOOL")), AnnotationType::Bool);
        assert_eq!(AnnotationType::from_tag(Some("I32")), AnnotationType::I32);
        assert_eq!(AnnotationType::from_tag(Some("bool")), AnnotationType::String);
        assert_eq!(AnnotationType::from_tag(Some("nope")), AnnotationType::String);
        assert_eq!(AnnotationType::from_tag(None), AnnotationType::String);
    }

    #[test]
    fn test_bool() {
        assert_eq!(decode_value("true", AnnotationType::Bool), "true");
        assert_eq!(decode_value("false", AnnotationType::Bool), "false");
        assert_eq!(decode_value(r#""true""#, AnnotationType::Bool), "");
    }

    #[test]
    fn test_bytes_are_returned_verbatim() {
        assert_eq!(
            decode_value(r#""AQID""#, AnnotationType::Bytes),
            r#""AQID""#
        );
        assert_eq!(decode_value("[1, 2]", AnnotationType::Bytes), "[1, 2]");
    }

    #[test]
    fn test_integers() {
        assert_eq!(decode_value("42", AnnotationType::I16), "42");
        assert_eq!(decode_value("-7", AnnotationType::I32), "-7");
        assert_eq!(
            decode_value("9223372036854775807", AnnotationType::I64),
            "9223372036854775807"
        );
        assert_eq!(decode_value("1.5", AnnotationType::I64), "");
        assert_eq!(decode_value(r#""42""#, AnnotationType::I32), "");
    }

    #[test]
    fn test_double_shortest_representation() {
        assert_eq!(decode_value("1.5", AnnotationType::Double), "1.5");
        assert_eq!(decode_value("1.0", AnnotationType::Double), "1");
        assert_eq!(decode_value("0.1", AnnotationType::Double), "0.1");
        assert_eq!(decode_value("3", AnnotationType::Double), "3");
        assert_eq!(decode_value("abc", AnnotationType::Double), "");
    }

    #[test]
    fn test_string() {
        assert_eq!(decode_value(r#""x""#, AnnotationType::String), "x");
        assert_eq!(
            decode_value(r#""line\nbreak""#, AnnotationType::String),
            "line\nbreak"
        );
        assert_eq!(decode_value("12", AnnotationType::String), "");
    }

    #[test]
    fn test_null_is_zero_value() {
        assert_eq!(decode_value("null", AnnotationType::Bool), "false");
        assert_eq!(decode_value("null", AnnotationType::I16), "0");
        assert_eq!(decode_value("null", AnnotationType::I64), "0");
        assert_eq!(decode_value("null", AnnotationType::Double), "0");
        assert_eq!(decode_value("null", AnnotationType::String), "");
        assert_eq!(decode_value("null", AnnotationType::Bytes), "null");
    }

    #[test]
    fn test_unknown_tag_falls_back_to_string() {
        let kind = AnnotationType::from_tag(Some("UNKNOWN"));
        assert_eq!(decode_value(r#""x""#, kind), "x");
    }
}
