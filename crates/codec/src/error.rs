//! Error types for span decoding and trace assembly

use std::fmt;
use thiserror::Error;

/// Result type for codec operations
pub type Result<T> = std::result::Result<T, CodecError>;

/// Identifier field a failure refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdField {
    TraceId,
    SpanId,
    ParentId,
}

impl fmt::Display for IdField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdField::TraceId => write!(f, "trace ID"),
            IdField::SpanId => write!(f, "span ID"),
            IdField::ParentId => write!(f, "parent ID"),
        }
    }
}

/// Side of a binary annotation that was left empty
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptySide {
    Key,
    Value,
}

impl fmt::Display for EmptySide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmptySide::Key => write!(f, "key"),
            EmptySide::Value => write!(f, "value"),
        }
    }
}

/// Reasons a hexadecimal identifier is rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    /// More hex characters than the identifier width allows
    #[error("length cannot be greater than {max} hex characters")]
    TooLong { max: usize },

    /// Not a valid unsigned hexadecimal number
    #[error("not a valid hexadecimal number")]
    NotHex,
}

/// Errors that can occur while decoding spans or assembling a trace
#[derive(Error, Debug)]
pub enum CodecError {
    /// The payload could not be deserialized into wire spans
    #[error("Malformed payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    /// An identifier is too long or not hexadecimal
    #[error("Invalid {field} {value:?}: {source}")]
    InvalidId {
        field: IdField,
        value: String,
        #[source]
        source: IdError,
    },

    /// A binary annotation has a key without a value or a value without a key
    #[error("Invalid binaryAnnotations[{index}]: empty {empty}")]
    InvalidBinaryAnnotation { index: usize, empty: EmptySide },

    /// A required identifier was empty
    #[error("{0} cannot be null")]
    MissingRequiredId(IdField),

    /// The payload is larger than the configured limit
    #[error("Payload of {size} bytes exceeds the limit of {limit} bytes")]
    PayloadTooLarge { size: usize, limit: usize },

    /// No decoder exists for the requested encoding
    #[error("Unsupported encoding: {0}")]
    UnsupportedEncoding(String),
}

impl CodecError {
    pub(crate) fn invalid_id(field: IdField, value: &str, source: IdError) -> Self {
        CodecError::InvalidId {
            field,
            value: value.to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CodecError::invalid_id(IdField::SpanId, "xyz", IdError::NotHex);
        assert_eq!(
            err.to_string(),
            r#"Invalid span ID "xyz": not a valid hexadecimal number"#
        );

        let err = CodecError::InvalidBinaryAnnotation {
            index: 2,
            empty: EmptySide::Value,
        };
        assert_eq!(err.to_string(), "Invalid binaryAnnotations[2]: empty value");

        let err = CodecError::MissingRequiredId(IdField::TraceId);
        assert_eq!(err.to_string(), "trace ID cannot be null");
    }
}
