//! Selection of a wire decoder and the decode entry point

use crate::assemble::new_trace;
use crate::clock::Clock;
use crate::error::{CodecError, Result};
use crate::json_v1::JsonV1;
use crate::span::Span;
use crate::trace::Trace;
use std::fmt;
use std::str::FromStr;

/// Turns an encoded request body into validated wire spans
pub trait Decoder {
    type Span: Span;

    /// Deserialize and validate every span, failing on the first invalid one
    fn decode(&self, octets: &[u8]) -> Result<Vec<Self::Span>>;
}

/// Wire encodings that have a decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    #[default]
    JsonV1,
}

impl Encoding {
    /// Pick the encoding for an HTTP `Content-Type` header
    pub fn from_content_type(content_type: &str) -> Result<Self> {
        let mime = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match mime.as_str() {
            "application/json" => Ok(Encoding::JsonV1),
            _ => Err(CodecError::UnsupportedEncoding(content_type.to_string())),
        }
    }
}

impl FromStr for Encoding {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "json_v1" => Ok(Encoding::JsonV1),
            other => Err(CodecError::UnsupportedEncoding(other.to_string())),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoding::JsonV1 => write!(f, "json_v1"),
        }
    }
}

/// Decode a request body and assemble its canonical trace
pub fn decode_trace(encoding: Encoding, octets: &[u8], clock: &dyn Clock) -> Result<Trace> {
    match encoding {
        Encoding::JsonV1 => new_trace(&JsonV1.decode(octets)?, clock),
    }
}
