//! Normalization of hexadecimal trace and span identifiers
//!
//! Zipkin producers mix 64-bit and 128-bit trace IDs and may or may not pad
//! them with leading zeros. Every identifier is parsed as unsigned hex and
//! re-rendered in lowercase, so two spellings of the same ID compare equal.

use crate::error::IdError;

/// Maximum hex characters in a span (or parent) ID
pub const SPAN_ID_MAX_LEN: usize = 16;

/// Maximum hex characters in a trace ID
pub const TRACE_ID_MAX_LEN: usize = 32;

/// Normalize a 64-bit span ID, dropping leading zeros
pub fn normalize_span_id(s: &str) -> Result<String, IdError> {
    if s.len() > SPAN_ID_MAX_LEN {
        return Err(IdError::TooLong {
            max: SPAN_ID_MAX_LEN,
        });
    }
    Ok(format!("{:x}", parse_hex_u64(s)?))
}

/// Normalize a 64-bit or 128-bit trace ID
///
/// IDs longer than 16 characters are split into a high part and a trailing
/// 16-character low part. When the high part is zero the result is the same
/// as for a 64-bit ID; otherwise the low part is zero-padded to 16 digits.
pub fn normalize_trace_id(s: &str) -> Result<String, IdError> {
    if s.len() > TRACE_ID_MAX_LEN {
        return Err(IdError::TooLong {
            max: TRACE_ID_MAX_LEN,
        });
    }
    if s.len() <= SPAN_ID_MAX_LEN {
        return normalize_span_id(s);
    }

    // Non-ASCII input cannot be split on a byte boundary safely
    if !s.is_ascii() {
        return Err(IdError::NotHex);
    }
    let (high, low) = s.split_at(s.len() - SPAN_ID_MAX_LEN);
    let high = parse_hex_u64(high)?;
    let low = parse_hex_u64(low)?;

    if high == 0 {
        Ok(format!("{:x}", low))
    } else {
        Ok(format!("{:x}{:016x}", high, low))
    }
}

/// Parse an unsigned hex number; `from_str_radix` alone would accept a sign
fn parse_hex_u64(s: &str) -> Result<u64, IdError> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(IdError::NotHex);
    }
    u64::from_str_radix(s, 16).map_err(|_| IdError::NotHex)
}
