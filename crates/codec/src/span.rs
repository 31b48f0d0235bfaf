//! Capability traits shared by every wire encoding
//!
//! A decoder produces values implementing [`Span`]; inference and trace
//! assembly only ever see these traits, never the wire structs.

use crate::error::Result;
use chrono::{DateTime, TimeDelta, Utc};

/// Annotation value recorded by the server when a request arrives
pub const SERVER_RECV: &str = "sr";

/// Binary annotation key naming a local (non-RPC) component
pub const LOCAL_COMPONENT: &str = "lc";

/// Service name reported when no endpoint can be resolved
pub const UNKNOWN_SERVICE_NAME: &str = "unknown";

/// Service identity of a span, annotation or binary annotation
pub trait Endpoint {
    /// Address, optionally with `:port`
    fn host(&self) -> String;

    /// Service name
    fn name(&self) -> &str;
}

/// A timestamped event within a span
pub trait Annotation {
    fn timestamp(&self) -> DateTime<Utc>;
    fn value(&self) -> &str;
    fn host(&self) -> Option<&dyn Endpoint>;
}

/// A key/value tag attached to a span
pub trait BinaryAnnotation {
    fn key(&self) -> &str;

    /// Value decoded to its string form; empty when it cannot be decoded
    fn value(&self) -> String;

    fn host(&self) -> Option<&dyn Endpoint>;
}

/// A span as received on the wire
pub trait Span {
    /// Normalized trace ID
    fn trace(&self) -> Result<String>;

    /// Normalized span ID
    fn id(&self) -> Result<String>;

    /// Normalized parent ID, `None` for a root span
    fn parent(&self) -> Result<Option<String>>;

    fn name(&self) -> &str;

    fn annotations(&self) -> Vec<&dyn Annotation>;

    /// Binary annotations that carry data, checked for key/value pairing
    fn binary_annotations(&self) -> Result<Vec<&dyn BinaryAnnotation>>;

    /// Explicit start time, `None` when the wire data omits it
    fn timestamp(&self) -> Option<DateTime<Utc>>;

    /// Explicit duration, zero when the wire data omits it
    fn duration(&self) -> TimeDelta;

    /// Check trace ID, span ID, parent ID and binary annotations, in that
    /// order, stopping at the first failure.
    fn validate(&self) -> Result<()> {
        self.trace()?;
        self.id()?;
        self.parent()?;
        self.binary_annotations()?;
        Ok(())
    }
}

/// Endpoint used when none of a span's annotations name one
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultEndpoint;

pub(crate) static DEFAULT_ENDPOINT: DefaultEndpoint = DefaultEndpoint;

impl Endpoint for DefaultEndpoint {
    fn host(&self) -> String {
        String::new()
    }

    fn name(&self) -> &str {
        UNKNOWN_SERVICE_NAME
    }
}
