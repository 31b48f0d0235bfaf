//! Canonical trace representation
//!
//! These are the values handed back to the caller once a batch has been
//! decoded, validated and had its missing fields inferred.

use chrono::{DateTime, TimeDelta, Utc};
use serde::ser::Error as _;
use serde::{Serialize, Serializer};

/// Ordered spans of one decoded batch, in wire order
pub type Trace = Vec<Span>;

/// A fully resolved span
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Span {
    pub id: String,
    pub trace_id: String,
    /// Equal to `id` for a root span
    pub parent_id: String,
    pub name: String,
    pub service_name: String,
    pub timestamp: DateTime<Utc>,
    #[serde(serialize_with = "serialize_micros")]
    pub duration: TimeDelta,
    pub annotations: Vec<Annotation>,
    pub binary_annotations: Vec<BinaryAnnotation>,
}

impl Span {
    pub fn is_root(&self) -> bool {
        self.parent_id == self.id
    }
}

/// An annotation carrying the span-wide endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    pub timestamp: DateTime<Utc>,
    pub value: String,
    pub host: String,
    pub service_name: String,
}

/// A binary annotation carrying the span-wide endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BinaryAnnotation {
    pub key: String,
    pub value: String,
    pub host: String,
    pub service_name: String,
}

fn serialize_micros<S: Serializer>(d: &TimeDelta, s: S) -> Result<S::Ok, S::Error> {
    let micros = d
        .num_microseconds()
        .ok_or_else(|| S::Error::custom(format!("duration {} overflows microseconds", d)))?;
    s.serialize_i64(micros)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_serializes_duration_as_micros() {
        let span = Span {
            id: "1".to_string(),
            trace_id: "2".to_string(),
            parent_id: "1".to_string(),
            name: "get".to_string(),
            service_name: "frontend".to_string(),
            timestamp: DateTime::from_timestamp(1, 0).unwrap(),
            duration: TimeDelta::milliseconds(3),
            annotations: Vec::new(),
            binary_annotations: Vec::new(),
        };

        let json = serde_json::to_value(&span).unwrap();
        assert_eq!(json["duration"], 3000);
        assert_eq!(json["parentId"], "1");
        assert_eq!(json["timestamp"], "1970-01-01T00:00:01Z");
        assert!(span.is_root());
    }

    #[test]
    fn test_span_duration_overflowing_micros_fails_to_serialize() {
        let span = Span {
            id: "1".to_string(),
            trace_id: "2".to_string(),
            parent_id: "1".to_string(),
            name: "get".to_string(),
            service_name: "frontend".to_string(),
            timestamp: DateTime::from_timestamp(1, 0).unwrap(),
            duration: TimeDelta::MAX,
            annotations: Vec::new(),
            binary_annotations: Vec::new(),
        };

        assert!(serde_json::to_value(&span).is_err());
    }
}
