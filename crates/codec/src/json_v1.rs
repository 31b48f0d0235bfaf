//! Zipkin v1 JSON encoding
//!
//! Bodies are a JSON array of spans as `POST`ed to `/api/v1/spans`. Every
//! span is validated as soon as the array has been parsed, and the first
//! invalid span rejects the whole batch.

use crate::clock::micros_to_time;
use crate::error::{CodecError, EmptySide, IdField, Result};
use crate::id::{normalize_span_id, normalize_trace_id};
use crate::span::{Annotation, BinaryAnnotation, Endpoint, Span};
use crate::value::{decode_value, AnnotationType};
use crate::Decoder;
use chrono::{DateTime, TimeDelta, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::value::RawValue;
use tracing::debug;

/// Decoder for Zipkin v1 JSON bodies
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonV1;

impl Decoder for JsonV1 {
    type Span = JsonSpan;

    fn decode(&self, octets: &[u8]) -> Result<Vec<JsonSpan>> {
        let spans: Vec<JsonSpan> = serde_json::from_slice(octets)?;
        for span in &spans {
            span.validate()?;
        }
        debug!("Decoded {} JSON v1 span(s)", spans.len());
        Ok(spans)
    }
}

/// A span exactly as it appears in a JSON v1 body
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonSpan {
    #[serde(default, deserialize_with = "nullable")]
    trace_id: String,
    #[serde(rename = "name", default, deserialize_with = "nullable")]
    span_name: String,
    #[serde(default, deserialize_with = "nullable")]
    parent_id: String,
    #[serde(rename = "id", default, deserialize_with = "nullable")]
    span_id: String,
    #[serde(rename = "timestamp", default)]
    time: Option<i64>,
    #[serde(rename = "duration", default)]
    dur: Option<i64>,
    #[serde(default, deserialize_with = "nullable")]
    debug: bool,
    #[serde(rename = "annotations", default, deserialize_with = "nullable")]
    anno: Vec<JsonAnnotation>,
    #[serde(rename = "binaryAnnotations", default, deserialize_with = "nullable")]
    b_anno: Vec<JsonBinaryAnnotation>,
}

impl JsonSpan {
    /// Whether the producer forced this span to be sampled
    pub fn debug(&self) -> bool {
        self.debug
    }
}

impl Span for JsonSpan {
    fn trace(&self) -> Result<String> {
        if self.trace_id.is_empty() {
            return Err(CodecError::MissingRequiredId(IdField::TraceId));
        }
        normalize_trace_id(&self.trace_id)
            .map_err(|e| CodecError::invalid_id(IdField::TraceId, &self.trace_id, e))
    }

    fn id(&self) -> Result<String> {
        if self.span_id.is_empty() {
            return Err(CodecError::MissingRequiredId(IdField::SpanId));
        }
        normalize_span_id(&self.span_id)
            .map_err(|e| CodecError::invalid_id(IdField::SpanId, &self.span_id, e))
    }

    fn parent(&self) -> Result<Option<String>> {
        if self.parent_id.is_empty() {
            return Ok(None);
        }
        normalize_span_id(&self.parent_id)
            .map(Some)
            .map_err(|e| CodecError::invalid_id(IdField::ParentId, &self.parent_id, e))
    }

    fn name(&self) -> &str {
        &self.span_name
    }

    fn annotations(&self) -> Vec<&dyn Annotation> {
        self.anno.iter().map(|a| a as &dyn Annotation).collect()
    }

    fn binary_annotations(&self) -> Result<Vec<&dyn BinaryAnnotation>> {
        let mut res: Vec<&dyn BinaryAnnotation> = Vec::with_capacity(self.b_anno.len());
        for (index, b) in self.b_anno.iter().enumerate() {
            let key_empty = b.key().is_empty();
            let value_empty = b.value().is_empty();
            match (key_empty, value_empty) {
                (false, true) => {
                    return Err(CodecError::InvalidBinaryAnnotation {
                        index,
                        empty: EmptySide::Value,
                    })
                }
                (true, false) => {
                    return Err(CodecError::InvalidBinaryAnnotation {
                        index,
                        empty: EmptySide::Key,
                    })
                }
                // Neither key nor value: nothing to keep
                (true, true) => continue,
                (false, false) => res.push(b),
            }
        }
        Ok(res)
    }

    fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.time.and_then(micros_to_time)
    }

    fn duration(&self) -> TimeDelta {
        self.dur.map(TimeDelta::microseconds).unwrap_or_else(TimeDelta::zero)
    }
}

/// A timestamped event of a JSON v1 span
#[derive(Debug, Clone, Deserialize)]
pub struct JsonAnnotation {
    #[serde(default)]
    endpoint: Option<JsonEndpoint>,
    #[serde(rename = "timestamp", default = "epoch", deserialize_with = "annotation_time")]
    time: DateTime<Utc>,
    #[serde(rename = "value", default, deserialize_with = "nullable")]
    val: String,
}

impl Annotation for JsonAnnotation {
    fn timestamp(&self) -> DateTime<Utc> {
        self.time
    }

    fn value(&self) -> &str {
        &self.val
    }

    fn host(&self) -> Option<&dyn Endpoint> {
        self.endpoint.as_ref().map(|e| e as &dyn Endpoint)
    }
}

/// A key/value tag of a JSON v1 span with its raw, typed value
#[derive(Debug, Clone, Deserialize)]
pub struct JsonBinaryAnnotation {
    #[serde(rename = "key", default, deserialize_with = "nullable")]
    k: String,
    // Present but `null` is kept as raw `null`; only an absent value is `None`
    #[serde(rename = "value", default, deserialize_with = "raw_value")]
    v: Option<Box<RawValue>>,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    endpoint: Option<JsonEndpoint>,
}

impl BinaryAnnotation for JsonBinaryAnnotation {
    fn key(&self) -> &str {
        &self.k
    }

    fn value(&self) -> String {
        match &self.v {
            Some(raw) => decode_value(raw.get(), AnnotationType::from_tag(self.kind.as_deref())),
            None => String::new(),
        }
    }

    fn host(&self) -> Option<&dyn Endpoint> {
        self.endpoint.as_ref().map(|e| e as &dyn Endpoint)
    }
}

/// Network endpoint of a JSON v1 annotation
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonEndpoint {
    #[serde(default, deserialize_with = "nullable")]
    service_name: String,
    #[serde(default, deserialize_with = "nullable")]
    ipv4: String,
    #[serde(default, deserialize_with = "nullable")]
    ipv6: String,
    #[serde(default, deserialize_with = "nullable")]
    port: i32,
}

impl Endpoint for JsonEndpoint {
    fn host(&self) -> String {
        let (addr, bracketed) = if self.ipv4.is_empty() && !self.ipv6.is_empty() {
            (self.ipv6.as_str(), true)
        } else {
            (self.ipv4.as_str(), false)
        };

        match (self.port, bracketed) {
            (0, _) => addr.to_string(),
            (port, true) => format!("[{}]:{}", addr, port),
            (port, false) => format!("{}:{}", addr, port),
        }
    }

    fn name(&self) -> &str {
        &self.service_name
    }
}

/// Treat an explicit JSON `null` like an absent field
fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Microsecond annotation timestamp, the Unix epoch when absent or `null`
fn annotation_time<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let micros: i64 = nullable(deserializer)?;
    micros_to_time(micros)
        .ok_or_else(|| D::Error::custom(format!("annotation timestamp {} out of range", micros)))
}

fn epoch() -> DateTime<Utc> {
    DateTime::UNIX_EPOCH
}

fn raw_value<'de, D>(deserializer: D) -> std::result::Result<Option<Box<RawValue>>, D::Error>
where
    D: Deserializer<'de>,
{
    Box::<RawValue>::deserialize(deserializer).map(Some)
}
