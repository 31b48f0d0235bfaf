//! Reconstruction of span fields the wire data may leave out
//!
//! Older Zipkin instrumentation often omits a span's own timestamp and
//! duration and only reports annotations. These functions derive the
//! missing values from the annotations, independent of the wire encoding.

use crate::clock::Clock;
use crate::error::Result;
use crate::span::{
    Annotation, BinaryAnnotation, Endpoint, Span, DEFAULT_ENDPOINT, LOCAL_COMPONENT, SERVER_RECV,
    UNKNOWN_SERVICE_NAME,
};
use crate::trace;
use chrono::{DateTime, TimeDelta, Utc};

/// Earliest and latest annotation timestamps
///
/// Both are `clock.now()` when the span has no annotations.
pub fn min_max<S: Span + ?Sized>(span: &S, clock: &dyn Clock) -> (DateTime<Utc>, DateTime<Utc>) {
    let mut timestamps = span.annotations().into_iter().map(|a| a.timestamp());

    let Some(first) = timestamps.next() else {
        let now = clock.now();
        return (now, now);
    };

    timestamps.fold((first, first), |(min, max), ts| (min.min(ts), max.max(ts)))
}

/// Start time of a span
///
/// The explicit timestamp wins; otherwise the earliest annotation, otherwise
/// the current instant.
pub fn guess_timestamp<S: Span + ?Sized>(span: &S, clock: &dyn Clock) -> DateTime<Utc> {
    if let Some(ts) = span.timestamp() {
        return ts;
    }
    let (min, _) = min_max(span, clock);
    min
}

/// Duration of a span
///
/// A positive explicit duration wins; otherwise the distance between the
/// first and last annotation, which is zero for fewer than two annotations.
/// Inferred durations saturate at `i64::MAX` microseconds.
pub fn convert_duration<S: Span + ?Sized>(span: &S, clock: &dyn Clock) -> TimeDelta {
    let duration = span.duration();
    if duration > TimeDelta::zero() {
        return duration;
    }
    if span.annotations().len() < 2 {
        return TimeDelta::zero();
    }
    let (min, max) = min_max(span, clock);
    (max - min).min(TimeDelta::microseconds(i64::MAX))
}

/// Parent ID of a span; a root span is its own parent
pub fn parent_id<S: Span + ?Sized>(span: &S) -> Result<String> {
    match span.parent()? {
        Some(parent) => Ok(parent),
        None => span.id(),
    }
}

/// Endpoint that identifies the service a span belongs to
///
/// Resolution order: the endpoint of the "server receive" annotation, then
/// the first annotation naming a service, then the "local component" binary
/// annotation, then [`crate::DefaultEndpoint`].
pub fn service_endpoint<'a>(
    annotations: &[&'a dyn Annotation],
    binary_annotations: &[&'a dyn BinaryAnnotation],
) -> &'a dyn Endpoint {
    annotations
        .iter()
        .copied()
        .filter(|a| a.value() == SERVER_RECV)
        .find_map(|a| a.host())
        .or_else(|| {
            annotations
                .iter()
                .copied()
                .filter_map(|a| a.host())
                .find(|h| !h.name().is_empty())
        })
        .or_else(|| {
            binary_annotations
                .iter()
                .copied()
                .filter(|b| b.key() == LOCAL_COMPONENT)
                .find_map(|b| b.host())
        })
        .unwrap_or(&DEFAULT_ENDPOINT)
}

/// Service name of a resolved endpoint, `"unknown"` when it has none
pub fn service_name(endpoint: &dyn Endpoint) -> String {
    match endpoint.name() {
        "" => UNKNOWN_SERVICE_NAME,
        name => name,
    }
    .to_string()
}

/// Project annotations onto the span-wide endpoint
pub fn new_annotations(
    annotations: &[&dyn Annotation],
    endpoint: &dyn Endpoint,
) -> Vec<trace::Annotation> {
    let host = endpoint.host();
    let service_name = service_name(endpoint);
    annotations
        .iter()
        .map(|a| trace::Annotation {
            timestamp: a.timestamp(),
            value: a.value().to_string(),
            host: host.clone(),
            service_name: service_name.clone(),
        })
        .collect()
}

/// Project binary annotations onto the span-wide endpoint
pub fn new_binary_annotations(
    binary_annotations: &[&dyn BinaryAnnotation],
    endpoint: &dyn Endpoint,
) -> Vec<trace::BinaryAnnotation> {
    let host = endpoint.host();
    let service_name = service_name(endpoint);
    binary_annotations
        .iter()
        .map(|b| trace::BinaryAnnotation {
            key: b.key().to_string(),
            value: b.value(),
            host: host.clone(),
            service_name: service_name.clone(),
        })
        .collect()
}
