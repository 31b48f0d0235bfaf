//! Assembly of decoded spans into a canonical trace

use crate::clock::Clock;
use crate::error::Result;
use crate::infer::{
    convert_duration, guess_timestamp, new_annotations, new_binary_annotations, parent_id,
    service_endpoint, service_name,
};
use crate::span::Span;
use crate::trace::{self, Trace};
use tracing::{debug, warn};

/// Build the canonical trace for a batch of decoded spans
///
/// Spans keep their input order. A single span that fails validation
/// rejects the whole batch; no partial trace is ever returned.
pub fn new_trace<S: Span>(spans: &[S], clock: &dyn Clock) -> Result<Trace> {
    let trace = spans
        .iter()
        .enumerate()
        .map(|(index, span)| {
            new_span(span, clock).inspect_err(|e| warn!("Rejecting batch at span {}: {}", index, e))
        })
        .collect::<Result<Trace>>()?;

    debug!("Assembled trace with {} span(s)", trace.len());
    Ok(trace)
}

fn new_span<S: Span + ?Sized>(span: &S, clock: &dyn Clock) -> Result<trace::Span> {
    span.validate()?;

    let annotations = span.annotations();
    let binary_annotations = span.binary_annotations()?;
    let endpoint = service_endpoint(&annotations, &binary_annotations);

    Ok(trace::Span {
        id: span.id()?,
        trace_id: span.trace()?,
        parent_id: parent_id(span)?,
        name: span.name().to_string(),
        service_name: service_name(endpoint),
        timestamp: guess_timestamp(span, clock),
        duration: convert_duration(span, clock),
        annotations: new_annotations(&annotations, endpoint),
        binary_annotations: new_binary_annotations(&binary_annotations, endpoint),
    })
}
