use chrono::SecondsFormat;
use codec::trace::{Span, Trace};
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};

const HEADER: [&str; 9] = [
    "trace_id",
    "id",
    "parent_id",
    "name",
    "service_name",
    "timestamp",
    "duration",
    "annotations",
    "binary_annotations",
];

/// Format a trace as a table, one row per span
pub fn format_trace(trace: &Trace) -> String {
    if trace.is_empty() {
        return String::new();
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::DynamicFullWidth);
    table.set_header(HEADER.iter().map(Cell::new).collect::<Vec<_>>());

    for span in trace {
        table.add_row(span_row(span));
    }

    table.to_string()
}

fn span_row(span: &Span) -> Vec<Cell> {
    vec![
        Cell::new(&span.trace_id),
        Cell::new(&span.id),
        Cell::new(&span.parent_id),
        Cell::new(&span.name),
        Cell::new(&span.service_name),
        Cell::new(span.timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)),
        Cell::new(format_duration(span)),
        Cell::new(
            span.annotations
                .iter()
                .map(|a| a.value.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        ),
        Cell::new(
            span.binary_annotations
                .iter()
                .map(|b| format!("{}={}", b.key, b.value))
                .collect::<Vec<_>>()
                .join("\n"),
        ),
    ]
}

fn format_duration(span: &Span) -> String {
    match span.duration.num_microseconds() {
        Some(us) if us < 1_000 => format!("{}µs", us),
        Some(us) if us < 1_000_000 => format!("{:.3}ms", us as f64 / 1_000.0),
        _ => format!("{:.3}s", span.duration.num_milliseconds() as f64 / 1_000.0),
    }
}

/// Format a trace as JSON
pub fn format_json(trace: &Trace, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(trace)
    } else {
        serde_json::to_string(trace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeDelta};
    use codec::trace::BinaryAnnotation;

    fn span(duration: TimeDelta) -> Span {
        Span {
            id: "b".to_string(),
            trace_id: "a".to_string(),
            parent_id: "b".to_string(),
            name: "get /users".to_string(),
            service_name: "frontend".to_string(),
            timestamp: DateTime::from_timestamp(1, 0).unwrap(),
            duration,
            annotations: Vec::new(),
            binary_annotations: vec![BinaryAnnotation {
                key: "http.status_code".to_string(),
                value: "200".to_string(),
                host: String::new(),
                service_name: "frontend".to_string(),
            }],
        }
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(&span(TimeDelta::microseconds(250))), "250µs");
        assert_eq!(format_duration(&span(TimeDelta::microseconds(53106))), "53.106ms");
        assert_eq!(format_duration(&span(TimeDelta::milliseconds(2500))), "2.500s");
    }

    #[test]
    fn test_format_trace() {
        let output = format_trace(&vec![span(TimeDelta::zero())]);
        assert!(output.contains("service_name"));
        assert!(output.contains("frontend"));
        assert!(output.contains("http.status_code=200"));
        assert!(format_trace(&Vec::new()).is_empty());
    }

    #[test]
    fn test_format_json() {
        let output = format_json(&vec![span(TimeDelta::zero())], false).unwrap();
        assert!(output.starts_with(r#"[{"id":"b","traceId":"a""#));
    }
}
