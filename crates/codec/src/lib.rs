//! # codec
//!
//! Decoding of Zipkin v1 spans into a canonical, internally consistent trace.
//!
//! The pipeline has two layers:
//! - A [`Decoder`] per wire encoding turns a request body into spans that
//!   implement the [`Span`] capability traits, validating every span.
//! - [`new_trace`] normalizes IDs and infers whatever the wire data left out
//!   (start time, duration, parent, service endpoint) for each span.
//!
//! Both layers reject the whole batch on the first invalid span.
//!
//! ## Example
//!
//! ```
//! use codec::{decode_trace, Encoding, SystemClock};
//!
//! let body = br#"[{"traceId": "000000000000000a", "id": "b", "name": "get",
//!                  "timestamp": 1503031538791000, "duration": 53106}]"#;
//!
//! let trace = decode_trace(Encoding::JsonV1, body, &SystemClock).unwrap();
//! assert_eq!(trace[0].trace_id, "a");
//! assert_eq!(trace[0].parent_id, "b");
//! assert_eq!(trace[0].service_name, "unknown");
//! ```

pub mod assemble;
pub mod clock;
pub mod encoding;
pub mod error;
pub mod id;
pub mod infer;
pub mod json_v1;
pub mod span;
pub mod trace;
pub mod value;

pub use assemble::new_trace;
pub use clock::{Clock, FixedClock, SystemClock};
pub use encoding::{decode_trace, Decoder, Encoding};
pub use error::{CodecError, EmptySide, IdError, IdField, Result};
pub use json_v1::JsonV1;
pub use span::{Annotation, BinaryAnnotation, DefaultEndpoint, Endpoint, Span};
pub use trace::Trace;
