//! Response normalisation: turn an outcome into what the presentation layer
//! should do with it.
//!
//! Decoded payloads pass through untouched. Picking the field of interest
//! (`text`, `summary`, `questions`, …) is the presentation layer's job,
//! typically via the views in [`crate::results`].
//! Binary content is exposed as-is and never inspected.

use crate::operation::Operation;
use crate::output::OperationOutcome;
use bytes::Bytes;
use serde_json::{Map, Value};

/// Instruction for the presentation sink.
#[derive(Debug, Clone, PartialEq)]
pub enum PresentationDirective {
    /// Show the payload inline.
    Display {
        operation: Operation,
        fields: Map<String, Value>,
    },
    /// Offer the bytes as a download.
    Save {
        operation: Operation,
        filename: String,
        /// MIME type the service declared, if any.
        content_type: Option<String>,
        content: Bytes,
    },
    /// Show a transient error notice; leave any previous result in place.
    Notify { message: String },
}

pub fn normalize(outcome: OperationOutcome) -> PresentationDirective {
    match outcome {
        OperationOutcome::Decoded(d) => PresentationDirective::Display {
            operation: d.operation,
            fields: d.fields,
        },
        OperationOutcome::Binary(b) => PresentationDirective::Save {
            operation: b.operation,
            filename: b.filename,
            content_type: b.content_type,
            content: b.content,
        },
        OperationOutcome::Failure(f) => PresentationDirective::Notify { message: f.message },
    }
}
