//! Transfer envelopes: the request body for one operation.
//!
//! An [`OperationRequest`] is an ordered list of scalar fields plus an
//! ordered list of named attachments. Order is preserved end to end: merge
//! relies on the attachment order, and fields are emitted in the order they
//! were added. Nothing here validates sizes or types; routing has already
//! happened by the time an envelope is built.

use crate::artifact::Artifact;
use crate::error::EdudocError;
use crate::operation::{Operation, ResponseKind};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One `{title, content}` pair for deck authoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    pub title: String,
    pub content: String,
}

impl Slide {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

/// A binary attachment under a form field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub field: String,
    pub artifact: Artifact,
}

/// A packaged request, ready for a [`crate::pipeline::transport::Transport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationRequest {
    operation: Operation,
    fields: Vec<(String, String)>,
    attachments: Vec<Attachment>,
}

impl OperationRequest {
    pub fn builder(operation: Operation) -> EnvelopeBuilder {
        EnvelopeBuilder {
            request: OperationRequest {
                operation,
                fields: Vec::new(),
                attachments: Vec::new(),
            },
        }
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    /// First value of the named scalar field.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Total attachment bytes carried by this envelope.
    pub fn payload_len(&self) -> u64 {
        self.attachments.iter().map(|a| a.artifact.len()).sum()
    }

    /// Client-side file name for a binary result, `None` for JSON operations.
    pub fn download_name(&self) -> Option<String> {
        match self.operation.response_kind() {
            ResponseKind::Binary(rule) => {
                let original = self.attachments.first().map(|a| a.artifact.name());
                Some(rule.render(original, self.field("title")))
            }
            ResponseKind::Decoded { .. } => None,
        }
    }
}

/// Incremental constructor for [`OperationRequest`].
#[derive(Debug)]
pub struct EnvelopeBuilder {
    request: OperationRequest,
}

impl EnvelopeBuilder {
    /// Append a scalar field. Values are sent as opaque strings.
    pub fn field(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.request.fields.push((name.into(), value.to_string()));
        self
    }

    /// Append a structured value as one JSON-encoded text field.
    pub fn json_field<T: Serialize + ?Sized>(
        mut self,
        name: impl Into<String>,
        value: &T,
    ) -> Result<Self, EdudocError> {
        let encoded = serde_json::to_string(value)
            .map_err(|e| EdudocError::Internal(format!("field encoding failed: {e}")))?;
        self.request.fields.push((name.into(), encoded));
        Ok(self)
    }

    pub fn attach(mut self, field: impl Into<String>, artifact: Artifact) -> Self {
        self.request.attachments.push(Attachment {
            field: field.into(),
            artifact,
        });
        self
    }

    /// Attach every artifact under the same field name, in order.
    pub fn attach_all(
        mut self,
        field: impl Into<String>,
        artifacts: impl IntoIterator<Item = Artifact>,
    ) -> Self {
        let field = field.into();
        for artifact in artifacts {
            self.request.attachments.push(Attachment {
                field: field.clone(),
                artifact,
            });
        }
        self
    }

    pub fn build(self) -> OperationRequest {
        debug!(
            "Envelope for {}: {} fields, {} attachments, {} bytes",
            self.request.operation,
            self.request.fields.len(),
            self.request.attachments.len(),
            self.request.payload_len()
        );
        self.request
    }
}

/// One-shot form of the builder.
pub fn build(
    operation: Operation,
    fields: impl IntoIterator<Item = (String, String)>,
    attachments: impl IntoIterator<Item = Attachment>,
) -> OperationRequest {
    let mut builder = OperationRequest::builder(operation);
    for (k, v) in fields {
        builder = builder.field(k, v);
    }
    for a in attachments {
        builder = builder.attach(a.field, a.artifact);
    }
    builder.build()
}
