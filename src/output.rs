//! Operation outcomes.
//!
//! Every executor invocation yields exactly one [`OperationOutcome`]:
//!
//! - [`DecodedResult`]: a JSON payload for inline display,
//! - [`BinaryResult`]: a byte stream plus the file name to save it under,
//! - [`Failure`]: one human-readable message and an optional machine code.
//!
//! Rejections, transport faults and service errors all collapse into
//! [`Failure`]; the [`FailureCode`] is the only place the distinction
//! survives.

use crate::error::EdudocError;
use crate::operation::Operation;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Result of one operation attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OperationOutcome {
    Decoded(DecodedResult),
    Binary(BinaryResult),
    Failure(Failure),
}

impl OperationOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, OperationOutcome::Failure(_))
    }

    pub fn as_decoded(&self) -> Option<&DecodedResult> {
        match self {
            OperationOutcome::Decoded(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_binary(&self) -> Option<&BinaryResult> {
        match self {
            OperationOutcome::Binary(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_failure(&self) -> Option<&Failure> {
        match self {
            OperationOutcome::Failure(f) => Some(f),
            _ => None,
        }
    }
}

/// A successful JSON response, passed through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedResult {
    pub operation: Operation,
    pub fields: Map<String, Value>,
}

impl DecodedResult {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Deserialize one payload field into a typed view (see [`crate::results`]).
    pub fn parse<T: DeserializeOwned>(&self, key: &str) -> Result<T, serde_json::Error> {
        let value = self.fields.get(key).cloned().unwrap_or(Value::Null);
        serde_json::from_value(value)
    }

    /// Deserialize the whole payload object.
    pub fn parse_all<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(Value::Object(self.fields.clone()))
    }
}

/// A downloadable result. The content is never interpreted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinaryResult {
    pub operation: Operation,
    pub filename: String,
    pub content_type: Option<String>,
    #[serde(rename = "size", serialize_with = "serialize_len")]
    pub content: Bytes,
}

fn serialize_len<S: Serializer>(content: &Bytes, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(content.len() as u64)
}

impl BinaryResult {
    /// Write the content into `dir` under [`Self::filename`].
    ///
    /// The write is atomic: content goes to a temp file in the same
    /// directory which is then renamed into place, so a failed write never
    /// leaves a truncated result behind. Path separators in the name are
    /// replaced so the file always lands inside `dir`.
    pub async fn save_into(&self, dir: impl AsRef<Path>) -> Result<PathBuf, EdudocError> {
        let dir = dir.as_ref().to_path_buf();
        let path = dir.join(local_file_name(&self.filename));

        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| EdudocError::OutputWriteFailed {
                path: path.clone(),
                source: e,
            })?;

        let content = self.content.clone();
        let target = path.clone();
        tokio::task::spawn_blocking(move || -> Result<(), EdudocError> {
            let write_err = |source| EdudocError::OutputWriteFailed {
                path: target.clone(),
                source,
            };
            let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(write_err)?;
            tmp.write_all(&content).map_err(write_err)?;
            tmp.persist(&target).map_err(|e| write_err(e.error))?;
            Ok(())
        })
        .await
        .map_err(|e| EdudocError::Internal(format!("save task panicked: {e}")))??;

        info!("Saved {} ({} bytes)", path.display(), self.content.len());
        Ok(path)
    }
}

fn local_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    if cleaned.is_empty() || cleaned == "." || cleaned == ".." {
        "download".to_string()
    } else {
        cleaned
    }
}

/// The operation failed; `message` is what the user sees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub operation: Option<Operation>,
    pub message: String,
    pub code: Option<FailureCode>,
}

impl Failure {
    pub fn new(operation: Operation, message: impl Into<String>, code: FailureCode) -> Self {
        Self {
            operation: Some(operation),
            message: message.into(),
            code: Some(code),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Machine-readable reason attached to a [`Failure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCode {
    /// Artifact over the size ceiling; nothing was sent.
    PayloadTooLarge,
    /// No response: connection refused, reset, timeout.
    Transport,
    /// A response arrived but its body could not be decoded.
    MalformedBody,
    /// Non-2xx status.
    Http(u16),
    /// 2xx with `success: false`.
    Service,
    /// 2xx with `success: true` but without the expected result field.
    MissingField,
}

impl fmt::Display for FailureCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureCode::PayloadTooLarge => f.write_str("payload_too_large"),
            FailureCode::Transport => f.write_str("transport"),
            FailureCode::MalformedBody => f.write_str("malformed_body"),
            FailureCode::Http(status) => write!(f, "http_{status}"),
            FailureCode::Service => f.write_str("service"),
            FailureCode::MissingField => f.write_str("missing_field"),
        }
    }
}

impl Serialize for FailureCode {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}
