//! Error types for the edgequake-edudoc library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`EdudocError`] is **fatal**: the client cannot even start an operation
//!   (artifact missing on disk, bad base URL, output directory not writable).
//!   Returned as `Err(EdudocError)` from constructors and file helpers.
//!
//! * [`TransportError`] means a single request could not complete at the
//!   network level. It never escapes the executor: it is folded into an
//!   [`crate::output::OperationOutcome::Failure`] so the caller always gets a
//!   value back for every operation attempt.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the edgequake-edudoc library.
///
/// Operation-level failures (oversized artifact, service error, unreachable
/// service) are *not* errors: they are reported as
/// [`crate::output::OperationOutcome::Failure`].
#[derive(Debug, Error)]
pub enum EdudocError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Artifact file was not found at the given path.
    #[error("File not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists but reading it failed part-way.
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not create or write a downloaded result file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The service base URL is not an absolute HTTP/HTTPS URL.
    #[error("Invalid service URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A request that never produced an HTTP response, or whose body could not
/// be read to the end.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The request could not be assembled (bad URL join, invalid header).
    #[error("could not build request for {endpoint}: {detail}")]
    Build { endpoint: String, detail: String },

    /// Connection refused, reset, DNS failure and friends.
    #[error("{detail}")]
    Connect { detail: String },

    /// The underlying HTTP client gave up waiting.
    #[error("request to {endpoint} timed out")]
    Timeout { endpoint: String },

    /// Headers arrived but the body stream broke.
    #[error("failed to read response body: {detail}")]
    Body { detail: String },
}

impl TransportError {
    pub(crate) fn from_reqwest(endpoint: &str, e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Timeout {
                endpoint: endpoint.to_string(),
            }
        } else if e.is_builder() {
            TransportError::Build {
                endpoint: endpoint.to_string(),
                detail: e.to_string(),
            }
        } else if e.is_body() || e.is_decode() {
            TransportError::Body {
                detail: e.to_string(),
            }
        } else {
            TransportError::Connect {
                detail: e.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_not_found_display() {
        let e = EdudocError::FileNotFound {
            path: PathBuf::from("/tmp/missing.pdf"),
        };
        assert!(e.to_string().contains("missing.pdf"));
    }

    #[test]
    fn invalid_base_url_display() {
        let e = EdudocError::InvalidBaseUrl {
            url: "ftp://x".into(),
            reason: "unsupported scheme".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("ftp://x"), "got: {msg}");
        assert!(msg.contains("unsupported scheme"), "got: {msg}");
    }

    #[test]
    fn connect_error_is_bare_detail() {
        let e = TransportError::Connect {
            detail: "connection refused".into(),
        };
        assert_eq!(e.to_string(), "connection refused");
    }

    #[test]
    fn timeout_display_names_endpoint() {
        let e = TransportError::Timeout {
            endpoint: "/api/pdf/merge".into(),
        };
        assert!(e.to_string().contains("/api/pdf/merge"));
    }
}
