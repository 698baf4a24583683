//! # edgequake-edudoc
//!
//! Client for the IA Pedagógico document and AI service: PDF and PowerPoint
//! manipulation plus AI text tools for teachers, all run remotely.
//!
//! The crate owns the client-side orchestration: which endpoint an artifact
//! goes to, how the request is packaged, how a response is classified, and
//! how the user is told about it. Document processing itself happens on the
//! service.
//!
//! ## Pipeline Overview
//!
//! ```text
//! Artifact(s) + scalar fields
//!  │
//!  ├─ 1. Route      size → endpoint; > 25 MiB rejected, nothing sent
//!  ├─ 2. Envelope   fields + attachments, order preserved
//!  ├─ 3. Execute    one attempt, busy lifecycle, classify response
//!  └─ 4. Normalize  Display / Save / Notify
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_edudoc::{normalize, Client, ClientConfig, PresentationDirective};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new(&ClientConfig::default())?;
//!     let outcome = client.summarize("A fotossíntese é...", 50).await;
//!     match normalize(outcome) {
//!         PresentationDirective::Display { fields, .. } => println!("{}", fields["summary"]),
//!         PresentationDirective::Notify { message } => eprintln!("{message}"),
//!         PresentationDirective::Save { .. } => unreachable!(),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Builds the `edudoc` binary (clap, anyhow, tracing-subscriber, indicatif) |
//!
//! ```toml
//! edgequake-edudoc = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod artifact;
pub mod client;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod operation;
pub mod output;
pub mod pipeline;
pub mod results;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use artifact::Artifact;
pub use client::Client;
pub use config::{ClientConfig, ClientConfigBuilder, DEFAULT_BASE_URL};
pub use error::{EdudocError, TransportError};
pub use lifecycle::{ActivityTracker, LifecycleObserver, NoopObserver, OperationHandle};
pub use operation::{DownloadName, Method, Operation, ResponseKind};
pub use output::{BinaryResult, DecodedResult, Failure, FailureCode, OperationOutcome};
pub use pipeline::envelope::{EnvelopeBuilder, OperationRequest, Slide};
pub use pipeline::execute::Executor;
pub use pipeline::normalize::{normalize, PresentationDirective};
pub use pipeline::route::{
    route, route_all, ArtifactFamily, PathwaySelection, Rejection, SplitIntent,
    HARD_CEILING_BYTES, LARGE_DOCUMENT_THRESHOLD_BYTES, OVERSIZE_MESSAGE,
};
pub use pipeline::transport::{HttpTransport, RawResponse, Transport};
