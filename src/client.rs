//! High-level entry points, one per catalog operation.
//!
//! Each method runs the whole pipeline for its operation: route artifacts
//! by size (rejecting oversized ones without touching the network), build
//! the envelope with the field names the service expects, then execute.
//! Every method returns an [`OperationOutcome`]; none of them return
//! `Err`, because every failure is a value the presentation layer shows.

use crate::artifact::Artifact;
use crate::config::ClientConfig;
use crate::error::EdudocError;
use crate::lifecycle::NoopObserver;
use crate::operation::Operation;
use crate::output::{Failure, FailureCode, OperationOutcome};
use crate::pipeline::envelope::{EnvelopeBuilder, OperationRequest, Slide};
use crate::pipeline::execute::Executor;
use crate::pipeline::route::{self, ArtifactFamily, PathwaySelection, SplitIntent};
use crate::pipeline::transport::{HttpTransport, Transport};
use std::sync::Arc;
use tracing::warn;

/// Defaults the service applies when a field is omitted; sent explicitly.
pub const DEFAULT_IMPROVE_CONTEXT: &str = "educacional";
pub const DEFAULT_SUMMARY_MAX_WORDS: u32 = 200;
pub const DEFAULT_QUESTION_COUNT: u32 = 5;
pub const DEFAULT_DIFFICULTY: &str = "média";
pub const DEFAULT_TARGET_LANGUAGE: &str = "inglês";
pub const DEFAULT_LESSON_DURATION: &str = "50 minutos";
pub const DEFAULT_EXERCISE_COUNT: u32 = 10;
pub const DEFAULT_OUTLINE_SLIDES: u32 = 10;
pub const DEFAULT_AUDIENCE: &str = "estudantes";
pub const DEFAULT_PAGES_PER_CHUNK: u32 = 50;

/// Client for the document and AI service.
///
/// Cheap to clone; clones share the HTTP connection pool and observer.
///
/// # Example
/// ```rust,no_run
/// use edgequake_edudoc::{Artifact, Client, ClientConfig, OperationOutcome};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = Client::new(&ClientConfig::default())?;
/// let pdf = Artifact::from_path("apostila.pdf").await?;
/// match client.compress(pdf).await {
///     OperationOutcome::Binary(b) => { b.save_into(".").await?; }
///     OperationOutcome::Failure(f) => eprintln!("{}", f.message),
///     OperationOutcome::Decoded(d) => println!("{:?}", d.fields),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    executor: Executor,
}

impl Client {
    /// Client talking HTTP to `config.base_url`.
    pub fn new(config: &ClientConfig) -> Result<Self, EdudocError> {
        let transport = HttpTransport::new(config)?;
        Ok(Self::with_transport(Arc::new(transport), config))
    }

    /// Client over any [`Transport`]; the config's observer is honoured.
    pub fn with_transport(transport: Arc<dyn Transport>, config: &ClientConfig) -> Self {
        let observer = config
            .observer
            .clone()
            .unwrap_or_else(|| Arc::new(NoopObserver));
        Self {
            executor: Executor::new(transport, observer),
        }
    }

    /// Run a hand-built envelope. No routing is applied.
    pub async fn execute(&self, request: &OperationRequest) -> OperationOutcome {
        self.executor.execute(request).await
    }

    // ── PDF ──────────────────────────────────────────────────────────────

    /// Extract text; files over 5 MiB go to the large-document pathway.
    pub async fn extract_text(&self, artifact: Artifact) -> OperationOutcome {
        let pathway = match pick(ArtifactFamily::ExtractText, &[&artifact]) {
            Ok(p) => p,
            Err(rejected) => return rejected,
        };
        self.run(begin(pathway).attach("file", artifact)).await
    }

    /// Merge PDFs in the given order into `merged.pdf`.
    pub async fn merge(&self, artifacts: Vec<Artifact>) -> OperationOutcome {
        let refs: Vec<&Artifact> = artifacts.iter().collect();
        let pathway = match pick(ArtifactFamily::Merge, &refs) {
            Ok(p) => p,
            Err(rejected) => return rejected,
        };
        self.run(begin(pathway).attach_all("files", artifacts)).await
    }

    /// Keep the listed pages, e.g. `"1, 3, 5"`.
    pub async fn split(&self, artifact: Artifact, pages: &str) -> OperationOutcome {
        let pathway = match pick(ArtifactFamily::Split(SplitIntent::Pages), &[&artifact]) {
            Ok(p) => p,
            Err(rejected) => return rejected,
        };
        self.run(begin(pathway).attach("file", artifact).field("pages", pages))
            .await
    }

    /// Cut into chunks of `pages_per_chunk` pages, returned as a zip.
    pub async fn split_large(&self, artifact: Artifact, pages_per_chunk: u32) -> OperationOutcome {
        let pathway = match pick(ArtifactFamily::Split(SplitIntent::Chunked), &[&artifact]) {
            Ok(p) => p,
            Err(rejected) => return rejected,
        };
        self.run(
            begin(pathway)
                .attach("file", artifact)
                .field("pages_per_chunk", pages_per_chunk),
        )
        .await
    }

    pub async fn watermark(&self, artifact: Artifact, text: &str) -> OperationOutcome {
        let pathway = match pick(ArtifactFamily::Watermark, &[&artifact]) {
            Ok(p) => p,
            Err(rejected) => return rejected,
        };
        self.run(
            begin(pathway)
                .attach("file", artifact)
                .field("watermark_text", text),
        )
        .await
    }

    pub async fn compress(&self, artifact: Artifact) -> OperationOutcome {
        let pathway = match pick(ArtifactFamily::Compress, &[&artifact]) {
            Ok(p) => p,
            Err(rejected) => return rejected,
        };
        self.run(begin(pathway).attach("file", artifact)).await
    }

    // ── Presentations ────────────────────────────────────────────────────

    /// Author a new deck; the result downloads as `<title>.pptx`.
    pub async fn create_deck(&self, title: &str, slides: &[Slide]) -> OperationOutcome {
        let operation = Operation::DeckCreate;
        let builder = match OperationRequest::builder(operation)
            .field("title", title)
            .json_field("slides_content", slides)
        {
            Ok(b) => b,
            Err(e) => {
                warn!("{}: {}", operation, e);
                return OperationOutcome::Failure(Failure {
                    operation: Some(operation),
                    message: operation.failure_message().to_string(),
                    code: None,
                });
            }
        };
        self.run(builder).await
    }

    pub async fn extract_deck_text(&self, artifact: Artifact) -> OperationOutcome {
        let pathway = match pick(ArtifactFamily::DeckExtractText, &[&artifact]) {
            Ok(p) => p,
            Err(rejected) => return rejected,
        };
        self.run(begin(pathway).attach("file", artifact)).await
    }

    pub async fn add_slide(
        &self,
        artifact: Artifact,
        title: &str,
        content: &str,
    ) -> OperationOutcome {
        let pathway = match pick(ArtifactFamily::DeckAddSlide, &[&artifact]) {
            Ok(p) => p,
            Err(rejected) => return rejected,
        };
        self.run(
            begin(pathway)
                .attach("file", artifact)
                .field("slide_title", title)
                .field("slide_content", content),
        )
        .await
    }

    // ── AI text tools ────────────────────────────────────────────────────

    pub async fn improve_text(&self, text: &str, context: &str) -> OperationOutcome {
        self.run(
            OperationRequest::builder(Operation::ImproveText)
                .field("text", text)
                .field("context", context),
        )
        .await
    }

    pub async fn summarize(&self, text: &str, max_words: u32) -> OperationOutcome {
        self.run(
            OperationRequest::builder(Operation::Summarize)
                .field("text", text)
                .field("max_words", max_words),
        )
        .await
    }

    pub async fn generate_questions(
        &self,
        text: &str,
        count: u32,
        difficulty: &str,
    ) -> OperationOutcome {
        self.run(
            OperationRequest::builder(Operation::GenerateQuestions)
                .field("text", text)
                .field("num_questions", count)
                .field("difficulty", difficulty),
        )
        .await
    }

    pub async fn translate(&self, text: &str, target_language: &str) -> OperationOutcome {
        self.run(
            OperationRequest::builder(Operation::Translate)
                .field("text", text)
                .field("target_language", target_language),
        )
        .await
    }

    // ── Content generators ───────────────────────────────────────────────

    pub async fn lesson_plan(
        &self,
        subject: &str,
        grade: &str,
        topic: &str,
        duration: &str,
    ) -> OperationOutcome {
        self.run(
            OperationRequest::builder(Operation::LessonPlan)
                .field("subject", subject)
                .field("grade", grade)
                .field("topic", topic)
                .field("duration", duration),
        )
        .await
    }

    pub async fn exercises(
        &self,
        subject: &str,
        topic: &str,
        count: u32,
        difficulty: &str,
    ) -> OperationOutcome {
        self.run(
            OperationRequest::builder(Operation::Exercises)
                .field("subject", subject)
                .field("topic", topic)
                .field("num_exercises", count)
                .field("difficulty", difficulty),
        )
        .await
    }

    pub async fn presentation_outline(
        &self,
        topic: &str,
        num_slides: u32,
        audience: &str,
    ) -> OperationOutcome {
        self.run(
            OperationRequest::builder(Operation::PresentationOutline)
                .field("topic", topic)
                .field("num_slides", num_slides)
                .field("audience", audience),
        )
        .await
    }

    // ── Service utilities ────────────────────────────────────────────────

    pub async fn health(&self) -> OperationOutcome {
        self.run(OperationRequest::builder(Operation::Health)).await
    }

    /// Ask the service to delete its temporary uploads and outputs.
    pub async fn cleanup(&self) -> OperationOutcome {
        self.run(OperationRequest::builder(Operation::Cleanup)).await
    }

    /// Size and readability of a previously uploaded file.
    pub async fn file_info(&self, filename: &str) -> OperationOutcome {
        self.run(OperationRequest::builder(Operation::FileInfo).field("filename", filename))
            .await
    }

    async fn run(&self, builder: EnvelopeBuilder) -> OperationOutcome {
        self.executor.execute(&builder.build()).await
    }
}

fn begin(pathway: PathwaySelection) -> EnvelopeBuilder {
    OperationRequest::builder(pathway.operation)
}

/// Route the artifacts, turning a rejection into a ready-made outcome.
fn pick(
    family: ArtifactFamily,
    artifacts: &[&Artifact],
) -> Result<PathwaySelection, OperationOutcome> {
    route::route_all(family, artifacts.iter().map(|a| a.len())).map_err(|rejection| {
        warn!(
            "{}: {} bytes over the {} byte ceiling, not sent",
            rejection.operation, rejection.byte_len, rejection.ceiling_bytes
        );
        OperationOutcome::Failure(Failure::new(
            rejection.operation,
            rejection.message,
            FailureCode::PayloadTooLarge,
        ))
    })
}
