//! Behavioural scenarios run through the public API against an in-memory
//! transport. No network access is needed.
//!
//! Run with:
//!   cargo test --test scenarios

use async_trait::async_trait;
use bytes::Bytes;
use edgequake_edudoc::{
    normalize, route, ActivityTracker, Artifact, ArtifactFamily, Client, ClientConfig,
    FailureCode, LifecycleObserver, Operation, OperationHandle, OperationOutcome,
    OperationRequest, PresentationDirective, RawResponse, Slide, SplitIntent, Transport,
    TransportError, HARD_CEILING_BYTES, LARGE_DOCUMENT_THRESHOLD_BYTES,
};
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Semaphore;

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Records every request and answers from a fixed script.
struct FakeService {
    seen: Mutex<Vec<OperationRequest>>,
    reply: Result<RawResponse, TransportError>,
}

impl FakeService {
    fn replying(reply: Result<RawResponse, TransportError>) -> Arc<Self> {
        Arc::new(Self {
            seen: Mutex::new(Vec::new()),
            reply,
        })
    }

    fn json(status: u16, body: &str) -> Arc<Self> {
        Self::replying(Ok(RawResponse {
            status,
            content_type: Some("application/json".into()),
            body: Bytes::from(body.to_string()),
        }))
    }

    fn file(body: &'static [u8]) -> Arc<Self> {
        Self::replying(Ok(RawResponse {
            status: 200,
            content_type: Some("application/pdf".into()),
            body: Bytes::from_static(body),
        }))
    }

    fn requests(&self) -> Vec<OperationRequest> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for FakeService {
    async fn send(&self, request: &OperationRequest) -> Result<RawResponse, TransportError> {
        self.seen.lock().unwrap().push(request.clone());
        self.reply.clone()
    }
}

/// Holds every request until a permit is released.
struct GatedService {
    gate: Semaphore,
}

#[async_trait]
impl Transport for GatedService {
    async fn send(&self, _request: &OperationRequest) -> Result<RawResponse, TransportError> {
        let _permit = self.gate.acquire().await.map_err(|e| TransportError::Connect {
            detail: e.to_string(),
        })?;
        Ok(RawResponse {
            status: 200,
            content_type: Some("application/json".into()),
            body: Bytes::from_static(br#"{"success":true,"summary":"ok"}"#),
        })
    }
}

/// Records busy transitions as the sequence of `busy` values it observed.
#[derive(Default)]
struct BusyLog {
    transitions: Mutex<Vec<bool>>,
}

impl LifecycleObserver for BusyLog {
    fn on_dispatch(&self, _handle: &OperationHandle) {
        self.transitions.lock().unwrap().push(true);
    }
    fn on_settle(&self, _handle: &OperationHandle) {
        self.transitions.lock().unwrap().push(false);
    }
}

fn client_over(
    transport: Arc<dyn Transport>,
    observer: Option<Arc<dyn LifecycleObserver>>,
) -> Client {
    let mut builder = ClientConfig::builder();
    if let Some(o) = observer {
        builder = builder.observer(o);
    }
    Client::with_transport(transport, &builder.build().unwrap())
}

fn pdf(name: &str, len: usize) -> Artifact {
    Artifact::from_bytes(name, vec![b'%'; len])
}

const MB: usize = 1_000_000;

/// Log sink shared with a `fmt` subscriber.
#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Captured {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

/// Route this thread's events into a buffer until the guard drops.
fn capture_logs() -> (Captured, tracing::subscriber::DefaultGuard) {
    let sink = Captured::default();
    let writer = sink.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("edgequake_edudoc=debug"))
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .without_time()
        .finish();
    (sink, tracing::subscriber::set_default(subscriber))
}

// ── Routing ──────────────────────────────────────────────────────────────────

#[test]
fn extract_text_boundaries() {
    let at = route(ArtifactFamily::ExtractText, LARGE_DOCUMENT_THRESHOLD_BYTES).unwrap();
    assert_eq!(at.operation, Operation::ExtractText);
    let over = route(ArtifactFamily::ExtractText, LARGE_DOCUMENT_THRESHOLD_BYTES + 1).unwrap();
    assert_eq!(over.operation, Operation::ExtractTextLarge);
    let ceiling = route(ArtifactFamily::ExtractText, HARD_CEILING_BYTES).unwrap();
    assert_eq!(ceiling.operation, Operation::ExtractTextLarge);
}

#[test]
fn routing_is_deterministic() {
    for len in [0, 1, LARGE_DOCUMENT_THRESHOLD_BYTES, HARD_CEILING_BYTES + 1] {
        for family in [
            ArtifactFamily::ExtractText,
            ArtifactFamily::Split(SplitIntent::Chunked),
            ArtifactFamily::DeckAddSlide,
        ] {
            assert_eq!(route(family, len), route(family, len));
        }
    }
}

// ── Scenario 1: oversized artifact ───────────────────────────────────────────

#[tokio::test]
async fn oversized_extract_is_rejected_without_request() {
    let service = FakeService::json(200, r#"{"success":true,"text":"never"}"#);
    let log = Arc::new(BusyLog::default());
    let client = client_over(service.clone(), Some(log.clone() as Arc<dyn LifecycleObserver>));

    let outcome = client.extract_text(pdf("enorme.pdf", 30 * MB)).await;

    let failure = outcome.as_failure().expect("expected failure");
    assert_eq!(failure.message, "Arquivo muito grande! Máximo 25MB");
    assert_eq!(failure.code, Some(FailureCode::PayloadTooLarge));
    assert_eq!(failure.operation, Some(Operation::ExtractTextLarge));
    assert!(service.requests().is_empty());
    assert!(log.transitions.lock().unwrap().is_empty());
}

#[tokio::test]
async fn oversized_is_rejected_for_every_file_family() {
    let service = FakeService::file(b"x");
    let client = client_over(service.clone(), None);
    let big = || pdf("big.pdf", HARD_CEILING_BYTES as usize + 1);

    let outcomes = vec![
        client.extract_text(big()).await,
        client.merge(vec![pdf("ok.pdf", 10), big()]).await,
        client.split(big(), "1").await,
        client.split_large(big(), 50).await,
        client.watermark(big(), "RASCUNHO").await,
        client.compress(big()).await,
        client.extract_deck_text(big()).await,
        client.add_slide(big(), "t", "c").await,
    ];
    for outcome in outcomes {
        assert_eq!(
            outcome.as_failure().and_then(|f| f.code),
            Some(FailureCode::PayloadTooLarge)
        );
    }
    assert!(service.requests().is_empty());
}

#[tokio::test]
async fn rejection_is_logged_as_not_sent() {
    let (logs, _guard) = capture_logs();
    let client = client_over(FakeService::file(b"x"), None);

    client.compress(pdf("enorme.pdf", 30 * MB)).await;

    let text = logs.text();
    assert!(text.contains("WARN"), "{text}");
    assert!(text.contains("compress"), "{text}");
    assert!(text.contains("not sent"), "{text}");
}

// ── Scenario 2: large-document pathway ───────────────────────────────────────

#[tokio::test]
async fn seven_megabytes_use_large_pathway() {
    let service = FakeService::json(200, r#"{"success":true,"text":"abc","total_chunks":3}"#);
    let client = client_over(service.clone(), None);

    let outcome = client.extract_text(pdf("apostila.pdf", 7 * MB)).await;

    let sent = service.requests();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].operation(), Operation::ExtractTextLarge);
    assert_eq!(sent[0].operation().endpoint(), "/api/pdf/extract-text-large");

    let decoded = outcome.as_decoded().expect("expected decoded result");
    assert_eq!(decoded.get("text").and_then(|v| v.as_str()), Some("abc"));
    assert_eq!(decoded.get("total_chunks").and_then(|v| v.as_u64()), Some(3));
}

#[tokio::test]
async fn small_document_uses_standard_pathway() {
    let service = FakeService::json(200, r#"{"success":true,"text":"oi"}"#);
    let client = client_over(service.clone(), None);
    client.extract_text(pdf("curta.pdf", 1024)).await;
    assert_eq!(service.requests()[0].operation(), Operation::ExtractText);
}

// ── Scenario 3: merge ────────────────────────────────────────────────────────

#[tokio::test]
async fn merge_three_files_yields_merged_pdf() {
    let service = FakeService::file(b"%PDF-merged");
    let client = client_over(service.clone(), None);

    let outcome = client
        .merge(vec![pdf("a.pdf", 10), pdf("b.pdf", 20), pdf("c.pdf", 30)])
        .await;

    let binary = outcome.as_binary().expect("expected binary result");
    assert_eq!(binary.filename, "merged.pdf");
    assert_eq!(&binary.content[..], b"%PDF-merged");

    let sent = &service.requests()[0];
    let order: Vec<(&str, &str)> = sent
        .attachments()
        .iter()
        .map(|a| (a.field.as_str(), a.artifact.name()))
        .collect();
    assert_eq!(order, vec![("files", "a.pdf"), ("files", "b.pdf"), ("files", "c.pdf")]);
}

// ── Scenario 4: deck creation ────────────────────────────────────────────────

#[tokio::test]
async fn deck_slides_survive_encoding_in_order() {
    let service = deck_service();
    let client = client_over(service.clone(), None);
    let slides = vec![
        Slide::new("Introdução", "O que é energia"),
        Slide::new("Exemplos", "Solar, eólica"),
    ];

    let outcome = client.create_deck("Aula", &slides).await;

    let sent = &service.requests()[0];
    assert_eq!(sent.field("title"), Some("Aula"));
    let decoded: Vec<Slide> = serde_json::from_str(sent.field("slides_content").unwrap()).unwrap();
    assert_eq!(decoded, slides);
    assert_eq!(outcome.as_binary().unwrap().filename, "Aula.pptx");
}

fn deck_service() -> Arc<FakeService> {
    FakeService::replying(Ok(RawResponse {
        status: 200,
        content_type: Some(
            "application/vnd.openxmlformats-officedocument.presentationml.presentation".into(),
        ),
        body: Bytes::from_static(b"PK\x03\x04"),
    }))
}

// ── Scenario 5: service error detail ─────────────────────────────────────────

#[tokio::test]
async fn server_error_detail_becomes_failure_message() {
    let service = FakeService::json(500, r#"{"detail":"bad page range"}"#);
    let client = client_over(service.clone(), None);

    let outcome = client.split(pdf("prova.pdf", 100), "9-1").await;

    let failure = outcome.as_failure().expect("expected failure");
    assert_eq!(failure.message, "bad page range");
    assert_eq!(failure.code, Some(FailureCode::Http(500)));
    assert_eq!(
        normalize(outcome),
        PresentationDirective::Notify {
            message: "bad page range".into()
        }
    );
}

#[tokio::test]
async fn server_error_is_logged_with_status() {
    let (logs, _guard) = capture_logs();
    let client = client_over(FakeService::json(502, r#"{"detail":"upstream"}"#), None);

    client.summarize("texto", 50).await;

    let text = logs.text();
    assert!(text.contains("failed after"), "{text}");
    assert!(text.contains("upstream (http_502)"), "{text}");
}

// ── Busy lifecycle ───────────────────────────────────────────────────────────

#[tokio::test]
async fn busy_cycles_once_on_every_terminal_branch() {
    let services: Vec<Arc<FakeService>> = vec![
        FakeService::json(200, r#"{"success":true,"summary":"ok"}"#),
        FakeService::json(200, r#"{"success":false,"detail":"quota"}"#),
        FakeService::json(200, "{not json"),
        FakeService::json(503, r#"{"detail":"down"}"#),
        FakeService::replying(Err(TransportError::Connect {
            detail: "connection refused".into(),
        })),
    ];
    for service in services {
        let log = Arc::new(BusyLog::default());
        let client = client_over(service, Some(log.clone() as Arc<dyn LifecycleObserver>));
        client.summarize("texto", 10).await;
        assert_eq!(*log.transitions.lock().unwrap(), vec![true, false]);
    }
}

#[tokio::test]
async fn concurrent_operations_are_tracked_independently() {
    let service = Arc::new(GatedService {
        gate: Semaphore::new(0),
    });
    let tracker = Arc::new(ActivityTracker::new());
    let client = client_over(service.clone(), Some(tracker.clone() as Arc<dyn LifecycleObserver>));

    let a = tokio::spawn({
        let client = client.clone();
        async move { client.summarize("um", 5).await }
    });
    let b = tokio::spawn({
        let client = client.clone();
        async move { client.translate("dois", "inglês").await }
    });

    tokio::time::timeout(Duration::from_secs(5), async {
        while tracker.in_flight() < 2 {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("both operations should be in flight");
    let mut active = tracker.active();
    active.sort_by_key(|op| op.to_string());
    assert_eq!(active, vec![Operation::Summarize, Operation::Translate]);

    service.gate.add_permits(2);
    let (ra, rb) = (a.await.unwrap(), b.await.unwrap());
    assert!(!ra.is_failure());
    assert!(!rb.is_failure());
    assert!(!tracker.is_busy());
}

#[tokio::test]
async fn dropped_operation_still_settles() {
    let service = Arc::new(GatedService {
        gate: Semaphore::new(0),
    });
    let tracker = Arc::new(ActivityTracker::new());
    let client = client_over(service, Some(tracker.clone() as Arc<dyn LifecycleObserver>));

    let timed_out = tokio::time::timeout(Duration::from_millis(50), client.health()).await;
    assert!(timed_out.is_err());
    assert_eq!(tracker.in_flight(), 0);
}

// ── Outcome serialisation ────────────────────────────────────────────────────

#[tokio::test]
async fn outcomes_serialise_for_json_output() {
    let service = FakeService::json(200, r#"{"status":"healthy","openai_configured":true}"#);
    let client = client_over(service, None);
    let outcome = client.health().await;
    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["kind"], "decoded");
    assert_eq!(json["fields"]["status"], "healthy");

    let failure = OperationOutcome::Failure(edgequake_edudoc::Failure::new(
        Operation::Split,
        "bad page range",
        FailureCode::Http(500),
    ));
    let json = serde_json::to_value(&failure).unwrap();
    assert_eq!(json["code"], "http_500");
}
