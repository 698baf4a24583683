//! Operation execution: send one envelope, classify what comes back.
//!
//! ## State machine
//!
//! ```text
//! Idle ──▶ Dispatching ──┬─▶ Success           ──▶ Idle
//!                        ├─▶ ServiceFailure    ──▶ Idle
//!                        └─▶ TransportFailure  ──▶ Idle
//! ```
//!
//! Entering `Dispatching` allocates an [`OperationHandle`] and fires
//! `on_dispatch`; leaving it fires `on_settle` from a drop guard, so the
//! busy indicator is released on every branch. There is exactly one
//! attempt. Nothing is retried, since the service's behaviour under repeated
//! submission of the same artifact is unknown.
//!
//! ## Classification
//!
//! | Response | Outcome |
//! |----------|---------|
//! | no response | `Failure`, code `transport` |
//! | non-2xx | `Failure` with the body's `detail` or the generic message |
//! | 2xx, binary operation, non-JSON body | `Binary` with the catalog file name |
//! | 2xx, JSON body, `success: true`, result field present | `Decoded` |
//! | 2xx, JSON body, anything else | `Failure` |
//! | 2xx, body is not a JSON object | `Failure`, code `malformed_body` |

use crate::lifecycle::{BusyGuard, Observer, OperationHandle};
use crate::operation::{Operation, ResponseKind};
use crate::output::{BinaryResult, DecodedResult, Failure, FailureCode, OperationOutcome};
use crate::pipeline::envelope::OperationRequest;
use crate::pipeline::transport::{RawResponse, Transport};
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Runs operations against a [`Transport`], reporting busy transitions to
/// an observer.
#[derive(Clone)]
pub struct Executor {
    transport: Arc<dyn Transport>,
    observer: Observer,
}

impl std::fmt::Debug for Executor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor").finish_non_exhaustive()
    }
}

impl Executor {
    pub fn new(transport: Arc<dyn Transport>, observer: Observer) -> Self {
        Self {
            transport,
            observer,
        }
    }

    /// Send `request` once and classify the response.
    ///
    /// Never returns an error: every failure mode becomes
    /// [`OperationOutcome::Failure`].
    pub async fn execute(&self, request: &OperationRequest) -> OperationOutcome {
        let operation = request.operation();
        let handle = OperationHandle::allocate(operation);
        let _busy = BusyGuard::enter(handle, Arc::clone(&self.observer));

        let start = Instant::now();
        info!(
            "[{}] {} → {}",
            handle.id(),
            operation,
            operation.endpoint()
        );

        let outcome = match self.transport.send(request).await {
            Ok(response) => classify(request, response),
            Err(e) => OperationOutcome::Failure(Failure::new(
                operation,
                format!("Erro: {e}"),
                FailureCode::Transport,
            )),
        };

        let elapsed_ms = start.elapsed().as_millis() as u64;
        match &outcome {
            OperationOutcome::Failure(f) => warn!(
                "[{}] {} failed after {}ms: {} ({})",
                handle.id(),
                operation,
                elapsed_ms,
                f.message,
                f.code.map(|c| c.to_string()).unwrap_or_default()
            ),
            OperationOutcome::Binary(b) => info!(
                "[{}] {} → {} ({} bytes) in {}ms",
                handle.id(),
                operation,
                b.filename,
                b.content.len(),
                elapsed_ms
            ),
            OperationOutcome::Decoded(d) => info!(
                "[{}] {} → {} fields in {}ms",
                handle.id(),
                operation,
                d.fields.len(),
                elapsed_ms
            ),
        }
        outcome
    }
}

/// Map a raw response to an outcome, per the operation's declared kind.
pub fn classify(request: &OperationRequest, response: RawResponse) -> OperationOutcome {
    let operation = request.operation();

    if !response.is_success() {
        let detail = serde_json::from_slice::<Value>(&response.body)
            .ok()
            .and_then(|v| service_detail(&v));
        return failure(
            operation,
            detail.unwrap_or_else(|| operation.failure_message().to_string()),
            FailureCode::Http(response.status),
        );
    }

    match operation.response_kind() {
        ResponseKind::Binary(rule) if !response.is_json() => {
            let filename = request
                .download_name()
                .unwrap_or_else(|| rule.render(None, None));
            OperationOutcome::Binary(BinaryResult {
                operation,
                filename,
                content_type: response.content_type,
                content: response.body,
            })
        }
        // A binary operation answering JSON: the service had nothing to
        // download (e.g. one-chunk split) or is reporting an error.
        ResponseKind::Binary(_) => decode(operation, &response.body, true, None),
        ResponseKind::Decoded {
            success_marker,
            field,
        } => decode(operation, &response.body, success_marker, field),
    }
}

fn decode(
    operation: Operation,
    body: &[u8],
    success_marker: bool,
    field: Option<&'static str>,
) -> OperationOutcome {
    let fields: Map<String, Value> = match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            return failure(
                operation,
                format!("Erro: expected a JSON object, got {}", json_type(&other)),
                FailureCode::MalformedBody,
            )
        }
        Err(e) => return failure(operation, format!("Erro: {e}"), FailureCode::MalformedBody),
    };

    if success_marker && fields.get("success") != Some(&Value::Bool(true)) {
        let detail = service_detail(&Value::Object(fields));
        return failure(
            operation,
            detail.unwrap_or_else(|| operation.failure_message().to_string()),
            FailureCode::Service,
        );
    }

    if let Some(name) = field {
        if fields.get(name).is_none_or(Value::is_null) {
            return failure(
                operation,
                operation.failure_message(),
                FailureCode::MissingField,
            );
        }
    }

    OperationOutcome::Decoded(DecodedResult { operation, fields })
}

/// The service's own explanation, if the body has one.
fn service_detail(body: &Value) -> Option<String> {
    ["detail", "message"]
        .iter()
        .filter_map(|key| body.get(key).and_then(Value::as_str))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

fn failure(
    operation: Operation,
    message: impl Into<String>,
    code: FailureCode,
) -> OperationOutcome {
    OperationOutcome::Failure(Failure::new(operation, message, code))
}

fn json_type(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
