//! Per-operation busy lifecycle.
//!
//! Each executor invocation gets its own [`OperationHandle`]. An injected
//! [`LifecycleObserver`] hears `on_dispatch` right before the request leaves
//! and `on_settle` once the operation is over. Nothing here is a single
//! global flag: two concurrent operations produce two handles, and a
//! presentation layer that wants one combined "busy" indicator aggregates
//! them, which is what [`ActivityTracker`] does.
//!
//! `on_settle` is driven by a drop guard, so it fires on every exit path:
//! success, service failure, transport failure, a body that fails to decode,
//! and even the executor future being dropped mid-flight.
//!
//! # Example
//!
//! ```rust
//! use edgequake_edudoc::{ActivityTracker, ClientConfig, LifecycleObserver};
//! use std::sync::Arc;
//!
//! let tracker = Arc::new(ActivityTracker::new());
//! let config = ClientConfig::builder()
//!     .observer(tracker.clone() as Arc<dyn LifecycleObserver>)
//!     .build()
//!     .unwrap();
//! assert!(!tracker.is_busy());
//! # let _ = config;
//! ```

use crate::operation::Operation;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

static NEXT_HANDLE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one in-flight operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OperationHandle {
    id: u64,
    operation: Operation,
}

impl OperationHandle {
    pub(crate) fn allocate(operation: Operation) -> Self {
        Self {
            id: NEXT_HANDLE_ID.fetch_add(1, Ordering::Relaxed),
            operation,
        }
    }

    /// Process-unique, increasing id.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }
}

/// Receives busy transitions for each operation.
///
/// Implementations must be `Send + Sync`: independent operations may run
/// concurrently and call in from different tasks. All methods default to
/// no-ops.
pub trait LifecycleObserver: Send + Sync {
    /// The operation is about to hit the network.
    fn on_dispatch(&self, handle: &OperationHandle) {
        let _ = handle;
    }

    /// The operation is over, whatever its outcome. Called exactly once per
    /// `on_dispatch`.
    fn on_settle(&self, handle: &OperationHandle) {
        let _ = handle;
    }
}

/// Default observer when none is configured.
pub struct NoopObserver;

impl LifecycleObserver for NoopObserver {}

/// Convenience alias matching the type stored in [`crate::config::ClientConfig`].
pub type Observer = Arc<dyn LifecycleObserver>;

/// Aggregates handles into a combined busy indicator.
#[derive(Debug, Default)]
pub struct ActivityTracker {
    active: Mutex<BTreeMap<u64, Operation>>,
}

impl ActivityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_flight(&self) -> usize {
        self.lock().len()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight() > 0
    }

    /// Operations currently in flight, oldest first.
    pub fn active(&self) -> Vec<Operation> {
        self.lock().values().copied().collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<u64, Operation>> {
        self.active.lock().unwrap_or_else(|poison| poison.into_inner())
    }
}

impl LifecycleObserver for ActivityTracker {
    fn on_dispatch(&self, handle: &OperationHandle) {
        self.lock().insert(handle.id(), handle.operation());
    }

    fn on_settle(&self, handle: &OperationHandle) {
        self.lock().remove(&handle.id());
    }
}

/// Holds an operation busy until dropped.
pub(crate) struct BusyGuard {
    handle: OperationHandle,
    observer: Observer,
}

impl BusyGuard {
    pub(crate) fn enter(handle: OperationHandle, observer: Observer) -> Self {
        observer.on_dispatch(&handle);
        Self { handle, observer }
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.observer.on_settle(&self.handle);
    }
}
