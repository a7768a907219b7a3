//! Uniform device enumeration across backends.
//!
//! Native listing may block on driver queries, so [`NativeEnumerator`] runs
//! it on a helper thread and gives up after a timeout. A query that timed
//! out keeps its thread; until it returns, further queries for the same
//! backend are refused instead of piling up more threads. Every failure ends
//! as an empty device list; nothing here is fatal to a configuration session.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use hashbrown::HashSet;
use tonecanvas_shared::BackendId;
use tracing::{debug, warn};

use super::registry::{BackendDescriptor, ListDevicesFn};

/// Upper bound on a single native device query.
pub const DEFAULT_ENUMERATION_TIMEOUT: Duration = Duration::from_secs(3);

/// Why a device list could not be produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnumerationError {
    /// Backend not built with device listing on this platform
    #[error("{0} device listing is not available in this build")]
    Unavailable(BackendId),
    /// The native API reported an error
    #[error("native device query failed: {0}")]
    Native(String),
    #[error("native device query timed out after {0:?}")]
    TimedOut(Duration),
    /// An earlier query for this backend has not returned yet
    #[error("a {0} device query is still running")]
    Busy(BackendId),
}

/// Lists devices of a backend.
///
/// Implementations return an empty list for backends without a device
/// concept and for failed queries.
pub trait DeviceEnumerator {
    fn enumerate(&self, backend: &BackendDescriptor) -> Vec<String>;
}

/// Enumerator backed by each backend's native listing routine.
///
/// Clones share the set of queries still running.
#[derive(Debug, Clone)]
pub struct NativeEnumerator {
    timeout: Duration,
    pending: Arc<Mutex<HashSet<BackendId>>>,
}

impl NativeEnumerator {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_ENUMERATION_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            pending: Arc::default(),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Enumerate and report failures instead of swallowing them.
    ///
    /// Backends without a device list yield `Ok` with no devices. Duplicate
    /// names are removed, keeping the first occurrence.
    pub fn try_enumerate(
        &self,
        backend: &BackendDescriptor,
    ) -> Result<Vec<String>, EnumerationError> {
        if !backend.capabilities.has_device_list {
            return Ok(Vec::new());
        }
        let lister = backend
            .device_lister()
            .ok_or(EnumerationError::Unavailable(backend.id))?;

        let query = PendingQuery::start(&self.pending, backend.id)?;
        let devices = run_with_timeout(lister, query, self.timeout)?;
        Ok(dedup_preserving_order(devices))
    }
}

impl Default for NativeEnumerator {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceEnumerator for NativeEnumerator {
    fn enumerate(&self, backend: &BackendDescriptor) -> Vec<String> {
        match self.try_enumerate(backend) {
            Ok(devices) => {
                debug!(backend = %backend.id, count = devices.len(), "Enumerated devices");
                devices
            }
            Err(EnumerationError::Unavailable(id)) => {
                debug!(backend = %id, "Device listing unavailable, using empty list");
                Vec::new()
            }
            Err(e) => {
                warn!(backend = %backend.id, "Device enumeration failed: {}", e);
                Vec::new()
            }
        }
    }
}

/// Marks a backend's query as running until dropped.
struct PendingQuery {
    pending: Arc<Mutex<HashSet<BackendId>>>,
    backend: BackendId,
}

impl PendingQuery {
    fn start(
        pending: &Arc<Mutex<HashSet<BackendId>>>,
        backend: BackendId,
    ) -> Result<Self, EnumerationError> {
        let mut running = pending.lock().unwrap_or_else(PoisonError::into_inner);
        if !running.insert(backend) {
            return Err(EnumerationError::Busy(backend));
        }
        Ok(Self {
            pending: Arc::clone(pending),
            backend,
        })
    }
}

impl Drop for PendingQuery {
    fn drop(&mut self) {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.backend);
    }
}

/// Run a listing routine on a helper thread, waiting at most `timeout`.
///
/// A routine that hangs is left running detached; its late result is dropped.
/// `query` is released when the routine returns or panics.
fn run_with_timeout(
    lister: ListDevicesFn,
    query: PendingQuery,
    timeout: Duration,
) -> Result<Vec<String>, EnumerationError> {
    let (tx, rx) = mpsc::channel();
    thread::Builder::new()
        .name("device-enumeration".to_string())
        .spawn(move || {
            let tx = tx;
            // Declared after the sender so a panic releases it first
            let query = query;
            let result = lister();
            drop(query);
            let _ = tx.send(result);
        })
        .map_err(|e| EnumerationError::Native(format!("failed to spawn query thread: {e}")))?;

    match rx.recv_timeout(timeout) {
        Ok(result) => result,
        Err(RecvTimeoutError::Timeout) => Err(EnumerationError::TimedOut(timeout)),
        Err(RecvTimeoutError::Disconnected) => Err(EnumerationError::Native(
            "query thread exited without a result".to_string(),
        )),
    }
}

fn dedup_preserving_order(devices: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(devices.len());
    devices
        .into_iter()
        .filter(|device| seen.insert(device.clone()))
        .collect()
}
