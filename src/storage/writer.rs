//! Asynchronous snapshot writer.
//!
//! Mutations update the in-memory snapshot and return immediately; the
//! durable write happens on a worker thread. `is_saving` exposes whether a
//! write is still in flight, and `flush` drains the queue at process exit
//! and in tests. A crash between `queue` and the completed write loses the
//! most recent mutation; that window is the accepted durability gap.
//!
//! Write failures never propagate to the caller: the worker logs a warning
//! and keeps the error readable via `last_error`, and the in-memory
//! snapshot stays authoritative.

use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::core::PracticeState;
use crate::storage::StateStore;

/// How long shutdown waits for the queue to drain.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Default)]
struct Shared {
    /// Snapshots queued but not yet written.
    pending: Mutex<usize>,
    /// Signalled when `pending` reaches zero.
    drained: Condvar,
    /// Message of the most recent failed write, cleared on success.
    last_error: Mutex<Option<String>>,
}

/// Background writer that persists snapshots through a `StateStore`.
///
/// A backlog is coalesced to the newest snapshot before writing; every
/// snapshot is a full state, so intermediate ones carry no information the
/// newest does not.
#[derive(Debug)]
pub struct SnapshotWriter {
    tx: Option<Sender<PracticeState>>,
    shared: Arc<Shared>,
    worker: Option<JoinHandle<()>>,
}

impl SnapshotWriter {
    /// Spawn the worker thread writing through `store`.
    pub fn spawn<S: StateStore + 'static>(store: S) -> Self {
        let (tx, rx) = mpsc::channel::<PracticeState>();
        let shared = Arc::new(Shared::default());
        let worker_shared = Arc::clone(&shared);

        let worker = thread::spawn(move || {
            while let Ok(mut snapshot) = rx.recv() {
                let mut batch = 1;
                while let Ok(newer) = rx.try_recv() {
                    snapshot = newer;
                    batch += 1;
                }

                match store.save(&snapshot) {
                    Ok(()) => {
                        *worker_shared.last_error.lock().unwrap() = None;
                    }
                    Err(err) => {
                        tracing::warn!("snapshot write failed: {}", err);
                        *worker_shared.last_error.lock().unwrap() = Some(err.to_string());
                    }
                }

                let mut pending = worker_shared.pending.lock().unwrap();
                *pending = pending.saturating_sub(batch);
                if *pending == 0 {
                    worker_shared.drained.notify_all();
                }
            }
        });

        Self {
            tx: Some(tx),
            shared,
            worker: Some(worker),
        }
    }

    /// Queue a snapshot for durable storage. Returns immediately.
    pub fn queue(&self, snapshot: PracticeState) {
        if let Some(tx) = &self.tx {
            *self.shared.pending.lock().unwrap() += 1;
            if tx.send(snapshot).is_err() {
                *self.shared.pending.lock().unwrap() -= 1;
                tracing::warn!("snapshot writer thread is gone; mutation not persisted");
            }
        }
    }

    /// Whether a durable write is still in flight.
    pub fn is_saving(&self) -> bool {
        *self.shared.pending.lock().unwrap() > 0
    }

    /// Block until the queue drains or the timeout passes.
    ///
    /// Returns `true` when everything queued so far has been written.
    pub fn flush(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut pending = self.shared.pending.lock().unwrap();
        while *pending > 0 {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            let (guard, wait) = self
                .shared
                .drained
                .wait_timeout(pending, deadline - now)
                .unwrap();
            pending = guard;
            if wait.timed_out() && *pending > 0 {
                return false;
            }
        }
        true
    }

    /// Message of the most recent failed write, if the last write failed.
    pub fn last_error(&self) -> Option<String> {
        self.shared.last_error.lock().unwrap().clone()
    }
}

impl Drop for SnapshotWriter {
    fn drop(&mut self) {
        if !self.flush(SHUTDOWN_TIMEOUT) {
            tracing::warn!("snapshot writer did not drain; most recent mutation may be lost");
        }
        // Hang up the channel so the worker's recv() ends, then reap it.
        self.tx.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}
