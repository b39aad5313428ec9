// src/exec/registry.rs

//! Bookkeeping of live spawned processes, used for bulk cancellation.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tokio::sync::oneshot;
use tracing::{debug, info};

/// Stable identifier of one registered process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProcessId(u64);

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

struct LiveProcess {
    pid: Option<u32>,
    label: String,
    kill: oneshot::Sender<()>,
}

/// Live processes keyed by [`ProcessId`].
///
/// The runner registers a process right after spawning it and holds the
/// returned [`Registration`] until the process settles; dropping the
/// registration removes the entry. `kill_all` drains the map in one go, so
/// an entry is removed exactly once whichever side gets there first.
#[derive(Default)]
pub struct ProcessRegistry {
    next_id: AtomicU64,
    live: Mutex<HashMap<ProcessId, LiveProcess>>,
}

impl fmt::Debug for ProcessRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessRegistry")
            .field("live", &self.len())
            .finish_non_exhaustive()
    }
}

impl ProcessRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a live process.
    ///
    /// The receiver fires when `kill_all` wants the process gone.
    pub fn register(
        &self,
        pid: Option<u32>,
        label: impl Into<String>,
    ) -> (Registration<'_>, oneshot::Receiver<()>) {
        let id = ProcessId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (kill, kill_rx) = oneshot::channel();
        let label = label.into();

        debug!(id = %id, ?pid, script = %label, "registering live process");
        self.live.lock().insert(id, LiveProcess { pid, label, kill });

        (Registration { id, registry: self }, kill_rx)
    }

    /// Signal every live process to terminate.
    ///
    /// Returns immediately; each process settles on its own afterwards.
    /// Returns how many processes were signalled.
    pub fn kill_all(&self) -> usize {
        let drained: Vec<(ProcessId, LiveProcess)> = self.live.lock().drain().collect();

        let mut signalled = 0;
        for (id, process) in drained {
            if process.kill.send(()).is_ok() {
                signalled += 1;
                debug!(id = %id, pid = ?process.pid, script = %process.label, "kill signalled");
            } else {
                debug!(id = %id, script = %process.label, "process settled before kill");
            }
        }

        if signalled > 0 {
            info!(count = signalled, "killed all live processes");
        }
        signalled
    }

    pub fn len(&self) -> usize {
        self.live.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.lock().is_empty()
    }

    /// OS pids of live processes, where known.
    pub fn pids(&self) -> Vec<u32> {
        self.live.lock().values().filter_map(|p| p.pid).collect()
    }

    fn remove(&self, id: ProcessId) -> bool {
        self.live.lock().remove(&id).is_some()
    }
}

/// Keeps a process registered; deregisters on drop.
#[must_use = "dropping the registration deregisters the process"]
pub struct Registration<'a> {
    id: ProcessId,
    registry: &'a ProcessRegistry,
}

impl Registration<'_> {
    pub fn id(&self) -> ProcessId {
        self.id
    }
}

impl Drop for Registration<'_> {
    fn drop(&mut self) {
        if self.registry.remove(self.id) {
            debug!(id = %self.id, "deregistered settled process");
        }
    }
}
