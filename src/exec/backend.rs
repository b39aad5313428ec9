// src/exec/backend.rs

//! Pluggable script runner abstraction.
//!
//! The executor talks to a `ScriptRunner` instead of spawning processes
//! itself. Production code uses [`ProcessRunner`](super::ProcessRunner);
//! tests can provide a runner that records which scripts were launched and
//! fabricates results without touching the OS.

use std::future::Future;
use std::pin::Pin;

use crate::engine::LaunchOptions;
use crate::errors::Result;
use crate::graph::{Script, ScriptResult};

pub type RunFuture<'a> = Pin<Box<dyn Future<Output = Result<ScriptResult>> + Send + 'a>>;

/// Runs exactly one script and reports its result.
pub trait ScriptRunner: Send + Sync {
    /// Launch `script` and resolve once it has settled.
    ///
    /// Script failures are data (`exit_code`, `error`); only a hook failure
    /// is an `Err`.
    fn run<'a>(&'a self, script: &'a Script, options: &'a LaunchOptions) -> RunFuture<'a>;

    /// Terminate everything this runner currently has in flight.
    ///
    /// Returns how many processes were signalled.
    fn kill_all(&self) -> usize {
        0
    }
}
