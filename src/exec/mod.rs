// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`backend`] defines the `ScriptRunner` trait the executor talks to.
//! - [`spawn`] decides how a script becomes a process (direct exec, inline
//!   shell, or a shell fed on stdin).
//! - [`runner`] is the production `ProcessRunner` built on
//!   `tokio::process::Command`.
//! - [`registry`] tracks live processes so they can be killed in bulk.

pub mod backend;
pub mod registry;
pub mod runner;
pub mod spawn;

pub use backend::{RunFuture, ScriptRunner};
pub use registry::{ProcessId, ProcessRegistry, Registration};
pub use runner::ProcessRunner;
pub use spawn::SpawnStrategy;
