// src/engine/mod.rs

//! Graph-walking scheduler.
//!
//! - [`fold`] is the serial fold with its explicit continue/bail flow.
//! - [`executor`] walks Task -> Group -> Step -> ScriptUnit, fanning out
//!   parallel levels and folding serial ones, and hands each script to a
//!   [`ScriptRunner`](crate::exec::ScriptRunner).

use std::path::PathBuf;

use crate::types::{ShellCapability, StdioMode};

pub mod executor;
pub mod fold;

pub use executor::TaskExecutor;
pub use fold::{Flow, SerialFold};

/// Options for one launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchOptions {
    /// Stop scheduling further serial elements after a failure.
    pub bail: bool,
    /// Working directory for spawned processes; `None` inherits ours.
    pub cwd: Option<PathBuf>,
    pub stdio: StdioMode,
    /// Startup decision on how shell text is launched.
    pub shell: ShellCapability,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            bail: true,
            cwd: None,
            stdio: StdioMode::default(),
            shell: ShellCapability::default(),
        }
    }
}
