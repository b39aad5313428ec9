// src/hooks/mod.rs

//! Lifecycle notifications.
//!
//! The core only *consumes* a hook bus: it calls [`HookBus::emit`] at task
//! and script boundaries and awaits each emission before moving on. A
//! subscriber error is propagated to whoever called the entry point.
//!
//! - [`bus`] provides `EventBus`, a small in-process host used by the
//!   binary and by tests.
//! - [`plugin`] models attaching the executor to a host's `launch` event.

use std::future::Future;
use std::pin::Pin;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::graph::{ResultTree, Script, ScriptResult, Task};

pub mod bus;
pub mod plugin;

pub use bus::{EventBus, SubscriptionId};
pub use plugin::{LaunchHandler, LaunchHost, LaunchPlugin, PluginHandle};

pub type HookFuture<'a> = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'a>>;

/// Events emitted by the executor and the process runner.
#[derive(Debug, Clone, Copy)]
pub enum HookEvent<'a> {
    /// Before any group begins.
    TaskStart(&'a Task),
    /// After every group has settled.
    TaskEnd(&'a ResultTree),
    /// Before a script's process is spawned.
    ScriptStart {
        script: &'a Script,
        start: DateTime<Utc>,
    },
    /// A script's process exited (successfully or not).
    ScriptEnd(&'a ScriptResult),
    /// A script's process could not be created.
    ScriptError(&'a ScriptResult),
}

impl HookEvent<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            HookEvent::TaskStart(_) => "task-start",
            HookEvent::TaskEnd(_) => "task-end",
            HookEvent::ScriptStart { .. } => "script-start",
            HookEvent::ScriptEnd(_) => "script-end",
            HookEvent::ScriptError(_) => "script-error",
        }
    }
}

/// Async publish side of the hook bus.
///
/// The returned future resolves once every subscriber has handled the
/// event.
pub trait HookBus: Send + Sync {
    fn emit<'a>(&'a self, event: HookEvent<'a>) -> HookFuture<'a>;
}

/// Bus with no subscribers.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHooks;

impl HookBus for NoopHooks {
    fn emit<'a>(&'a self, _event: HookEvent<'a>) -> HookFuture<'a> {
        Box::pin(async { Ok(()) })
    }
}

/// Subscriber that reports lifecycle events through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingHooks;

impl HookBus for TracingHooks {
    fn emit<'a>(&'a self, event: HookEvent<'a>) -> HookFuture<'a> {
        match event {
            HookEvent::TaskStart(task) => {
                info!(groups = task.groups.len(), scripts = task.scripts().count(), "task start");
            }
            HookEvent::TaskEnd(tree) => {
                info!(
                    results = tree.len(),
                    failed = tree.failures().count(),
                    "task end"
                );
            }
            HookEvent::ScriptStart { script, .. } => {
                debug!(script = %script, "script start");
            }
            HookEvent::ScriptEnd(result) => {
                info!(
                    script = %result.script,
                    exit_code = result.exit_code,
                    elapsed_ms = result.duration().as_millis() as u64,
                    "script end"
                );
            }
            HookEvent::ScriptError(result) => {
                if let Some(error) = &result.error {
                    warn!(script = %result.script, error = %error, "script error");
                }
            }
        }
        Box::pin(async { Ok(()) })
    }
}
