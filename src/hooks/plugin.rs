// src/hooks/plugin.rs

//! Host-driven plugin lifecycle.
//!
//! The executor never registers itself anywhere. A host that owns a
//! `launch` event calls [`LaunchPlugin::attach`] to subscribe it and
//! [`LaunchPlugin::detach`] to unsubscribe it, which also kills whatever the
//! plugin still has running.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tracing::info;

use crate::engine::{LaunchOptions, TaskExecutor};
use crate::errors::Result;
use crate::exec::{ProcessRunner, ScriptRunner};
use crate::graph::{ResultTree, Task};
use crate::hooks::bus::SubscriptionId;

pub type LaunchFuture<'a> = Pin<Box<dyn Future<Output = Result<ResultTree>> + Send + 'a>>;

/// Something that reacts to the host's `launch` event.
pub trait LaunchHandler: Send + Sync {
    fn on_launch<'a>(&'a self, task: &'a Task) -> LaunchFuture<'a>;
}

/// Host side of the `launch` subscription.
pub trait LaunchHost {
    fn subscribe_launch(&self, handler: Arc<dyn LaunchHandler>) -> SubscriptionId;
    fn unsubscribe_launch(&self, id: SubscriptionId) -> bool;
}

/// Proof of an active attachment, consumed by `detach`.
#[derive(Debug)]
#[must_use = "keep the handle to detach the plugin later"]
pub struct PluginHandle {
    subscription: SubscriptionId,
}

/// Binds a [`TaskExecutor`] and fixed options to a host's `launch` event.
pub struct LaunchPlugin<R: ScriptRunner = ProcessRunner> {
    executor: Arc<TaskExecutor<R>>,
    options: LaunchOptions,
}

impl<R: ScriptRunner + 'static> LaunchPlugin<R> {
    pub fn new(executor: Arc<TaskExecutor<R>>, options: LaunchOptions) -> Self {
        Self { executor, options }
    }

    /// Build the plugin from a command-line value.
    ///
    /// `force` turns bail off, everything else keeps `options` as given.
    pub fn with_value(executor: Arc<TaskExecutor<R>>, mut options: LaunchOptions, value: Option<&str>) -> Self {
        if value == Some("force") {
            options.bail = false;
        }
        Self::new(executor, options)
    }

    pub fn options(&self) -> &LaunchOptions {
        &self.options
    }

    pub fn attach(&self, host: &dyn LaunchHost) -> PluginHandle {
        let subscription = host.subscribe_launch(Arc::new(Subscription {
            executor: Arc::clone(&self.executor),
            options: self.options.clone(),
        }));
        info!(?subscription, bail = self.options.bail, "launch plugin attached");
        PluginHandle { subscription }
    }

    /// Unsubscribe from the host and kill every live process.
    ///
    /// Returns how many processes were signalled.
    pub fn detach(&self, host: &dyn LaunchHost, handle: PluginHandle) -> usize {
        host.unsubscribe_launch(handle.subscription);
        let killed = self.executor.runner().kill_all();
        info!(subscription = ?handle.subscription, killed, "launch plugin detached");
        killed
    }
}

struct Subscription<R: ScriptRunner> {
    executor: Arc<TaskExecutor<R>>,
    options: LaunchOptions,
}

impl<R: ScriptRunner> LaunchHandler for Subscription<R> {
    fn on_launch<'a>(&'a self, task: &'a Task) -> LaunchFuture<'a> {
        Box::pin(self.executor.launch(task, &self.options))
    }
}
