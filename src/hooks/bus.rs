// src/hooks/bus.rs

//! In-process hook host.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tracing::debug;

use crate::errors::Result;
use crate::graph::{ResultTree, Task};
use crate::hooks::plugin::{LaunchHandler, LaunchHost};
use crate::hooks::{HookBus, HookEvent, HookFuture};

/// Identifier returned by every subscription on an [`EventBus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// A minimal async event bus.
///
/// Hook subscribers are called one after another in subscription order and
/// each is awaited; the first error stops the emission and is returned.
/// `launch` handlers are what [`LaunchPlugin`](super::LaunchPlugin)
/// attaches.
#[derive(Default)]
pub struct EventBus {
    next_id: AtomicU64,
    hooks: Mutex<BTreeMap<SubscriptionId, Arc<dyn HookBus>>>,
    launchers: Mutex<BTreeMap<SubscriptionId, Arc<dyn LaunchHandler>>>,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("hooks", &self.hooks.lock().len())
            .field("launchers", &self.launchers.lock().len())
            .finish_non_exhaustive()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, subscriber: Arc<dyn HookBus>) -> SubscriptionId {
        let id = self.next_id();
        self.hooks.lock().insert(id, subscriber);
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.hooks.lock().remove(&id).is_some()
    }

    /// Emit `launch` to every attached handler, in attach order.
    ///
    /// Returns one result tree per handler; with nothing attached the list
    /// is empty.
    pub async fn launch(&self, task: &Task) -> Result<Vec<ResultTree>> {
        let handlers: Vec<Arc<dyn LaunchHandler>> = self.launchers.lock().values().cloned().collect();
        debug!(handlers = handlers.len(), "emitting launch");

        let mut trees = Vec::with_capacity(handlers.len());
        for handler in handlers {
            trees.push(handler.on_launch(task).await?);
        }
        Ok(trees)
    }

    fn next_id(&self) -> SubscriptionId {
        SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }
}

impl HookBus for EventBus {
    fn emit<'a>(&'a self, event: HookEvent<'a>) -> HookFuture<'a> {
        // Snapshot so no lock is held across an await.
        let subscribers: Vec<Arc<dyn HookBus>> = self.hooks.lock().values().cloned().collect();

        Box::pin(async move {
            for subscriber in subscribers {
                subscriber.emit(event).await?;
            }
            Ok(())
        })
    }
}

impl LaunchHost for EventBus {
    fn subscribe_launch(&self, handler: Arc<dyn LaunchHandler>) -> SubscriptionId {
        let id = self.next_id();
        self.launchers.lock().insert(id, handler);
        id
    }

    fn unsubscribe_launch(&self, id: SubscriptionId) -> bool {
        self.launchers.lock().remove(&id).is_some()
    }
}
