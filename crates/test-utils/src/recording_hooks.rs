use std::sync::Arc;

use parking_lot::Mutex;

use launchgraph::hooks::{HookBus, HookEvent, HookFuture};

/// Hook subscriber that records `"<event>"` or `"<event>:<script>"` for
/// every emission, and can be told to reject one event name.
#[derive(Debug, Default, Clone)]
pub struct RecordingHooks {
    events: Arc<Mutex<Vec<String>>>,
    reject: Option<&'static str>,
}

impl RecordingHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every emission of `event` (e.g. `"script-start"`).
    pub fn rejecting(event: &'static str) -> Self {
        Self {
            reject: Some(event),
            ..Self::default()
        }
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().clone()
    }
}

impl HookBus for RecordingHooks {
    fn emit<'a>(&'a self, event: HookEvent<'a>) -> HookFuture<'a> {
        let name = event.name();
        let entry = match event {
            HookEvent::ScriptStart { script, .. } => format!("{name}:{script}"),
            HookEvent::ScriptEnd(result) | HookEvent::ScriptError(result) => {
                format!("{name}:{}", result.script)
            }
            HookEvent::TaskStart(_) | HookEvent::TaskEnd(_) => name.to_string(),
        };
        self.events.lock().push(entry);

        let reject = self.reject == Some(name);
        Box::pin(async move {
            if reject {
                anyhow::bail!("subscriber rejected {name}");
            }
            Ok(())
        })
    }
}
