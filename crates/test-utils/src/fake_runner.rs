use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use parking_lot::Mutex;

use launchgraph::engine::LaunchOptions;
use launchgraph::exec::{RunFuture, ScriptRunner};
use launchgraph::graph::{Script, ScriptResult, SpawnFailure};

#[derive(Debug, Clone, Copy, Default)]
struct Outcome {
    exit_code: i32,
    delay: Duration,
    spawn_fails: bool,
}

/// A fake runner that:
/// - records which scripts were launched, in launch order
/// - resolves each script after its configured delay with its configured
///   exit code (default: immediate success).
#[derive(Debug, Default, Clone)]
pub struct FakeRunner {
    outcomes: HashMap<String, Outcome>,
    launched: Arc<Mutex<Vec<String>>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exit(mut self, raw: &str, exit_code: i32) -> Self {
        self.outcomes.entry(raw.to_string()).or_default().exit_code = exit_code;
        self
    }

    pub fn delay(mut self, raw: &str, delay: Duration) -> Self {
        self.outcomes.entry(raw.to_string()).or_default().delay = delay;
        self
    }

    /// Make `raw` behave like a missing executable.
    pub fn spawn_fails(mut self, raw: &str) -> Self {
        self.outcomes.entry(raw.to_string()).or_default().spawn_fails = true;
        self
    }

    /// Shared handle on the launch log.
    pub fn launched_handle(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.launched)
    }

    pub fn launched(&self) -> Vec<String> {
        self.launched.lock().clone()
    }
}

impl ScriptRunner for FakeRunner {
    fn run<'a>(&'a self, script: &'a Script, _options: &'a LaunchOptions) -> RunFuture<'a> {
        let outcome = self.outcomes.get(script.raw()).copied().unwrap_or_default();
        let launched = Arc::clone(&self.launched);

        Box::pin(async move {
            let start = Utc::now();
            launched.lock().push(script.raw().to_string());

            if outcome.spawn_fails {
                let failure = SpawnFailure::new(script.raw(), "not found");
                return Ok(ScriptResult::spawn_failed(script.clone(), start, failure));
            }

            if !outcome.delay.is_zero() {
                tokio::time::sleep(outcome.delay).await;
            }

            Ok(ScriptResult {
                script: script.clone(),
                start,
                end: Utc::now(),
                exit_code: outcome.exit_code,
                error: None,
            })
        })
    }
}
