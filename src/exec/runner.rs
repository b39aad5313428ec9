// src/exec/runner.rs

//! Runs a single script as an OS process.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::process::Child;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::engine::LaunchOptions;
use crate::errors::{LaunchError, Result};
use crate::exec::backend::{RunFuture, ScriptRunner};
use crate::exec::registry::ProcessRegistry;
use crate::exec::spawn::SpawnStrategy;
use crate::graph::{Script, ScriptResult, SpawnFailure};
use crate::hooks::{HookBus, HookEvent};

/// How long bridged output may keep draining after the child exits.
const BRIDGE_DRAIN: Duration = Duration::from_millis(200);

/// Production [`ScriptRunner`]: one OS process per script.
///
/// Every spawned process is registered with the shared [`ProcessRegistry`]
/// for its whole lifetime, so `kill_all` reaches it wherever the graph walk
/// currently is.
#[derive(Clone)]
pub struct ProcessRunner {
    hooks: Arc<dyn HookBus>,
    registry: Arc<ProcessRegistry>,
}

impl ProcessRunner {
    pub fn new(hooks: Arc<dyn HookBus>, registry: Arc<ProcessRegistry>) -> Self {
        Self { hooks, registry }
    }

    pub fn registry(&self) -> &Arc<ProcessRegistry> {
        &self.registry
    }

    /// Run `script`, emitting `script-start` before spawning and
    /// `script-end` / `script-error` once the result is known.
    pub async fn run_script(&self, script: &Script, options: &LaunchOptions) -> Result<ScriptResult> {
        let start = Utc::now();

        self.hooks
            .emit(HookEvent::ScriptStart { script, start })
            .await
            .map_err(|e| LaunchError::hook("script-start", e))?;

        let result = self.execute(script, options, start).await;

        let event = if result.error.is_some() {
            HookEvent::ScriptError(&result)
        } else {
            HookEvent::ScriptEnd(&result)
        };
        let name = event.name();
        self.hooks
            .emit(event)
            .await
            .map_err(|e| LaunchError::hook(name, e))?;

        Ok(result)
    }

    async fn execute(&self, script: &Script, options: &LaunchOptions, start: DateTime<Utc>) -> ScriptResult {
        let strategy = match SpawnStrategy::select(script, options.shell) {
            Ok(strategy) => strategy,
            Err(failure) => {
                warn!(script = %script, error = %failure, "script cannot be spawned");
                return ScriptResult::spawn_failed(script.clone(), start, failure);
            }
        };

        let mut child = match strategy.command(options).spawn() {
            Ok(child) => child,
            Err(err) => {
                let failure = SpawnFailure::from_io(strategy.program(), &err);
                warn!(script = %script, error = %failure, "failed to spawn process");
                return ScriptResult::spawn_failed(script.clone(), start, failure);
            }
        };

        let pid = child.id();
        let (registration, mut kill_rx) = self.registry.register(pid, script.raw());
        info!(script = %script, ?pid, id = %registration.id(), "process started");

        let bridges = attach_piped_io(&strategy, &mut child);

        // Either the process exits on its own, or `kill_all` asks for it.
        let mut killed = false;
        let status = tokio::select! {
            status = child.wait() => status,
            Ok(()) = &mut kill_rx => {
                killed = true;
                info!(script = %script, ?pid, "kill requested; terminating process");
                if let Err(e) = child.kill().await {
                    warn!(script = %script, ?pid, error = %e, "failed to kill process");
                }
                child.wait().await
            }
        };
        drop(registration);

        if !killed {
            drain_bridges(bridges).await;
        }

        match status {
            Ok(status) => {
                // No exit code means the process died from a signal.
                let exit_code = status.code().unwrap_or(1);
                info!(
                    script = %script,
                    ?pid,
                    exit_code,
                    success = status.success(),
                    "process exited"
                );
                ScriptResult {
                    script: script.clone(),
                    start,
                    end: Utc::now(),
                    exit_code,
                    error: None,
                }
            }
            Err(err) => {
                let failure = SpawnFailure::from_io(strategy.program(), &err);
                warn!(script = %script, ?pid, error = %failure, "waiting for process failed");
                ScriptResult::spawn_failed(script.clone(), start, failure)
            }
        }
    }
}

impl ScriptRunner for ProcessRunner {
    fn run<'a>(&'a self, script: &'a Script, options: &'a LaunchOptions) -> RunFuture<'a> {
        Box::pin(self.run_script(script, options))
    }

    fn kill_all(&self) -> usize {
        self.registry.kill_all()
    }
}

/// Feed the piped shell its script and bridge any piped output to ours.
fn attach_piped_io(strategy: &SpawnStrategy, child: &mut Child) -> Vec<JoinHandle<()>> {
    let mut bridges = Vec::new();

    if let Some(text) = strategy.stdin_script() {
        if let Some(mut stdin) = child.stdin.take() {
            let mut text = text.to_string();
            text.push('\n');
            bridges.push(tokio::spawn(async move {
                if let Err(e) = stdin.write_all(text.as_bytes()).await {
                    debug!(error = %e, "writing script to shell stdin failed");
                }
                // Dropping stdin closes it so the shell sees EOF.
            }));
        }
    }

    if let Some(stdout) = child.stdout.take() {
        bridges.push(bridge(stdout, tokio::io::stdout()));
    }
    if let Some(stderr) = child.stderr.take() {
        bridges.push(bridge(stderr, tokio::io::stderr()));
    }

    bridges
}

fn bridge<R, W>(mut from: R, mut to: W) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        if let Err(e) = tokio::io::copy(&mut from, &mut to).await {
            debug!(error = %e, "output bridge closed with error");
        }
        let _ = to.flush().await;
    })
}

/// Give bridged output a moment to flush; a background grandchild holding
/// the pipe open must not stall the graph.
async fn drain_bridges(bridges: Vec<JoinHandle<()>>) {
    let open = bridges.len();
    if tokio::time::timeout(BRIDGE_DRAIN, futures::future::join_all(bridges))
        .await
        .is_err()
    {
        debug!(open, "output bridges still open after process exit; leaving them to finish");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::NoopHooks;
    use crate::types::{ShellCapability, StdioMode};

    fn quiet() -> LaunchOptions {
        LaunchOptions {
            stdio: StdioMode::Ignore,
            ..LaunchOptions::default()
        }
    }

    fn runner() -> ProcessRunner {
        ProcessRunner::new(Arc::new(NoopHooks), Arc::new(ProcessRegistry::new()))
    }

    #[tokio::test]
    async fn shell_exit_status_is_reported() {
        let runner = runner();
        let result = runner.run_script(&Script::shell("exit 3"), &quiet()).await.unwrap();
        assert_eq!(result.exit_code, 3);
        assert!(result.error.is_none());
        assert!(result.start <= result.end);
        assert!(runner.registry().is_empty());
    }

    #[tokio::test]
    async fn piped_shell_reads_the_script_from_stdin() {
        let options = LaunchOptions {
            shell: ShellCapability::Piped,
            ..quiet()
        };
        let result = runner()
            .run_script(&Script::shell("true && exit 4"), &options)
            .await
            .unwrap();
        assert_eq!(result.exit_code, 4);
    }

    #[tokio::test]
    async fn cwd_is_applied_to_the_child() {
        let dir = std::env::temp_dir();
        let options = LaunchOptions {
            cwd: Some(dir.clone()),
            ..quiet()
        };
        let script = Script::shell(format!("test \"$(pwd -P)\" = \"{}\"", dir.canonicalize().unwrap().display()));
        let result = runner().run_script(&script, &options).await.unwrap();
        assert_eq!(result.exit_code, 0);
    }

    #[tokio::test]
    async fn stuck_bridges_share_a_single_drain_window() {
        let stuck = (0..3)
            .map(|_| tokio::spawn(std::future::pending::<()>()))
            .collect::<Vec<_>>();
        let started = std::time::Instant::now();
        drain_bridges(stuck).await;
        assert!(started.elapsed() < BRIDGE_DRAIN * 2);
    }
}
