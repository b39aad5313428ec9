// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod graph;
pub mod hooks;
pub mod logging;
pub mod types;

use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::{ConfigFile, load_and_validate};
use crate::engine::TaskExecutor;
use crate::exec::ProcessRegistry;
use crate::graph::{ResultTree, ScriptUnit};
use crate::hooks::{EventBus, LaunchPlugin, TracingHooks};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - launch file loading (+ CLI overrides)
/// - the in-process hook bus with a tracing subscriber
/// - the executor, attached to the bus as a launch plugin
/// - Ctrl-C handling (kills every live process)
///
/// Returns whether every launched script succeeded.
pub async fn run(args: CliArgs) -> Result<bool> {
    let config_path = args.config.clone();
    let mut cfg = load_and_validate(&config_path)?;
    apply_cli_overrides(&mut cfg, &args);

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(true);
    }

    let bus = Arc::new(EventBus::new());
    bus.subscribe(Arc::new(TracingHooks));

    let registry = Arc::new(ProcessRegistry::new());
    let executor = Arc::new(TaskExecutor::with_processes(bus.clone(), Arc::clone(&registry)));
    let value = args.force.then_some("force");
    let plugin = LaunchPlugin::with_value(executor, cfg.options.clone(), value);
    let handle = plugin.attach(bus.as_ref());

    // Ctrl-C → kill everything in flight; the graph settles on its own.
    {
        let registry = Arc::clone(&registry);
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            warn!("interrupted; killing live processes");
            registry.kill_all();
        });
    }

    let outcome = bus.launch(&cfg.task).await;
    plugin.detach(bus.as_ref(), handle);
    let trees = outcome?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&trees)?);
    }

    let ok = trees.iter().all(ResultTree::all_succeeded);
    report(&trees);
    Ok(ok)
}

fn apply_cli_overrides(cfg: &mut ConfigFile, args: &CliArgs) {
    if let Some(shell) = args.shell {
        cfg.options.shell = shell;
    }
    if let Some(stdio) = args.stdio {
        cfg.options.stdio = stdio;
    }
}

fn report(trees: &[ResultTree]) {
    for tree in trees {
        let failed: Vec<_> = tree.failures().collect();
        if failed.is_empty() {
            info!(scripts = tree.len(), "all scripts succeeded");
            continue;
        }
        for result in failed {
            match &result.error {
                Some(error) => warn!(script = %result.script, error = %error, "script failed to start"),
                None => warn!(script = %result.script, exit_code = result.exit_code, "script failed"),
            }
        }
    }
}

/// Simple dry-run output: print the graph and options.
fn print_dry_run(cfg: &ConfigFile) {
    println!("launchgraph dry-run");
    println!("  options.bail = {}", cfg.options.bail);
    if let Some(cwd) = &cfg.options.cwd {
        println!("  options.cwd = {}", cwd.display());
    }
    println!("  options.stdio = {:?}", cfg.options.stdio);
    println!("  options.shell = {:?}", cfg.options.shell);
    println!();

    println!("groups ({}), run concurrently:", cfg.task.groups.len());
    for (g, group) in cfg.task.groups.iter().enumerate() {
        println!("  group {g}");
        for (s, step) in group.steps.iter().enumerate() {
            println!("    step {s} ({} unit(s) in parallel)", step.units.len());
            for unit in &step.units {
                print_unit(unit);
            }
        }
    }

    debug!("dry-run complete (no execution)");
}

fn print_unit(unit: &ScriptUnit) {
    let labelled = [("pre", &unit.pre), ("main", &unit.main), ("post", &unit.post)];
    for (label, script) in labelled {
        if let Some(script) = script {
            let how = if script.can_spawn() { "exec" } else { "shell" };
            println!("      {label:<4} [{how}] {script}");
        }
    }
}
