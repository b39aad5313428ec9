// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::default_config_path;
use crate::types::{ShellCapability, StdioMode};

/// Command-line arguments for `launchgraph`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "launchgraph",
    version,
    about = "Run nested parallel/serial command graphs with fail-fast bail.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the launch file (TOML, or a nested-array `.json` graph).
    ///
    /// Default: `Launch.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value_os_t = default_config_path())]
    pub config: PathBuf,

    /// Keep scheduling after failures (turns bail off).
    #[arg(long)]
    pub force: bool,

    /// Override how shell text is launched (`inline` or `piped`).
    #[arg(long, value_name = "MODE")]
    pub shell: Option<ShellCapability>,

    /// Override what happens to child output (`inherit` or `ignore`).
    #[arg(long, value_name = "MODE")]
    pub stdio: Option<StdioMode>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `LAUNCHGRAPH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the graph, but don't run anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Print the result tree as JSON on stdout when done.
    #[arg(long)]
    pub json: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
