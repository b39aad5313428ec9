// src/exec/spawn.rs

//! Choosing how a script becomes an OS process.

use std::process::Stdio;

use tokio::process::Command;

use crate::engine::LaunchOptions;
use crate::graph::{Script, SpawnFailure};
use crate::types::{ShellCapability, StdioMode};

/// The three ways a script can be launched, in priority order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpawnStrategy {
    /// `parsed[0]` with `parsed[1..]`, no shell.
    Direct { program: String, args: Vec<String> },
    /// Platform shell given the raw text as an inline command.
    InlineShell { raw: String },
    /// Bare platform shell fed the raw text on stdin.
    PipedShell { raw: String },
}

impl SpawnStrategy {
    /// Pick the strategy for `script` under the startup shell capability.
    pub fn select(script: &Script, shell: ShellCapability) -> Result<Self, SpawnFailure> {
        if script.can_spawn() {
            let mut argv = script.parsed().unwrap_or_default().iter().cloned();
            let program = argv.next().ok_or_else(|| {
                SpawnFailure::new(script.raw(), "directly spawnable script has an empty argument vector")
            })?;
            return Ok(SpawnStrategy::Direct {
                program,
                args: argv.collect(),
            });
        }

        let raw = script.raw().to_string();
        Ok(match shell {
            ShellCapability::Inline => SpawnStrategy::InlineShell { raw },
            ShellCapability::Piped => SpawnStrategy::PipedShell { raw },
        })
    }

    /// Program name reported in spawn failures.
    pub fn program(&self) -> &str {
        match self {
            SpawnStrategy::Direct { program, .. } => program,
            SpawnStrategy::InlineShell { .. } | SpawnStrategy::PipedShell { .. } => shell_program(),
        }
    }

    /// Text to write on the child's stdin, for the piped strategy only.
    pub fn stdin_script(&self) -> Option<&str> {
        match self {
            SpawnStrategy::PipedShell { raw } => Some(raw),
            _ => None,
        }
    }

    /// Build the command, ready to spawn.
    ///
    /// With the piped strategy and `StdioMode::Inherit`, stdout and stderr
    /// are piped so the runner can bridge them to the parent's streams;
    /// stdin always carries the script text.
    pub fn command(&self, options: &LaunchOptions) -> Command {
        let mut cmd = match self {
            SpawnStrategy::Direct { program, args } => {
                let mut c = Command::new(program);
                c.args(args);
                c
            }
            SpawnStrategy::InlineShell { raw } => {
                let mut c = Command::new(shell_program());
                c.arg(inline_flag()).arg(raw);
                c
            }
            SpawnStrategy::PipedShell { .. } => Command::new(shell_program()),
        };

        if let Some(cwd) = &options.cwd {
            cmd.current_dir(cwd);
        }

        match (self, options.stdio) {
            (SpawnStrategy::PipedShell { .. }, StdioMode::Inherit) => {
                cmd.stdin(Stdio::piped())
                    .stdout(Stdio::piped())
                    .stderr(Stdio::piped());
            }
            (SpawnStrategy::PipedShell { .. }, StdioMode::Ignore) => {
                cmd.stdin(Stdio::piped())
                    .stdout(Stdio::null())
                    .stderr(Stdio::null());
            }
            (_, StdioMode::Inherit) => {
                cmd.stdin(Stdio::inherit())
                    .stdout(Stdio::inherit())
                    .stderr(Stdio::inherit());
            }
            (_, StdioMode::Ignore) => {
                cmd.stdin(Stdio::null())
                    .stdout(Stdio::null())
                    .stderr(Stdio::null());
            }
        }

        cmd.kill_on_drop(true);
        cmd
    }
}

fn shell_program() -> &'static str {
    if cfg!(windows) { "cmd" } else { "sh" }
}

fn inline_flag() -> &'static str {
    if cfg!(windows) { "/C" } else { "-c" }
}
