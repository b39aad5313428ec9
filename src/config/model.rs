// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

use crate::engine::LaunchOptions;
use crate::graph::{ScriptUnit, Task};
use crate::types::{ShellCapability, StdioMode};

/// Launch file as read from TOML, before validation.
///
/// ```toml
/// [options]
/// bail = true
/// stdio = "inherit"
///
/// [[group]]
/// [[group.step]]
/// [[group.step.unit]]
/// pre = "echo prepare"
/// main = "cargo build"
///
/// [[group.step]]
/// [[group.step.unit]]
/// main = { parsed = ["cargo", "test"], can_spawn = true }
/// ```
///
/// Every `[[group]]` runs concurrently with the others; its steps run in
/// order; the units of a step run concurrently.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub options: OptionsSection,

    #[serde(default, rename = "group")]
    pub groups: Vec<RawGroup>,
}

/// `[options]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct OptionsSection {
    /// Stop a serial chain after a failure. Defaults to `true`.
    #[serde(default = "default_bail")]
    pub bail: bool,

    /// Working directory for every spawned process.
    ///
    /// Relative paths are resolved against the launch file's directory.
    #[serde(default)]
    pub cwd: Option<PathBuf>,

    #[serde(default)]
    pub stdio: StdioMode,

    #[serde(default)]
    pub shell: ShellCapability,
}

fn default_bail() -> bool {
    true
}

impl Default for OptionsSection {
    fn default() -> Self {
        Self {
            bail: default_bail(),
            cwd: None,
            stdio: StdioMode::default(),
            shell: ShellCapability::default(),
        }
    }
}

impl From<OptionsSection> for LaunchOptions {
    fn from(section: OptionsSection) -> Self {
        LaunchOptions {
            bail: section.bail,
            cwd: section.cwd,
            stdio: section.stdio,
            shell: section.shell,
        }
    }
}

/// `[[group]]` table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawGroup {
    #[serde(default, rename = "step")]
    pub steps: Vec<RawStep>,
}

/// `[[group.step]]` table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawStep {
    #[serde(default, rename = "unit")]
    pub units: Vec<ScriptUnit>,
}

/// Validated launch configuration: options plus the graph to run.
///
/// Construct through `TryFrom<RawConfigFile>` or the loader so the graph is
/// known to be well-formed.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub options: LaunchOptions,
    pub task: Task,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(options: LaunchOptions, task: Task) -> Self {
        Self { options, task }
    }
}
