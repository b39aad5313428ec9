// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::config::validate::validate_config;
use crate::engine::LaunchOptions;
use crate::errors::Result;
use crate::graph::Task;

/// Load a TOML launch file and return the raw, unvalidated model.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a task graph written in the nested-array JSON form
/// (`[[[{"main": "echo foo"}]]]`) with default options.
pub fn load_task_json(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let contents = fs::read_to_string(path.as_ref())?;
    let task: Task = serde_json::from_str(&contents)?;

    let options = LaunchOptions::default();
    validate_config(&options, &task)?;
    Ok(ConfigFile::new_unchecked(options, task))
}

/// Load a launch file and validate it.
///
/// `.json` files are read as a bare task graph; anything else as TOML.
/// A relative `[options].cwd` is resolved against the file's directory.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let path = path.as_ref();

    if path.extension().is_some_and(|ext| ext == "json") {
        return load_task_json(path);
    }

    let mut raw_config = load_from_path(path)?;
    if let Some(cwd) = raw_config.options.cwd.take() {
        raw_config.options.cwd = Some(resolve_relative(path, cwd));
    }
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Default launch file: `Launch.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Launch.toml")
}

fn resolve_relative(config_path: &Path, cwd: PathBuf) -> PathBuf {
    if cwd.is_absolute() {
        return cwd;
    }
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(cwd),
        _ => cwd,
    }
}
