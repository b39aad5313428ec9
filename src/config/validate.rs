// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::engine::LaunchOptions;
use crate::errors::{LaunchError, Result};
use crate::graph::{Group, Step, Task};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = LaunchError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let task = Task::new(
            raw.groups
                .into_iter()
                .map(|group| Group::new(group.steps.into_iter().map(|step| Step::new(step.units)).collect()))
                .collect(),
        );
        let options = LaunchOptions::from(raw.options);
        validate_config(&options, &task)?;
        Ok(ConfigFile::new_unchecked(options, task))
    }
}

/// Check a graph and its options before anything is launched.
pub fn validate_config(options: &LaunchOptions, task: &Task) -> Result<()> {
    validate_options(options)?;
    validate_task(task)?;
    Ok(())
}

fn validate_options(options: &LaunchOptions) -> Result<()> {
    if let Some(cwd) = &options.cwd {
        if !cwd.is_dir() {
            return Err(LaunchError::ConfigError(format!(
                "[options].cwd {:?} is not a directory",
                cwd
            )));
        }
    }
    Ok(())
}

/// Structural checks on the graph.
///
/// - at least one group,
/// - every group has a step and every step a unit,
/// - every unit has at least one of `pre`, `main`, `post`,
/// - a directly spawnable script carries a non-empty argument vector.
pub fn validate_task(task: &Task) -> Result<()> {
    if task.groups.is_empty() {
        return Err(LaunchError::ConfigError(
            "launch graph must contain at least one [[group]]".to_string(),
        ));
    }

    for (g, group) in task.groups.iter().enumerate() {
        if group.steps.is_empty() {
            return Err(LaunchError::ConfigError(format!("group {g} has no steps")));
        }
        for (s, step) in group.steps.iter().enumerate() {
            if step.units.is_empty() {
                return Err(LaunchError::ConfigError(format!(
                    "group {g} step {s} has no units"
                )));
            }
            for (u, unit) in step.units.iter().enumerate() {
                if unit.is_empty() {
                    return Err(LaunchError::ConfigError(format!(
                        "group {g} step {s} unit {u} needs at least one of pre, main, post"
                    )));
                }
                for script in unit.scripts() {
                    let argv_empty = script.parsed().is_none_or(|argv| argv.is_empty());
                    if script.can_spawn() && argv_empty {
                        return Err(LaunchError::ConfigError(format!(
                            "group {g} step {s} unit {u}: can_spawn requires a non-empty `parsed`"
                        )));
                    }
                    if !script.can_spawn() && script.raw().trim().is_empty() {
                        return Err(LaunchError::ConfigError(format!(
                            "group {g} step {s} unit {u}: empty script"
                        )));
                    }
                }
            }
        }
    }
    Ok(())
}
