// src/graph/result.rs

//! Output side of the launch graph.

use std::io;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::graph::Script;

/// Why a process never ran (or could not be waited on).
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("spawn failed: {message}")]
pub struct SpawnFailure {
    /// Program the runner tried to start.
    pub program: String,
    /// `std::io::ErrorKind` name, e.g. `NotFound`.
    pub kind: String,
    /// Always starts with `program`, so it stands on its own in reports.
    pub message: String,
}

impl SpawnFailure {
    pub fn new(program: impl Into<String>, message: impl AsRef<str>) -> Self {
        Self::with_kind(program.into(), io::ErrorKind::Other, message.as_ref())
    }

    pub fn from_io(program: impl Into<String>, err: &io::Error) -> Self {
        Self::with_kind(program.into(), err.kind(), &err.to_string())
    }

    fn with_kind(program: String, kind: io::ErrorKind, detail: &str) -> Self {
        Self {
            message: format!("{program}: {detail}"),
            kind: format!("{kind:?}"),
            program,
        }
    }
}

/// Outcome of one launched script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptResult {
    pub script: Script,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// `0` is success. Signal termination is reported as `1`.
    pub exit_code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<SpawnFailure>,
}

impl ScriptResult {
    /// Result for a script whose process could not be created.
    pub fn spawn_failed(script: Script, start: DateTime<Utc>, failure: SpawnFailure) -> Self {
        Self {
            script,
            start,
            end: Utc::now(),
            exit_code: 1,
            error: Some(failure),
        }
    }

    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }

    pub fn duration(&self) -> Duration {
        (self.end - self.start).to_std().unwrap_or_default()
    }
}

/// Results of one unit, one entry per sub-script actually launched.
pub type UnitResults = Vec<ScriptResult>;
/// Results of one step, one entry per unit in input order.
pub type StepResults = Vec<UnitResults>;
/// Results of one group, one entry per step that was started.
pub type GroupResults = Vec<StepResults>;

/// Results shaped like the input `Task`.
///
/// Steps and sub-scripts skipped by bail contribute no entries, so callers
/// must not assume the lengths match the input graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResultTree {
    pub groups: Vec<GroupResults>,
}

impl ResultTree {
    pub fn new(groups: Vec<GroupResults>) -> Self {
        Self { groups }
    }

    /// Every result, depth first in graph order.
    pub fn iter(&self) -> impl Iterator<Item = &ScriptResult> {
        self.groups.iter().flatten().flatten().flatten()
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    pub fn all_succeeded(&self) -> bool {
        self.iter().all(ScriptResult::is_success)
    }

    pub fn failures(&self) -> impl Iterator<Item = &ScriptResult> {
        self.iter().filter(|result| !result.is_success())
    }
}
