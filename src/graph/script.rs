// src/graph/script.rs

//! Input side of the launch graph.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One command to run.
///
/// When `can_spawn` is true, `parsed` is the authoritative program and
/// argument vector and no shell is involved. Otherwise `raw` is handed to a
/// shell. Deciding which form a command takes is up to whoever builds the
/// graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ScriptSpec")]
pub struct Script {
    raw: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    parsed: Option<Vec<String>>,
    can_spawn: bool,
}

impl Script {
    /// A script interpreted by the shell.
    pub fn shell(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            parsed: None,
            can_spawn: false,
        }
    }

    /// A script spawned directly from an argument vector.
    pub fn argv<I, S>(parsed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let parsed: Vec<String> = parsed.into_iter().map(Into::into).collect();
        Self {
            raw: parsed.join(" "),
            parsed: Some(parsed),
            can_spawn: true,
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn parsed(&self) -> Option<&[String]> {
        self.parsed.as_deref()
    }

    pub fn can_spawn(&self) -> bool {
        self.can_spawn
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Accepted spellings of a script in config and task files:
///
/// ```toml
/// main = "echo hello && sleep 1"
/// main = { parsed = ["cargo", "build"], can_spawn = true }
/// ```
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ScriptSpec {
    Raw(String),
    Full {
        #[serde(default)]
        raw: Option<String>,
        #[serde(default)]
        parsed: Option<Vec<String>>,
        #[serde(default, alias = "canSpawn")]
        can_spawn: bool,
    },
}

impl From<ScriptSpec> for Script {
    fn from(spec: ScriptSpec) -> Self {
        match spec {
            ScriptSpec::Raw(raw) => Script::shell(raw),
            ScriptSpec::Full {
                raw,
                parsed,
                can_spawn,
            } => {
                let raw = raw
                    .or_else(|| parsed.as_ref().map(|argv| argv.join(" ")))
                    .unwrap_or_default();
                Script {
                    raw,
                    parsed,
                    can_spawn,
                }
            }
        }
    }
}

/// A `pre` / `main` / `post` triad, run strictly in that order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptUnit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre: Option<Script>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main: Option<Script>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<Script>,
}

impl ScriptUnit {
    pub fn main(script: Script) -> Self {
        Self {
            main: Some(script),
            ..Self::default()
        }
    }

    pub fn with_pre(mut self, script: Script) -> Self {
        self.pre = Some(script);
        self
    }

    pub fn with_post(mut self, script: Script) -> Self {
        self.post = Some(script);
        self
    }

    /// Present scripts in execution order.
    pub fn scripts(&self) -> impl Iterator<Item = &Script> {
        [&self.pre, &self.main, &self.post]
            .into_iter()
            .filter_map(Option::as_ref)
    }

    pub fn is_empty(&self) -> bool {
        self.pre.is_none() && self.main.is_none() && self.post.is_none()
    }
}

/// Units launched concurrently with each other.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Step {
    pub units: Vec<ScriptUnit>,
}

impl Step {
    pub fn new(units: Vec<ScriptUnit>) -> Self {
        Self { units }
    }
}

/// Steps executed strictly one after another.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Group {
    pub steps: Vec<Step>,
}

impl Group {
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }
}

/// Top of the graph: groups launched concurrently with each other.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Task {
    pub groups: Vec<Group>,
}

impl Task {
    pub fn new(groups: Vec<Group>) -> Self {
        Self { groups }
    }

    /// Every script in the graph, depth first.
    pub fn scripts(&self) -> impl Iterator<Item = &Script> {
        self.groups
            .iter()
            .flat_map(|group| group.steps.iter())
            .flat_map(|step| step.units.iter())
            .flat_map(ScriptUnit::scripts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_scripts_follow_pre_main_post_order() {
        let unit = ScriptUnit::main(Script::shell("main"))
            .with_post(Script::shell("post"))
            .with_pre(Script::shell("pre"));

        let order: Vec<&str> = unit.scripts().map(Script::raw).collect();
        assert_eq!(order, vec!["pre", "main", "post"]);
    }

    #[test]
    fn argv_script_keeps_a_readable_raw_form() {
        let script = Script::argv(["exit", "1"]);
        assert!(script.can_spawn());
        assert_eq!(script.raw(), "exit 1");
        assert_eq!(script.parsed(), Some(&["exit".to_string(), "1".to_string()][..]));
    }

    #[test]
    fn task_reads_the_nested_array_form() {
        let json = r#"[[[
            { "main": { "raw": "echo foo" } },
            { "main": "echo bar", "post": { "parsed": ["true"], "canSpawn": true } }
        ]]]"#;

        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.groups.len(), 1);
        assert_eq!(task.groups[0].steps[0].units.len(), 2);

        let post = task.groups[0].steps[0].units[1].post.as_ref().unwrap();
        assert!(post.can_spawn());
        assert_eq!(post.raw(), "true");

        let raws: Vec<&str> = task.scripts().map(Script::raw).collect();
        assert_eq!(raws, vec!["echo foo", "echo bar", "true"]);
    }
}
