#![allow(dead_code)]

use launchgraph::engine::LaunchOptions;
use launchgraph::graph::{Group, Script, ScriptUnit, Step, Task};
use launchgraph::types::StdioMode;

/// Shell script shorthand.
pub fn sh(raw: &str) -> Script {
    Script::shell(raw)
}

/// Unit with only a `main` shell script.
pub fn main_unit(raw: &str) -> ScriptUnit {
    ScriptUnit::main(sh(raw))
}

/// Unit with `pre`, `main` and `post` shell scripts.
pub fn full_unit(pre: &str, main: &str, post: &str) -> ScriptUnit {
    ScriptUnit::main(sh(main)).with_pre(sh(pre)).with_post(sh(post))
}

/// One step whose units are the given `main` scripts, run in parallel.
pub fn parallel_step(raws: &[&str]) -> Step {
    Step::new(raws.iter().map(|raw| main_unit(raw)).collect())
}

/// A group running each script in its own step, one after another.
pub fn serial_group(raws: &[&str]) -> Group {
    Group::new(raws.iter().map(|raw| parallel_step(&[*raw])).collect())
}

/// Builder for `Task` to simplify test setup.
#[derive(Debug, Default)]
pub struct TaskBuilder {
    groups: Vec<Group>,
}

impl TaskBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn group(mut self, steps: Vec<Step>) -> Self {
        self.groups.push(Group::new(steps));
        self
    }

    pub fn serial(mut self, raws: &[&str]) -> Self {
        self.groups.push(serial_group(raws));
        self
    }

    pub fn build(self) -> Task {
        Task::new(self.groups)
    }
}

/// Default options with child output discarded.
pub fn quiet_options() -> LaunchOptions {
    LaunchOptions {
        stdio: StdioMode::Ignore,
        ..LaunchOptions::default()
    }
}

/// Like [`quiet_options`] with bail set as given.
pub fn quiet_options_bail(bail: bool) -> LaunchOptions {
    LaunchOptions {
        bail,
        ..quiet_options()
    }
}
