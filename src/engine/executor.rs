// src/engine/executor.rs

//! Depth-first walk of the launch graph.

use std::fmt;
use std::sync::Arc;

use futures::future::try_join_all;
use tracing::{debug, info};

use crate::engine::LaunchOptions;
use crate::engine::fold::{Flow, SerialFold};
use crate::errors::{LaunchError, Result};
use crate::exec::{ProcessRegistry, ProcessRunner, ScriptRunner};
use crate::graph::{Group, GroupResults, ResultTree, ScriptUnit, Step, StepResults, Task, UnitResults};
use crate::hooks::{HookBus, HookEvent};

/// Walks a [`Task`] and launches its scripts through a [`ScriptRunner`].
///
/// Groups and the units of a step are polled concurrently on the caller's
/// task, all started before any is awaited. Steps of a group and the
/// `pre`/`main`/`post` of a unit are folded serially, gated by the bail
/// check. Bail only stops future scheduling: siblings already running in
/// the same step finish and keep their results.
pub struct TaskExecutor<R: ScriptRunner = ProcessRunner> {
    runner: R,
    hooks: Arc<dyn HookBus>,
}

impl<R: ScriptRunner> fmt::Debug for TaskExecutor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskExecutor").finish_non_exhaustive()
    }
}

impl TaskExecutor<ProcessRunner> {
    /// Executor backed by real OS processes tracked in `registry`.
    pub fn with_processes(hooks: Arc<dyn HookBus>, registry: Arc<ProcessRegistry>) -> Self {
        let runner = ProcessRunner::new(Arc::clone(&hooks), registry);
        Self::new(runner, hooks)
    }
}

impl<R: ScriptRunner> TaskExecutor<R> {
    pub fn new(runner: R, hooks: Arc<dyn HookBus>) -> Self {
        Self { runner, hooks }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Launch every group of `task` concurrently.
    ///
    /// Emits `task-start` before any group begins and `task-end` once all
    /// groups have settled. Script failures are reported inside the tree;
    /// only a hook failure makes this return `Err`.
    pub async fn launch(&self, task: &Task, options: &LaunchOptions) -> Result<ResultTree> {
        self.emit(HookEvent::TaskStart(task)).await?;
        info!(groups = task.groups.len(), bail = options.bail, "launching task");

        let groups = try_join_all(
            task.groups
                .iter()
                .enumerate()
                .map(|(index, group)| self.launch_group(index, group, options)),
        )
        .await?;
        let tree = ResultTree::new(groups);

        self.emit(HookEvent::TaskEnd(&tree)).await?;
        info!(
            results = tree.len(),
            failed = tree.failures().count(),
            "task settled"
        );
        Ok(tree)
    }

    /// Run the present scripts of `unit` in `pre`, `main`, `post` order.
    ///
    /// With bail on, a failure stops the unit and the remaining scripts
    /// contribute no results.
    pub async fn launch_serial(&self, unit: &ScriptUnit, options: &LaunchOptions) -> Result<UnitResults> {
        let (results, _flow) = self.fold_unit(unit, options).await?;
        Ok(results)
    }

    async fn fold_unit(&self, unit: &ScriptUnit, options: &LaunchOptions) -> Result<(UnitResults, Flow)> {
        let mut fold = SerialFold::with_capacity(3);

        for script in unit.scripts() {
            if !fold.should_continue() {
                debug!(script = %script, "bail: skipping remaining scripts of unit");
                break;
            }
            let result = self.runner.run(script, options).await?;
            let flow = Flow::after(options.bail, Some(&result));
            fold.push(result, flow);
        }

        Ok(fold.finish())
    }

    async fn launch_group(&self, index: usize, group: &Group, options: &LaunchOptions) -> Result<GroupResults> {
        let mut fold = SerialFold::with_capacity(group.steps.len());

        for (step_index, step) in group.steps.iter().enumerate() {
            if !fold.should_continue() {
                info!(
                    group = index,
                    step = step_index,
                    skipped = group.steps.len() - step_index,
                    "bail: previous step failed; not starting remaining steps"
                );
                break;
            }
            let (results, flow) = self.launch_step(step, options).await?;
            fold.push(results, flow);
        }

        let (steps, _flow) = fold.finish();
        Ok(steps)
    }

    /// Start every unit of `step` together and wait for all of them.
    ///
    /// The flow is decided by the last result of the last unit, in input
    /// order.
    async fn launch_step(&self, step: &Step, options: &LaunchOptions) -> Result<(StepResults, Flow)> {
        let units: StepResults = try_join_all(
            step.units
                .iter()
                .map(|unit| self.launch_serial(unit, options)),
        )
        .await?;

        let latest = units.last().and_then(|unit| unit.last());
        let flow = Flow::after(options.bail, latest);
        Ok((units, flow))
    }

    async fn emit(&self, event: HookEvent<'_>) -> Result<()> {
        let name = event.name();
        self.hooks
            .emit(event)
            .await
            .map_err(|e| LaunchError::hook(name, e))
    }
}
