// tests/launch_processes.rs

mod common;
use crate::common::builders::{full_unit, parallel_step, quiet_options, serial_group, TaskBuilder};
use crate::common::{init_tracing, millis_between, process_executor, with_timeout};

use std::error::Error;
use std::sync::Arc;

use launchgraph::graph::{Script, Task};
use launchgraph::hooks::NoopHooks;

type TestResult = Result<(), Box<dyn Error>>;

/// Parallel siblings must start within this many milliseconds of each other.
const ALLOWABLE_MS: i64 = 30;

#[tokio::test]
async fn single_main_script_runs() -> TestResult {
    init_tracing();
    let (executor, registry) = process_executor(Arc::new(NoopHooks));
    let task = TaskBuilder::new().serial(&["echo foo"]).build();

    let tree = with_timeout(executor.launch(&task, &quiet_options())).await?;

    assert_eq!(tree.groups.len(), 1);
    let result = &tree.groups[0][0][0][0];
    assert_eq!(result.script.raw(), "echo foo");
    assert_eq!(result.exit_code, 0);
    assert!(result.error.is_none());
    assert!(registry.is_empty());
    Ok(())
}

#[tokio::test]
async fn groups_start_in_parallel() -> TestResult {
    init_tracing();
    let (executor, _registry) = process_executor(Arc::new(NoopHooks));
    let task = TaskBuilder::new()
        .serial(&["echo foo && sleep 0.05"])
        .serial(&["echo bar && sleep 0.05"])
        .serial(&["echo baz && sleep 0.05"])
        .build();

    let tree = with_timeout(executor.launch(&task, &quiet_options())).await?;
    let results: Vec<_> = tree.iter().collect();

    assert_eq!(results.len(), 3);
    for (result, expected) in results.iter().zip(["echo foo", "echo bar", "echo baz"]) {
        assert_eq!(result.script.raw(), format!("{expected} && sleep 0.05"));
        assert_eq!(result.exit_code, 0);
    }
    assert!(millis_between(results[0].start, results[1].start).abs() < ALLOWABLE_MS);
    assert!(millis_between(results[1].start, results[2].start).abs() < ALLOWABLE_MS);
    Ok(())
}

#[tokio::test]
async fn steps_of_a_group_run_in_order() -> TestResult {
    init_tracing();
    let (executor, _registry) = process_executor(Arc::new(NoopHooks));
    let task = Task::new(vec![serial_group(&[
        "echo foo && sleep 0.05",
        "echo bar && sleep 0.05",
        "echo baz && sleep 0.05",
    ])]);

    let tree = with_timeout(executor.launch(&task, &quiet_options())).await?;
    let results: Vec<_> = tree.iter().collect();

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].script.raw(), "echo foo && sleep 0.05");
    assert_eq!(results[1].script.raw(), "echo bar && sleep 0.05");
    assert_eq!(results[2].script.raw(), "echo baz && sleep 0.05");
    assert!(results.iter().all(|r| r.exit_code == 0));

    assert!(results[0].end <= results[1].start);
    assert!(results[1].end <= results[2].start);
    Ok(())
}

#[tokio::test]
async fn units_of_a_step_start_together() -> TestResult {
    init_tracing();
    let (executor, _registry) = process_executor(Arc::new(NoopHooks));
    let task = TaskBuilder::new()
        .group(vec![parallel_step(&[
            "echo foo && sleep 0.05",
            "echo bar && sleep 0.2",
            "echo baz && sleep 0.05",
        ])])
        .build();

    let tree = with_timeout(executor.launch(&task, &quiet_options())).await?;
    let step = &tree.groups[0][0];

    assert_eq!(step.len(), 3);
    assert_eq!(step[1][0].script.raw(), "echo bar && sleep 0.2");
    assert!(millis_between(step[0][0].start, step[1][0].start).abs() < ALLOWABLE_MS);
    assert!(millis_between(step[1][0].start, step[2][0].start).abs() < ALLOWABLE_MS);
    // The quick sibling does not wait for the slow one.
    assert!(step[0][0].end < step[1][0].end);
    Ok(())
}

#[tokio::test]
async fn pre_main_post_run_in_order() -> TestResult {
    init_tracing();
    let (executor, _registry) = process_executor(Arc::new(NoopHooks));
    let unit = full_unit(
        "echo foo && sleep 0.05",
        "echo bar && sleep 0.05",
        "echo baz && sleep 0.05",
    );

    let results = with_timeout(executor.launch_serial(&unit, &quiet_options())).await?;

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].script.raw(), "echo foo && sleep 0.05");
    assert_eq!(results[1].script.raw(), "echo bar && sleep 0.05");
    assert_eq!(results[2].script.raw(), "echo baz && sleep 0.05");
    assert!(results.iter().all(|r| r.exit_code == 0));
    assert!(results[0].end <= results[1].start);
    assert!(results[1].end <= results[2].start);
    Ok(())
}

#[tokio::test]
async fn result_tree_mirrors_the_graph_when_everything_succeeds() -> TestResult {
    init_tracing();
    let (executor, _registry) = process_executor(Arc::new(NoopHooks));
    let task = TaskBuilder::new()
        .group(vec![
            parallel_step(&["true", "true"]),
            parallel_step(&["true"]),
        ])
        .group(vec![launchgraph::graph::Step::new(vec![full_unit("true", "true", "true")])])
        .build();

    let tree = with_timeout(executor.launch(&task, &quiet_options())).await?;

    assert_eq!(tree.groups.len(), task.groups.len());
    for (group_results, group) in tree.groups.iter().zip(&task.groups) {
        assert_eq!(group_results.len(), group.steps.len());
        for (step_results, step) in group_results.iter().zip(&group.steps) {
            assert_eq!(step_results.len(), step.units.len());
            for (unit_results, unit) in step_results.iter().zip(&step.units) {
                let expected: Vec<&Script> = unit.scripts().collect();
                let actual: Vec<&Script> = unit_results.iter().map(|r| &r.script).collect();
                assert_eq!(actual, expected);
            }
        }
    }
    assert!(tree.all_succeeded());
    assert_eq!(tree.len(), task.scripts().count());
    Ok(())
}
