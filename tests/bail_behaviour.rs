// tests/bail_behaviour.rs

mod common;
use crate::common::builders::{
    full_unit, main_unit, parallel_step, quiet_options, quiet_options_bail, TaskBuilder,
};
use crate::common::{init_tracing, process_executor, with_timeout};

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use launchgraph::engine::TaskExecutor;
use launchgraph::graph::Step;
use launchgraph::hooks::NoopHooks;
use launchgraph_test_utils::fake_runner::FakeRunner;

type TestResult = Result<(), Box<dyn Error>>;

fn executor(runner: FakeRunner) -> TaskExecutor<FakeRunner> {
    TaskExecutor::new(runner, Arc::new(NoopHooks))
}

#[tokio::test]
async fn failing_step_stops_the_rest_of_its_group() -> TestResult {
    init_tracing();
    let runner = FakeRunner::new().exit("b", 1);
    let launched = runner.launched_handle();
    let executor = executor(runner);
    let task = TaskBuilder::new().serial(&["a", "b", "c", "d"]).build();

    let tree = with_timeout(executor.launch(&task, &quiet_options_bail(true))).await?;

    assert_eq!(tree.groups[0].len(), 2);
    let raws: Vec<&str> = tree.iter().map(|r| r.script.raw()).collect();
    assert_eq!(raws, vec!["a", "b"]);
    assert_eq!(*launched.lock(), vec!["a".to_string(), "b".to_string()]);
    Ok(())
}

#[tokio::test]
async fn without_bail_every_step_runs() -> TestResult {
    init_tracing();
    let executor = executor(FakeRunner::new().exit("b", 1));
    let task = TaskBuilder::new().serial(&["a", "b", "c"]).build();

    let tree = with_timeout(executor.launch(&task, &quiet_options_bail(false))).await?;

    let codes: Vec<i32> = tree.iter().map(|r| r.exit_code).collect();
    assert_eq!(codes, vec![0, 1, 0]);
    assert_eq!(tree.failures().count(), 1);
    Ok(())
}

#[tokio::test]
async fn in_flight_siblings_finish_and_keep_their_results() -> TestResult {
    init_tracing();
    let runner = FakeRunner::new()
        .delay("slow", Duration::from_millis(100))
        .exit("fail", 1);
    let executor = executor(runner);
    let task = TaskBuilder::new()
        .group(vec![parallel_step(&["slow", "fail"]), parallel_step(&["next"])])
        .build();

    let tree = with_timeout(executor.launch(&task, &quiet_options_bail(true))).await?;

    let step = &tree.groups[0][0];
    assert_eq!(step[0][0].script.raw(), "slow");
    assert_eq!(step[0][0].exit_code, 0);
    assert!(step[0][0].end > step[1][0].end, "slow sibling outlived the failure");
    assert_eq!(step[1][0].exit_code, 1);
    // The failing unit is last in the step, so the next step never starts.
    assert_eq!(tree.groups[0].len(), 1);
    Ok(())
}

#[tokio::test]
async fn step_flow_follows_the_last_unit_in_input_order() -> TestResult {
    init_tracing();
    let executor = executor(FakeRunner::new().exit("fail", 1));
    let task = TaskBuilder::new()
        .group(vec![parallel_step(&["fail", "ok"]), parallel_step(&["next"])])
        .build();

    let tree = with_timeout(executor.launch(&task, &quiet_options_bail(true))).await?;

    let raws: Vec<&str> = tree.iter().map(|r| r.script.raw()).collect();
    assert_eq!(raws, vec!["fail", "ok", "next"]);
    Ok(())
}

#[tokio::test]
async fn failing_pre_skips_main_and_post() -> TestResult {
    init_tracing();
    let runner = FakeRunner::new().exit("pre", 2);
    let launched = runner.launched_handle();
    let executor = executor(runner);
    let unit = full_unit("pre", "main", "post");

    let results = with_timeout(executor.launch_serial(&unit, &quiet_options_bail(true))).await?;

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].exit_code, 2);
    assert_eq!(*launched.lock(), vec!["pre".to_string()]);

    let results = with_timeout(executor.launch_serial(&unit, &quiet_options_bail(false))).await?;
    assert_eq!(results.len(), 3);
    Ok(())
}

#[tokio::test]
async fn failing_post_stops_the_following_step() -> TestResult {
    init_tracing();
    let executor = executor(FakeRunner::new().exit("post", 1));
    let task = TaskBuilder::new()
        .group(vec![
            Step::new(vec![full_unit("pre", "main", "post")]),
            Step::new(vec![main_unit("after")]),
        ])
        .build();

    let tree = with_timeout(executor.launch(&task, &quiet_options_bail(true))).await?;

    assert_eq!(tree.groups[0].len(), 1);
    assert_eq!(tree.groups[0][0][0].len(), 3);
    Ok(())
}

#[tokio::test]
async fn spawn_failures_bail_like_any_other_failure() -> TestResult {
    init_tracing();
    let executor = executor(FakeRunner::new().spawn_fails("missing"));
    let task = TaskBuilder::new().serial(&["missing", "after"]).build();

    let tree = with_timeout(executor.launch(&task, &quiet_options_bail(true))).await?;

    assert_eq!(tree.len(), 1);
    let result = tree.iter().next().expect("one result");
    assert_eq!(result.exit_code, 1);
    assert!(result.error.is_some());
    Ok(())
}

#[tokio::test]
async fn bail_in_one_group_leaves_other_groups_alone() -> TestResult {
    init_tracing();
    let executor = executor(FakeRunner::new().exit("x1", 1));
    let task = TaskBuilder::new()
        .serial(&["x1", "x2"])
        .serial(&["y1", "y2", "y3"])
        .build();

    let tree = with_timeout(executor.launch(&task, &quiet_options_bail(true))).await?;

    assert_eq!(tree.groups[0].len(), 1);
    assert_eq!(tree.groups[1].len(), 3);
    Ok(())
}

#[tokio::test]
async fn real_failing_process_bails_the_chain() -> TestResult {
    init_tracing();
    let (executor, _registry) = process_executor(Arc::new(NoopHooks));
    let task = TaskBuilder::new()
        .serial(&["echo foo", "exit 1", "echo never"])
        .build();

    let tree = with_timeout(executor.launch(&task, &quiet_options())).await?;

    let codes: Vec<i32> = tree.iter().map(|r| r.exit_code).collect();
    assert_eq!(codes, vec![0, 1]);
    Ok(())
}
