#![allow(dead_code)]

use std::sync::Arc;

use launchgraph::engine::TaskExecutor;
use launchgraph::exec::ProcessRegistry;
use launchgraph::hooks::HookBus;

pub use launchgraph_test_utils::builders;
pub use launchgraph_test_utils::init_tracing;
pub use launchgraph_test_utils::with_timeout;

/// Real-process executor plus the registry it reports to.
pub fn process_executor(hooks: Arc<dyn HookBus>) -> (TaskExecutor, Arc<ProcessRegistry>) {
    let registry = Arc::new(ProcessRegistry::new());
    let executor = TaskExecutor::with_processes(hooks, Arc::clone(&registry));
    (executor, registry)
}

/// Milliseconds between two timestamps (may be negative).
pub fn millis_between(a: chrono::DateTime<chrono::Utc>, b: chrono::DateTime<chrono::Utc>) -> i64 {
    (b - a).num_milliseconds()
}
