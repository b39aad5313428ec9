//! Shared helpers for `launchgraph` tests: graph builders, a scripted
//! runner, a recording hook subscriber, and tracing/timeout plumbing.

pub mod builders;
pub mod fake_runner;
pub mod recording_hooks;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use launchgraph::logging::LOG_ENV;
use tracing_subscriber::{EnvFilter, fmt};

/// Upper bound for any single launch under test. Real processes in the
/// suite sleep for at most a few hundred milliseconds unless killed.
pub const LAUNCH_DEADLINE: Duration = Duration::from_secs(5);

static INIT: Once = Once::new();

/// Install a test-captured subscriber once per test binary.
///
/// Reads the same `LAUNCHGRAPH_LOG` directives as the binary, falling back
/// to `RUST_LOG` and then `launchgraph=info`. Output is only shown for
/// failing tests unless run with `--nocapture`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new("launchgraph=info"));

        let _ = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .try_init();
    });
}

/// Await `f`, failing the test if the launch outlives [`LAUNCH_DEADLINE`].
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: Future<Output = T>,
{
    match tokio::time::timeout(LAUNCH_DEADLINE, f).await {
        Ok(out) => out,
        Err(_) => panic!("launch did not settle within {LAUNCH_DEADLINE:?}"),
    }
}
