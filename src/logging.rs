// src/logging.rs

//! Logging setup for `launchgraph` using `tracing` + `tracing-subscriber`.
//!
//! The filter comes from, in order:
//! 1. `--log-level` on the command line, applied to every target;
//! 2. `LAUNCHGRAPH_LOG`, which takes full `EnvFilter` directives such as
//!    `warn,launchgraph::exec=debug`;
//! 3. `info`.

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::LogLevel;

/// Environment variable holding filter directives.
pub const LOG_ENV: &str = "LAUNCHGRAPH_LOG";

const DEFAULT_DIRECTIVE: &str = "info";

/// Install the global subscriber. Call once, before the launch starts.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let filter = build_filter(cli_level, std::env::var(LOG_ENV).ok().as_deref())?;

    // Scripts own stdout (and `--json` prints there), so logs go to stderr.
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("installing the log subscriber")
}

fn build_filter(cli_level: Option<LogLevel>, env: Option<&str>) -> Result<EnvFilter> {
    let directives = match (cli_level, env) {
        (Some(level), _) => directive(level),
        (None, Some(env)) if !env.trim().is_empty() => env.trim(),
        _ => DEFAULT_DIRECTIVE,
    };
    EnvFilter::try_new(directives).with_context(|| format!("invalid {LOG_ENV} directives `{directives}`"))
}

fn directive(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_level_wins_over_the_environment() {
        let filter = build_filter(Some(LogLevel::Debug), Some("error")).unwrap();
        assert_eq!(filter.to_string(), "debug");
    }

    #[test]
    fn env_directives_are_taken_verbatim() {
        let filter = build_filter(None, Some(" warn,launchgraph::exec=trace ")).unwrap();
        let rendered = filter.to_string();
        assert!(rendered.contains("launchgraph::exec=trace"));
        assert!(rendered.contains("warn"));
    }

    #[test]
    fn blank_or_missing_env_falls_back_to_info() {
        assert_eq!(build_filter(None, None).unwrap().to_string(), "info");
        assert_eq!(build_filter(None, Some("  ")).unwrap().to_string(), "info");
    }

    #[test]
    fn malformed_env_is_reported() {
        let err = build_filter(None, Some("launchgraph=loudest")).unwrap_err();
        assert!(err.to_string().contains(LOG_ENV));
    }
}
