use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// What happens to a spawned process's standard streams.
///
/// - `Inherit`: the child shares the parent's stdin/stdout/stderr (default).
/// - `Ignore`: the child's streams are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StdioMode {
    Inherit,
    Ignore,
}

impl Default for StdioMode {
    fn default() -> Self {
        StdioMode::Inherit
    }
}

impl FromStr for StdioMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "inherit" => Ok(StdioMode::Inherit),
            "ignore" => Ok(StdioMode::Ignore),
            other => Err(format!(
                "invalid stdio mode: {other} (expected \"inherit\" or \"ignore\")"
            )),
        }
    }
}

/// How shell text (scripts that cannot be spawned directly) is launched.
///
/// This is decided once at startup and carried in the launch options; the
/// runner never inspects the environment to re-derive it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShellCapability {
    /// Pass the text to the shell as an inline command (`sh -c`, `cmd /C`).
    Inline,
    /// Start a bare shell and feed the text on its stdin.
    Piped,
}

impl Default for ShellCapability {
    fn default() -> Self {
        ShellCapability::Inline
    }
}

impl FromStr for ShellCapability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "inline" => Ok(ShellCapability::Inline),
            "piped" => Ok(ShellCapability::Piped),
            other => Err(format!(
                "invalid shell mode: {other} (expected \"inline\" or \"piped\")"
            )),
        }
    }
}
