// src/graph/mod.rs

//! The declarative launch graph and the result tree it produces.
//!
//! - [`script`] holds the input side: `Script`, `ScriptUnit`, `Step`,
//!   `Group` and `Task`.
//! - [`result`] holds the output side: `ScriptResult` and the nested
//!   `ResultTree` that mirrors the input graph.
//!
//! Nesting, outermost first:
//!
//! ```text
//! Task      = [Group]       groups run concurrently
//! Group     = [Step]        steps run one after another
//! Step      = [ScriptUnit]  units run concurrently
//! ScriptUnit { pre, main, post }  run one after another
//! ```

pub mod result;
pub mod script;

pub use result::{GroupResults, ResultTree, ScriptResult, SpawnFailure, StepResults, UnitResults};
pub use script::{Group, Script, ScriptUnit, Step, Task};
