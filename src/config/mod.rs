// src/config/mod.rs

//! Launch file loading and validation.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a launch file from disk, TOML or nested-array JSON (`loader.rs`).
//! - Validate the graph before anything runs (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, load_task_json};
pub use model::{ConfigFile, OptionsSection, RawConfigFile, RawGroup, RawStep};
pub use validate::{validate_config, validate_task};
