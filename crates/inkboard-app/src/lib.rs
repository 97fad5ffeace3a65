//! Inkboard application shell
//!
//! Drives a headless [`inkboard_core::Canvas`] from line-oriented scripts.

pub mod error;
pub mod script;
pub mod session;

pub use error::ScriptError;
pub use script::{ScriptCommand, parse_line};
pub use session::Session;

use inkboard_core::EditorConfig;
use std::path::Path;

/// Read and validate an editor config file.
pub fn load_config(path: &Path) -> Result<EditorConfig, ScriptError> {
    let json = std::fs::read_to_string(path)?;
    let config = EditorConfig::from_json(&json)?;
    log::info!("Loaded config from {}", path.display());
    Ok(config)
}
