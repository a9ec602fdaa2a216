//! CLI command implementations
//!
//! Each command module handles argument parsing and execution for a specific CLI command.

pub mod completions;
pub mod config;
pub mod discover;
pub mod parse;
pub mod search;

// Re-export argument types for use in mod.rs
pub use completions::CompletionsArgs;
pub use config::ConfigArgs;
pub use discover::DiscoverArgs;
pub use parse::ParseArgs;
pub use search::SearchArgs;

use crate::core::backend::MemoryBackend;
use crate::core::config::Config;
use std::path::{Path, PathBuf};

/// Base URI used when a command is given none
pub const DEFAULT_BASE_URI: &str = "/search";

/// Read a query document from a file, or stdin for `-`
pub(crate) fn read_document(path: &Path) -> std::io::Result<Vec<u8>> {
    if path == Path::new("-") {
        let mut body = Vec::new();
        std::io::Read::read_to_end(&mut std::io::stdin(), &mut body)?;
        Ok(body)
    } else {
        std::fs::read(path)
    }
}

/// Load the backend from an explicit fixture or the configured one
pub(crate) fn load_backend(
    fixture: Option<&PathBuf>,
    config: &Config,
) -> Result<MemoryBackend, Box<dyn std::error::Error>> {
    match fixture.or(config.backend.fixture.as_ref()) {
        Some(path) => Ok(MemoryBackend::from_file(path)?),
        None => Err(
            "No fixture given. Pass --fixture or set DAVSEARCH_FIXTURE / backend.fixture."
                .into(),
        ),
    }
}
