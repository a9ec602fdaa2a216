//! XDG Base Directory support
//!
//! Resolves where davsearch looks for its config file and default
//! backend fixture on Linux/Unix systems.

use std::env;
use std::path::PathBuf;

const APP_DIR: &str = "davsearch";

/// XDG directories for davsearch
#[derive(Debug, Clone)]
pub struct XdgDirs {
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
}

impl XdgDirs {
    /// Resolve directories.
    ///
    /// Priority order (highest to lowest):
    /// 1. Explicit DAVSEARCH_* env vars
    /// 2. XDG_* environment variables
    /// 3. XDG defaults (~/.config, ~/.local/share)
    pub fn new() -> Self {
        Self {
            config_dir: resolve("DAVSEARCH_CONFIG_DIR", "XDG_CONFIG_HOME", &[".config"]),
            data_dir: resolve("DAVSEARCH_DATA_DIR", "XDG_DATA_HOME", &[".local", "share"]),
        }
    }

    /// Get config file path
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    /// Fixture loaded when no backend fixture is configured
    pub fn fixture_file(&self) -> PathBuf {
        self.data_dir.join("fixture.json")
    }

    /// Log the resolved XDG paths
    pub fn log_paths(&self) {
        tracing::info!("XDG directories resolved:");
        tracing::info!("  Config: {:?}", self.config_dir);
        tracing::info!("  Data: {:?}", self.data_dir);
        tracing::info!("  Config file: {:?}", self.config_file());
    }
}

impl Default for XdgDirs {
    fn default() -> Self {
        Self::new()
    }
}

fn resolve(app_var: &str, xdg_var: &str, default_segments: &[&str]) -> PathBuf {
    if let Ok(dir) = env::var(app_var) {
        return PathBuf::from(dir);
    }

    if let Ok(xdg) = env::var(xdg_var) {
        return PathBuf::from(xdg).join(APP_DIR);
    }

    let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    for segment in default_segments {
        path.push(segment);
    }
    path.join(APP_DIR)
}
