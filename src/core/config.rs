//! Configuration management for the davsearch service.
//!
//! This module handles loading configuration from TOML files and
//! environment variables, with sensible defaults for all settings.

use crate::core::error::{DavSearchError, Result};
use crate::core::xdg::XdgDirs;
use crate::core::xml::MAX_DEPTH;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Highest accepted `limits.max_nesting_depth`; parsing recurses once
/// per level
pub const NESTING_DEPTH_CEILING: usize = 4096;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Public base URI used to resolve relative scope hrefs. When unset
    /// the request path is used.
    #[serde(default)]
    pub base_uri: Option<String>,
}

/// Search backend configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    /// Collection that accepts SEARCH requests. A fixture's own
    /// arbiter path takes precedence.
    #[serde(default = "default_arbiter_path")]
    pub arbiter_path: String,

    /// JSON fixture for the in-memory backend
    #[serde(default)]
    pub fixture: Option<PathBuf>,
}

/// Limits configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LimitsConfig {
    /// Backend time budget per search, in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_sec: u64,

    /// Largest accepted request body
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// Deepest element nesting accepted in a search document
    #[serde(default = "default_max_nesting_depth")]
    pub max_nesting_depth: usize,
}

// Default value functions
fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_arbiter_path() -> String {
    "/search".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_max_body_bytes() -> usize {
    1024 * 1024
}

fn default_max_nesting_depth() -> usize {
    MAX_DEPTH
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            base_uri: None,
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            arbiter_path: default_arbiter_path(),
            fixture: None,
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            request_timeout_sec: default_request_timeout(),
            max_body_bytes: default_max_body_bytes(),
            max_nesting_depth: default_max_nesting_depth(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| DavSearchError::ConfigError(format!("Failed to read config file: {e}")))?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load config with priority: env vars > TOML > defaults
    pub fn load() -> Result<Self> {
        let xdg = XdgDirs::new();
        Self::load_with_xdg(&xdg)
    }

    /// Load config with explicit XDG directories
    ///
    /// Priority order:
    /// 1. DAVSEARCH_CONFIG env var
    /// 2. XDG config file (~/.config/davsearch/config.toml)
    /// 3. ./davsearch.toml
    /// 4. Defaults
    pub fn load_with_xdg(xdg: &XdgDirs) -> Result<Self> {
        let mut config = if let Ok(config_path) = env::var("DAVSEARCH_CONFIG") {
            Self::from_file(config_path)?
        } else {
            let xdg_config = xdg.config_file();
            if xdg_config.exists() {
                Self::from_file(xdg_config)?
            } else if Path::new("davsearch.toml").exists() {
                Self::from_file("davsearch.toml")?
            } else {
                Self::default()
            }
        };

        // Pick up a fixture dropped into the XDG data dir
        if config.backend.fixture.is_none() && env::var("DAVSEARCH_FIXTURE").is_err() {
            let fixture = xdg.fixture_file();
            if fixture.exists() {
                config.backend.fixture = Some(fixture);
            }
        }

        config.merge_env();
        config.validate()?;

        Ok(config)
    }

    /// Merge configuration with environment variables
    pub fn merge_env(&mut self) {
        // Server configuration
        if let Ok(host) = env::var("DAVSEARCH_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = env::var("DAVSEARCH_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }
        if let Ok(base_uri) = env::var("DAVSEARCH_BASE_URI") {
            self.server.base_uri = Some(base_uri);
        }

        // Backend configuration
        if let Ok(arbiter) = env::var("DAVSEARCH_ARBITER_PATH") {
            self.backend.arbiter_path = arbiter;
        }
        if let Ok(fixture) = env::var("DAVSEARCH_FIXTURE") {
            self.backend.fixture = Some(PathBuf::from(fixture));
        }

        // Limits configuration
        if let Ok(timeout) = env::var("DAVSEARCH_REQUEST_TIMEOUT_SEC") {
            if let Ok(t) = timeout.parse() {
                self.limits.request_timeout_sec = t;
            }
        }
        if let Ok(max_body) = env::var("DAVSEARCH_MAX_BODY_BYTES") {
            if let Ok(bytes) = max_body.parse() {
                self.limits.max_body_bytes = bytes;
            }
        }
        if let Ok(depth) = env::var("DAVSEARCH_MAX_NESTING_DEPTH") {
            if let Ok(d) = depth.parse() {
                self.limits.max_nesting_depth = d;
            }
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(DavSearchError::ConfigError(
                "Port must be non-zero".to_string(),
            ));
        }

        if !self.backend.arbiter_path.starts_with('/') {
            return Err(DavSearchError::ConfigError(format!(
                "Arbiter path must be absolute, got '{}'",
                self.backend.arbiter_path
            )));
        }

        if self.limits.request_timeout_sec == 0 {
            return Err(DavSearchError::ConfigError(
                "Request timeout must be non-zero".to_string(),
            ));
        }

        if self.limits.max_body_bytes == 0 {
            return Err(DavSearchError::ConfigError(
                "Max body size must be non-zero".to_string(),
            ));
        }

        if self.limits.max_nesting_depth == 0
            || self.limits.max_nesting_depth > NESTING_DEPTH_CEILING
        {
            return Err(DavSearchError::ConfigError(format!(
                "Max nesting depth must be between 1 and {NESTING_DEPTH_CEILING}, got {}",
                self.limits.max_nesting_depth
            )));
        }

        Ok(())
    }

    /// Backend time budget as a [`Duration`]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.limits.request_timeout_sec)
    }

    /// Socket address string for the HTTP server
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Log configuration
    pub fn log_config(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen: {}", self.bind_address());
        tracing::info!(
            "  Base URI: {}",
            self.server.base_uri.as_deref().unwrap_or("(request path)")
        );
        tracing::info!("  Arbiter path: {}", self.backend.arbiter_path);
        tracing::info!("  Fixture: {:?}", self.backend.fixture);
        tracing::info!("  Request timeout: {}s", self.limits.request_timeout_sec);
        tracing::info!("  Max body: {} bytes", self.limits.max_body_bytes);
        tracing::info!("  Max nesting depth: {}", self.limits.max_nesting_depth);
    }
}
