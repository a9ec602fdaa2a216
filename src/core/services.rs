//! Unified service container for davsearch
//!
//! Provides shared access to the search engine and configuration.

use crate::core::backend::{MemoryBackend, SearchBackend};
use crate::core::config::Config;
use crate::core::error::Result;
use crate::core::search::SearchEngine;
use std::sync::Arc;

/// Unified services container
///
/// The HTTP adapter and the CLI use this same struct for service access.
#[derive(Clone)]
pub struct Services {
    /// Search orchestrator bound to the configured backend
    pub engine: Arc<SearchEngine>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl Services {
    /// Create services from configuration.
    ///
    /// Loads the configured fixture into a [`MemoryBackend`]; without a
    /// fixture the backend is empty and answers at the configured
    /// arbiter path.
    pub fn new(config: Config) -> Result<Self> {
        let backend = match &config.backend.fixture {
            Some(path) => MemoryBackend::from_file(path)?,
            None => MemoryBackend::new(config.backend.arbiter_path.clone()),
        };
        Ok(Self::with_backend(config, Arc::new(backend)))
    }

    /// Create services over an explicit backend
    pub fn with_backend(config: Config, backend: Arc<dyn SearchBackend>) -> Self {
        let engine = SearchEngine::new(backend)
            .with_timeout(config.request_timeout())
            .with_max_depth(config.limits.max_nesting_depth);
        Self {
            engine: Arc::new(engine),
            config: Arc::new(config),
        }
    }

    /// Base URI for resolving relative scope hrefs in a request to `path`
    pub fn base_uri_for(&self, path: &str) -> String {
        self.config
            .server
            .base_uri
            .clone()
            .unwrap_or_else(|| path.to_string())
    }
}
