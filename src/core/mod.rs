//! Core domain logic (protocol-agnostic)
//!
//! This module contains all search logic that is independent
//! of the transport (HTTP server, CLI).
//!
//! # Architecture
//!
//! - **query**: Query language model and query writer
//! - **xml**: Namespace-resolving reader and DAV document writer
//! - **parser**: `searchrequest` / `query-schema-discovery` grammar
//! - **backend**: Backend contract and the in-memory reference backend
//! - **search**: Request orchestration and schema discovery
//! - **response**: Outcome to status/headers/body rendering
//! - **capabilities**: DASL header, allowed methods, grammar set
//! - **config**, **xdg**: Configuration loading (TOML + environment)
//! - **error**: Error types and Result alias
//! - **services**: Unified service container

pub mod backend;
pub mod capabilities;
pub mod config;
pub mod error;
pub mod parser;
pub mod query;
pub mod response;
pub mod search;
pub mod services;
pub mod xdg;
pub mod xml;

// Re-export key types for convenience
pub use config::Config;
pub use error::{DavSearchError, Result};
pub use services::Services;
