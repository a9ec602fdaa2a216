//! davsearch - DASL basic search for DAV servers
//!
//! Implements the server side of the WebDAV `SEARCH` method
//! (RFC 5323): parsing `basicsearch` queries, running them against a
//! pluggable backend and rendering `207 Multi-Status` answers.
//!
//! # Architecture
//!
//! The codebase is organized into three main modules:
//!
//! - **core**: Domain logic (protocol-agnostic)
//!   - query, xml, parser (query model and grammar)
//!   - backend (backend contract, in-memory backend)
//!   - search, response, capabilities (request pipeline)
//!   - config, error, xdg, services
//!
//! - **http**: axum adapter (depends on core)
//!   - handlers, middleware
//!
//! - **cli**: Command-line adapter (depends on core)
//!   - parse, search, discover, show-config, completions
//!
//! # Example
//!
//! ```
//! use davsearch::core::backend::MemoryBackend;
//! use davsearch::core::response::serialize;
//! use davsearch::core::search::{DavRequest, Dispatch, SearchEngine};
//! use std::sync::Arc;
//!
//! # tokio_test_block(async {
//! let engine = SearchEngine::new(Arc::new(MemoryBackend::new("/search")));
//! let body = r#"<d:query-schema-discovery xmlns:d="DAV:"/>"#;
//! let request = DavRequest::search("/search", Some("text/xml"), body);
//!
//! match engine.process(&request).await {
//!     Dispatch::Handled(outcome) => assert_eq!(serialize(&outcome).status, 207),
//!     Dispatch::PassThrough(reason) => panic!("not handled: {reason:?}"),
//! }
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) {
//! #     tokio::runtime::Runtime::new().unwrap().block_on(f);
//! # }
//! ```

// Core domain logic (protocol-agnostic)
pub mod core;

// HTTP adapter
pub mod http;

// Command-line adapter
pub mod cli;

// Re-export commonly used types for convenience
pub use core::backend::{MemoryBackend, SearchBackend, SearchPropertyDefinition, SearchResult};
pub use core::config::Config;
pub use core::error::{DavSearchError, Result};
pub use core::query::{Document, Operator, QualifiedName, SearchQuery};
pub use core::search::{DavRequest, Dispatch, Outcome, SearchEngine};
pub use core::services::Services;
