//! Search request orchestration.

use crate::core::backend::{BackendError, SearchBackend, SearchResult};
use crate::core::parser;
use crate::core::query::{Document, QualifiedName};
use crate::core::search::discovery::{discover, DiscoveryDocument};
use crate::core::xml::MAX_DEPTH;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Backend time budget when none is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// The parts of an HTTP request the engine looks at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DavRequest {
    pub method: String,
    /// Request path, without query string
    pub path: String,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
    /// Base for resolving relative scope hrefs
    pub base_uri: String,
}

impl DavRequest {
    /// A SEARCH request whose base URI is its own path
    pub fn search(
        path: impl Into<String>,
        content_type: Option<&str>,
        body: impl Into<Vec<u8>>,
    ) -> Self {
        let path = path.into();
        Self {
            method: "SEARCH".to_string(),
            base_uri: path.clone(),
            path,
            content_type: content_type.map(str::to_string),
            body: body.into(),
        }
    }

    pub fn with_base_uri(mut self, base_uri: impl Into<String>) -> Self {
        self.base_uri = base_uri.into();
        self
    }
}

/// Why a request was left to the host server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassThroughReason {
    /// Body is not an XML document
    UnsupportedMediaType,
    /// Request is not addressed to the arbiter collection
    NotArbiterPath,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    PassThrough(PassThroughReason),
    Handled(Outcome),
}

/// Result of handling a search or discovery request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Matching resources and the properties the client asked for
    MultiStatus {
        results: Vec<SearchResult>,
        select: Vec<QualifiedName>,
    },
    Discovery(DiscoveryDocument),
    /// Query could not be parsed
    BadRequest(String),
    /// Backend refused the query
    Forbidden(String),
    /// Backend failed or timed out
    ServerError(String),
}

impl Outcome {
    /// HTTP status code for this outcome
    pub fn status(&self) -> u16 {
        match self {
            Outcome::MultiStatus { .. } | Outcome::Discovery(_) => 207,
            Outcome::BadRequest(_) => 400,
            Outcome::Forbidden(_) => 403,
            Outcome::ServerError(_) => 500,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::MultiStatus { .. } | Outcome::Discovery(_))
    }
}

/// Stateless search orchestrator over one backend
#[derive(Clone)]
pub struct SearchEngine {
    backend: Arc<dyn SearchBackend>,
    timeout: Duration,
    max_depth: usize,
}

impl SearchEngine {
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        Self {
            backend,
            timeout: DEFAULT_TIMEOUT,
            max_depth: MAX_DEPTH,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Accept search documents nested up to `max_depth` elements deep
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn backend(&self) -> &Arc<dyn SearchBackend> {
        &self.backend
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn arbiter_path(&self) -> String {
        self.backend.arbiter_path()
    }

    pub fn is_arbiter_path(&self, path: &str) -> bool {
        same_path(path, &self.backend.arbiter_path())
    }

    /// Entry point for a SEARCH request.
    ///
    /// # Arguments
    ///
    /// * `request` - Method, path, content type, body and base URI
    ///
    /// # Returns
    ///
    /// `PassThrough` when the request is not ours (checked before any
    /// parsing), otherwise the handled [`Outcome`]. A body that does
    /// not parse is a `BadRequest` and never reaches the backend.
    pub async fn process(&self, request: &DavRequest) -> Dispatch {
        if !is_xml_media_type(request.content_type.as_deref()) {
            debug!(
                method = %request.method,
                path = %request.path,
                content_type = ?request.content_type,
                "Passing through: not an XML search body"
            );
            return Dispatch::PassThrough(PassThroughReason::UnsupportedMediaType);
        }

        if !self.is_arbiter_path(&request.path) {
            debug!(
                method = %request.method,
                path = %request.path,
                arbiter = %self.backend.arbiter_path(),
                "Passing through: not the arbiter path"
            );
            return Dispatch::PassThrough(PassThroughReason::NotArbiterPath);
        }

        match parser::parse_with_limit(&request.body, &request.base_uri, self.max_depth) {
            Ok(document) => Dispatch::Handled(self.handle(document).await),
            Err(failure) => {
                debug!(path = %request.path, error = %failure, "Rejecting unparsable search body");
                Dispatch::Handled(Outcome::BadRequest(failure.message))
            }
        }
    }

    /// Run a parsed document.
    pub async fn handle(&self, document: Document) -> Outcome {
        match document {
            Document::Search(query) => {
                let start = Instant::now();
                let select = query.select.clone();

                match tokio::time::timeout(self.timeout, self.backend.search(&query)).await {
                    Ok(Ok(results)) => {
                        info!(
                            scopes = query.from.len(),
                            results = results.len(),
                            duration_ms = start.elapsed().as_millis() as u64,
                            "Search completed"
                        );
                        Outcome::MultiStatus { results, select }
                    }
                    Ok(Err(BackendError::Forbidden(message))) => {
                        warn!(error = %message, "Search forbidden by backend");
                        Outcome::Forbidden(message)
                    }
                    Ok(Err(BackendError::Failed(message))) => {
                        error!(error = %message, "Search backend failed");
                        Outcome::ServerError(message)
                    }
                    Err(_) => {
                        error!(
                            timeout_ms = self.timeout.as_millis() as u64,
                            "Search backend timed out"
                        );
                        Outcome::ServerError(format!(
                            "Search backend timed out after {}ms",
                            self.timeout.as_millis()
                        ))
                    }
                }
            }
            Document::Discovery => self.discover(),
        }
    }

    /// Answer a schema discovery request
    pub fn discover(&self) -> Outcome {
        let document = discover(self.backend.as_ref());
        debug!(
            properties = document.properties.len(),
            scopes = document.scopes.len(),
            "Schema discovery"
        );
        Outcome::Discovery(document)
    }
}

/// Whether a `Content-Type` value names an XML body.
///
/// Only the media type is compared; parameters such as `charset` are
/// ignored.
pub fn is_xml_media_type(content_type: Option<&str>) -> bool {
    let Some(value) = content_type else {
        return false;
    };
    let media_type = value.split(';').next().unwrap_or("").trim();
    media_type.eq_ignore_ascii_case("text/xml") || media_type.eq_ignore_ascii_case("application/xml")
}

/// Whether a request path names the arbiter collection.
///
/// The comparison is exact: `/search/` and `search` are different
/// resources from `/search`.
pub fn same_path(a: &str, b: &str) -> bool {
    a == b
}
