//! Search orchestration.
//!
//! The [`SearchEngine`] decides whether a request is a search request
//! for this server, parses it, runs it against the backend and reduces
//! every result to an [`Outcome`]. Rendering outcomes to bytes is the
//! job of [`crate::core::response`].

mod discovery;
mod engine;

pub use discovery::{discover, DiscoveryDocument, BASICSEARCH_GRAMMAR};
pub use engine::{
    is_xml_media_type, same_path, DavRequest, Dispatch, Outcome, PassThroughReason, SearchEngine,
    DEFAULT_TIMEOUT,
};
