//! XML plumbing for DAV documents.
//!
//! - **reader**: namespace-resolving element tree built with quick-xml
//! - **writer**: event writer that knows how to emit Clark names

mod reader;
mod writer;

pub use reader::{parse_document, parse_document_with_limit, Element, MAX_DEPTH};
pub use writer::DavXmlWriter;
