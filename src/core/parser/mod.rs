//! Grammar parser for search request documents.
//!
//! Turns a request body into a [`Document`]: either a basic search
//! query or a schema discovery request. Everything that goes wrong is
//! a [`ParseFailure`].

mod grammar;
mod href;
mod operator;

pub use grammar::parse_basicsearch;
pub use href::{href_path, resolve_href};
pub use operator::{parse_operator, supported_operators};

use crate::core::error::ParseFailure;
use crate::core::query::Document;
use crate::core::xml::{parse_document_with_limit, Element, MAX_DEPTH};

type DocumentParser = fn(&Element, &str) -> Result<Document, ParseFailure>;

/// Accepted document roots in the `DAV:` namespace
const DOCUMENT_TYPES: [(&str, DocumentParser); 2] = [
    ("searchrequest", parse_search_request),
    ("query-schema-discovery", parse_discovery_request),
];

/// Parse a request body.
///
/// `base_uri` is the request URI; relative scope hrefs are resolved
/// against it.
///
/// ```
/// use davsearch::core::parser::parse;
/// use davsearch::core::query::Document;
///
/// let body = br#"<d:query-schema-discovery xmlns:d="DAV:"/>"#;
/// assert_eq!(parse(body, "/search").unwrap(), Document::Discovery);
/// ```
pub fn parse(body: &[u8], base_uri: &str) -> Result<Document, ParseFailure> {
    parse_with_limit(body, base_uri, MAX_DEPTH)
}

/// Parse a request body whose elements may nest at most `max_depth`
/// levels deep.
pub fn parse_with_limit(
    body: &[u8],
    base_uri: &str,
    max_depth: usize,
) -> Result<Document, ParseFailure> {
    let root = parse_document_with_limit(body, max_depth)?;

    DOCUMENT_TYPES
        .iter()
        .find(|(local, _)| root.is_dav(local))
        .map(|(_, parse_root)| parse_root(&root, base_uri))
        .unwrap_or_else(|| {
            Err(ParseFailure::new(format!(
                "Unexpected document type: {} for this Content-Type, expected {{DAV:}}searchrequest or {{DAV:}}query-schema-discovery",
                root.name
            )))
        })
}

fn parse_search_request(root: &Element, base_uri: &str) -> Result<Document, ParseFailure> {
    if let Some(basicsearch) = root.dav_child("basicsearch") {
        return parse_basicsearch(basicsearch, base_uri).map(Document::Search);
    }

    match root.children.first() {
        Some(grammar) => Err(ParseFailure::new(format!(
            "Unsupported query grammar {}, only {{DAV:}}basicsearch is supported",
            grammar.name
        ))),
        None => Err(ParseFailure::new(
            "Missing {DAV:}basicsearch in {DAV:}searchrequest",
        )),
    }
}

fn parse_discovery_request(_root: &Element, _base_uri: &str) -> Result<Document, ParseFailure> {
    Ok(Document::Discovery)
}
