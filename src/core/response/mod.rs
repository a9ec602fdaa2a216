//! Outcome serialization.
//!
//! Converts an [`Outcome`] into status, headers and body bytes. The
//! success paths render `DAV:` multi-status documents; failures carry a
//! plain-text diagnostic.

mod multistatus;

pub use multistatus::{render_discovery, render_multistatus, STATUS_NOT_FOUND, STATUS_OK};

use crate::core::search::Outcome;
use std::borrow::Cow;
use tracing::error;

pub const XML_CONTENT_TYPE: &str = "application/xml; charset=utf-8";
pub const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// A protocol-neutral response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DavResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl DavResponse {
    pub fn xml(status: u16, body: Vec<u8>) -> Self {
        Self {
            status,
            headers: vec![("Content-Type".to_string(), XML_CONTENT_TYPE.to_string())],
            body,
        }
    }

    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: vec![("Content-Type".to_string(), TEXT_CONTENT_TYPE.to_string())],
            body: body.into().into_bytes(),
        }
    }

    /// First header named `name`, case-insensitive
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// Render an outcome.
///
/// Writing XML into memory only fails on internal errors; those become
/// a 500 response rather than a panic.
pub fn serialize(outcome: &Outcome) -> DavResponse {
    match outcome {
        Outcome::MultiStatus { results, select } => {
            xml_or_error(render_multistatus(results, select))
        }
        Outcome::Discovery(document) => xml_or_error(render_discovery(document)),
        Outcome::BadRequest(message) => DavResponse::text(400, format!("Parse error: {message}")),
        Outcome::Forbidden(message) => DavResponse::text(403, message.clone()),
        Outcome::ServerError(message) => DavResponse::text(500, message.clone()),
    }
}

fn xml_or_error(rendered: crate::core::error::Result<Vec<u8>>) -> DavResponse {
    match rendered {
        Ok(body) => DavResponse::xml(207, body),
        Err(e) => {
            error!(error = %e, "Failed to render multistatus document");
            DavResponse::text(500, e.message())
        }
    }
}
