//! Capability advertisement on the arbiter collection.
//!
//! Small hooks the host server calls while answering OPTIONS and
//! PROPFIND, so clients can find out that SEARCH is available.

use crate::core::error::Result;
use crate::core::response::{DavResponse, STATUS_OK};
use crate::core::search::{same_path, BASICSEARCH_GRAMMAR};
use crate::core::xml::DavXmlWriter;
use tracing::error;

pub const DASL_HEADER: &str = "DASL";
pub const DASL_VALUE: &str = "<DAV:basicsearch>";

/// Methods this crate adds on top of the host server's own
pub const SEARCH_METHOD: &str = "SEARCH";

/// The `DASL` header to add to an OPTIONS response for `path`
pub fn dasl_header(path: &str, arbiter: &str) -> Option<(&'static str, &'static str)> {
    same_path(path, arbiter).then_some((DASL_HEADER, DASL_VALUE))
}

/// Extra methods allowed on `path`
pub fn allowed_methods(path: &str, arbiter: &str) -> Vec<&'static str> {
    if same_path(path, arbiter) {
        vec![SEARCH_METHOD]
    } else {
        Vec::new()
    }
}

/// PROPFIND answer carrying `{DAV:}supported-query-grammar-set` for
/// the arbiter collection at `href`.
pub fn supported_query_grammar_response(href: &str) -> DavResponse {
    match render_grammar_propfind(href) {
        Ok(body) => DavResponse::xml(207, body),
        Err(e) => {
            error!(error = %e, "Failed to render supported-query-grammar-set");
            DavResponse::text(500, e.message())
        }
    }
}

fn render_grammar_propfind(href: &str) -> Result<Vec<u8>> {
    let mut w = DavXmlWriter::new()?;
    w.open_root("multistatus")?;
    w.open("response")?;
    w.text_element("href", href)?;
    w.open("propstat")?;
    w.open("prop")?;
    write_supported_query_grammar_set(&mut w)?;
    w.close("prop")?;
    w.text_element("status", STATUS_OK)?;
    w.close("propstat")?;
    w.close("response")?;
    w.close("multistatus")?;
    Ok(w.finish())
}

/// `<d:supported-query-grammar-set>` naming `basicsearch`
pub fn write_supported_query_grammar_set(w: &mut DavXmlWriter) -> Result<()> {
    w.open("supported-query-grammar-set")?;
    w.open("supported-query-grammar")?;
    w.open("grammar")?;
    w.empty(BASICSEARCH_GRAMMAR)?;
    w.close("grammar")?;
    w.close("supported-query-grammar")?;
    w.close("supported-query-grammar-set")
}
