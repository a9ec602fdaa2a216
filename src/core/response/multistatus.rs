//! Multi-status document rendering.

use crate::core::backend::{SearchPropertyDefinition, SearchResult};
use crate::core::capabilities::write_supported_query_grammar_set;
use crate::core::error::Result;
use crate::core::query::{ComparisonKind, QualifiedName};
use crate::core::search::DiscoveryDocument;
use crate::core::xml::DavXmlWriter;

pub const STATUS_OK: &str = "HTTP/1.1 200 OK";
pub const STATUS_NOT_FOUND: &str = "HTTP/1.1 404 Not Found";

const XML_SCHEMA_NS: &str = "http://www.w3.org/2001/XMLSchema";

/// Render search results.
///
/// With an explicit `select`, every selected name appears once per
/// response: found values under 200, everything else under 404. With an
/// empty `select`, the result's own properties are rendered.
pub fn render_multistatus(results: &[SearchResult], select: &[QualifiedName]) -> Result<Vec<u8>> {
    let mut w = DavXmlWriter::new()?;
    w.open_root("multistatus")?;

    for result in results {
        let mut found: Vec<(&QualifiedName, &str)> = Vec::new();
        let mut missing: Vec<&QualifiedName> = Vec::new();

        if select.is_empty() {
            for (name, value) in &result.properties {
                match value {
                    Some(value) => found.push((name, value.as_str())),
                    None => missing.push(name),
                }
            }
        } else {
            for name in select {
                match result.properties.get(name) {
                    Some(Some(value)) => found.push((name, value.as_str())),
                    _ => missing.push(name),
                }
            }
        }

        w.open("response")?;
        w.text_element("href", &result.href)?;

        if !found.is_empty() || missing.is_empty() {
            w.open("propstat")?;
            w.open("prop")?;
            for (name, value) in &found {
                w.name_element(name, Some(*value))?;
            }
            w.close("prop")?;
            w.text_element("status", STATUS_OK)?;
            w.close("propstat")?;
        }

        if !missing.is_empty() {
            w.open("propstat")?;
            w.open("prop")?;
            for name in &missing {
                w.name_element(name, None)?;
            }
            w.close("prop")?;
            w.text_element("status", STATUS_NOT_FOUND)?;
            w.close("propstat")?;
        }

        w.close("response")?;
    }

    w.close("multistatus")?;
    Ok(w.finish())
}

/// Render a `query-schema-discovery` answer, one response per scope.
pub fn render_discovery(document: &DiscoveryDocument) -> Result<Vec<u8>> {
    let mut w = DavXmlWriter::new()?;
    w.open_root("multistatus")?;

    for scope in &document.scopes {
        w.open("response")?;
        w.text_element("href", &scope.href)?;
        w.text_element("status", STATUS_OK)?;

        w.open("query-schema")?;
        w.open("basicsearchschema")?;

        w.open("properties")?;
        for property in &document.properties {
            write_propdesc(&mut w, property)?;
        }
        w.close("properties")?;

        w.open("operators")?;
        for operator in &document.operators {
            write_opdesc(&mut w, operator)?;
        }
        w.close("operators")?;

        w.close("basicsearchschema")?;
        w.close("query-schema")?;

        write_supported_query_grammar_set(&mut w)?;
        w.close("response")?;
    }

    w.close("multistatus")?;
    Ok(w.finish())
}

fn write_propdesc(w: &mut DavXmlWriter, property: &SearchPropertyDefinition) -> Result<()> {
    w.open("propdesc")?;

    w.open("prop")?;
    w.name_element(&property.name, None)?;
    w.close("prop")?;

    w.open("datatype")?;
    w.name_element(
        &QualifiedName::new(XML_SCHEMA_NS, property.data_type.xsd_name()),
        None,
    )?;
    w.close("datatype")?;

    if property.searchable {
        w.empty("searchable")?;
    }
    if property.selectable {
        w.empty("selectable")?;
    }
    if property.sortable {
        w.empty("sortable")?;
    }

    w.close("propdesc")
}

fn write_opdesc(w: &mut DavXmlWriter, operator: &str) -> Result<()> {
    let operands: &[&str] = match operator {
        "is-defined" => &["operand-property"],
        "contains" => &["operand-literal"],
        _ if is_comparison(operator) => &["operand-property", "operand-literal"],
        _ => &[],
    };
    let pcdata = operator == "contains" || is_comparison(operator);

    if pcdata {
        w.open_with("opdesc", &[("allow-pcdata", "yes")])?;
    } else {
        w.open("opdesc")?;
    }
    w.empty(operator)?;
    for operand in operands {
        w.empty(operand)?;
    }
    w.close("opdesc")
}

fn is_comparison(operator: &str) -> bool {
    [
        ComparisonKind::Eq,
        ComparisonKind::Neq,
        ComparisonKind::Lt,
        ComparisonKind::Lte,
        ComparisonKind::Gt,
        ComparisonKind::Gte,
        ComparisonKind::Like,
    ]
    .iter()
    .any(|kind| kind.element_name() == operator)
}
