//! Render a [`SearchQuery`] back into a `{DAV:}searchrequest` document.
//!
//! Used by the CLI to normalize queries and by tests to check that the
//! parser and the model agree.

use crate::core::error::{DavSearchError, Result};
use crate::core::query::{Direction, Operator, Order, QualifiedName, Scope, SearchQuery};
use crate::core::xml::DavXmlWriter;

/// Serialize a query as a complete searchrequest document.
pub fn to_xml(query: &SearchQuery) -> Result<String> {
    let mut w = DavXmlWriter::new()?;
    w.open_root("searchrequest")?;
    w.open("basicsearch")?;

    w.open("select")?;
    if query.select.is_empty() {
        w.empty("allprop")?;
    } else {
        w.open("prop")?;
        for name in &query.select {
            w.name_element(name, None)?;
        }
        w.close("prop")?;
    }
    w.close("select")?;

    w.open("from")?;
    for scope in &query.from {
        write_scope(&mut w, scope)?;
    }
    w.close("from")?;

    if let Some(operator) = &query.where_clause {
        w.open("where")?;
        write_operator(&mut w, operator)?;
        w.close("where")?;
    }

    if !query.order_by.is_empty() {
        w.open("orderby")?;
        for order in &query.order_by {
            write_order(&mut w, order)?;
        }
        w.close("orderby")?;
    }

    if let Some(limit) = query.limit {
        w.open("limit")?;
        w.text_element("nresults", &limit.to_string())?;
        w.close("limit")?;
    }

    w.close("basicsearch")?;
    w.close("searchrequest")?;

    String::from_utf8(w.finish()).map_err(|e| DavSearchError::XmlWrite(e.to_string()))
}

fn write_scope(w: &mut DavXmlWriter, scope: &Scope) -> Result<()> {
    w.open("scope")?;
    w.text_element("href", &scope.href)?;
    w.text_element("depth", scope.depth.as_str())?;
    w.close("scope")
}

fn write_operator(w: &mut DavXmlWriter, operator: &Operator) -> Result<()> {
    match operator {
        Operator::And { operands } | Operator::Or { operands } => {
            let local = if matches!(operator, Operator::And { .. }) {
                "and"
            } else {
                "or"
            };
            w.open(local)?;
            for operand in operands {
                write_operator(w, operand)?;
            }
            w.close(local)
        }
        Operator::Not { operand } => {
            w.open("not")?;
            write_operator(w, operand)?;
            w.close("not")
        }
        Operator::Comparison(comparison) => {
            let local = comparison.kind.element_name();
            w.open(local)?;
            write_prop(w, &comparison.property)?;
            w.text_element("literal", &comparison.value)?;
            w.close(local)
        }
        Operator::Contains {
            property: Some(property),
            value,
        } => {
            w.open("contains")?;
            write_prop(w, property)?;
            w.text_element("literal", value)?;
            w.close("contains")
        }
        Operator::Contains {
            property: None,
            value,
        } => w.text_element("contains", value),
        Operator::IsDefined { property } => {
            w.open("is-defined")?;
            write_prop(w, property)?;
            w.close("is-defined")
        }
        Operator::IsCollection => w.empty("is-collection"),
    }
}

fn write_order(w: &mut DavXmlWriter, order: &Order) -> Result<()> {
    w.open("order")?;
    write_prop(w, &order.property)?;
    w.empty(match order.direction {
        Direction::Ascending => "ascending",
        Direction::Descending => "descending",
    })?;
    w.close("order")
}

fn write_prop(w: &mut DavXmlWriter, name: &QualifiedName) -> Result<()> {
    w.open("prop")?;
    w.name_element(name, None)?;
    w.close("prop")
}
