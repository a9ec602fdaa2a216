//! `{DAV:}basicsearch` grammar.
//!
//! The immediate children of `basicsearch` are matched against a
//! clause table in one pass. Each clause has a typed field and an
//! explicit default; unknown children are collected and ignored.
//! Repeated clauses keep the last occurrence.

use crate::core::error::ParseFailure;
use crate::core::parser::href::resolve_href;
use crate::core::parser::operator::parse_operator;
use crate::core::query::{
    Depth, Direction, Operator, Order, QualifiedName, Scope, SearchQuery, DAV_NS,
};
use crate::core::xml::Element;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Clause {
    Select,
    From,
    Where,
    OrderBy,
    Limit,
}

static CLAUSES: Lazy<HashMap<&'static str, Clause>> = Lazy::new(|| {
    HashMap::from([
        ("select", Clause::Select),
        ("from", Clause::From),
        ("where", Clause::Where),
        ("orderby", Clause::OrderBy),
        ("limit", Clause::Limit),
    ])
});

#[derive(Default)]
struct Clauses<'a> {
    select: Option<&'a Element>,
    from: Option<&'a Element>,
    where_clause: Option<&'a Element>,
    order_by: Option<&'a Element>,
    limit: Option<&'a Element>,
    ignored: Vec<&'a QualifiedName>,
}

impl<'a> Clauses<'a> {
    fn collect(basicsearch: &'a Element) -> Self {
        let mut clauses = Self::default();
        for child in &basicsearch.children {
            match clause_of(&child.name) {
                Some(Clause::Select) => clauses.select = Some(child),
                Some(Clause::From) => clauses.from = Some(child),
                Some(Clause::Where) => clauses.where_clause = Some(child),
                Some(Clause::OrderBy) => clauses.order_by = Some(child),
                Some(Clause::Limit) => clauses.limit = Some(child),
                None => clauses.ignored.push(&child.name),
            }
        }
        clauses
    }
}

fn clause_of(name: &QualifiedName) -> Option<Clause> {
    if name.namespace != DAV_NS {
        return None;
    }
    CLAUSES.get(name.local.as_str()).copied()
}

/// Parse a `{DAV:}basicsearch` element into a [`SearchQuery`].
pub fn parse_basicsearch(basicsearch: &Element, base_uri: &str) -> Result<SearchQuery, ParseFailure> {
    let clauses = Clauses::collect(basicsearch);

    if !clauses.ignored.is_empty() {
        let names: Vec<String> = clauses.ignored.iter().map(|n| n.to_string()).collect();
        trace!(ignored = %names.join(", "), "Ignoring unknown basicsearch clauses");
    }

    let from = clauses.from.ok_or_else(|| {
        ParseFailure::new("Missing {DAV:}from when parsing {DAV:}basicsearch")
    })?;

    Ok(SearchQuery {
        select: clauses.select.map(parse_select).unwrap_or_default(),
        from: parse_from(from, base_uri)?,
        where_clause: clauses.where_clause.map(parse_where).transpose()?,
        order_by: clauses
            .order_by
            .map(parse_order_by)
            .transpose()?
            .unwrap_or_default(),
        limit: clauses.limit.map(parse_limit).transpose()?,
    })
}

fn parse_select(select: &Element) -> Vec<QualifiedName> {
    select
        .dav_children("prop")
        .flat_map(|prop| prop.children.iter().map(|p| p.name.clone()))
        .collect()
}

fn parse_from(from: &Element, base_uri: &str) -> Result<Vec<Scope>, ParseFailure> {
    let scopes = from
        .dav_children("scope")
        .map(|scope| parse_scope(scope, base_uri))
        .collect::<Result<Vec<_>, _>>()?;

    if scopes.is_empty() {
        return Err(ParseFailure::new(
            "{DAV:}from must contain at least one {DAV:}scope",
        ));
    }
    Ok(scopes)
}

fn parse_scope(scope: &Element, base_uri: &str) -> Result<Scope, ParseFailure> {
    let href = scope
        .dav_child("href")
        .map(|h| h.text.trim())
        .filter(|h| !h.is_empty())
        .ok_or_else(|| ParseFailure::new("Missing {DAV:}href in {DAV:}scope"))?;

    let depth = match scope.dav_child("depth") {
        Some(marker) => Depth::parse(&marker.text).ok_or_else(|| {
            ParseFailure::new(format!(
                "Invalid {{DAV:}}depth '{}' in {{DAV:}}scope, expected 0, 1 or infinity",
                marker.text.trim()
            ))
        })?,
        None => Depth::Infinity,
    };

    Ok(Scope::new(resolve_href(base_uri, href), depth))
}

fn parse_where(where_clause: &Element) -> Result<Operator, ParseFailure> {
    match where_clause.children.as_slice() {
        [operator] => parse_operator(operator),
        children => Err(ParseFailure::new(format!(
            "{{DAV:}}where must contain exactly one operator, found {}",
            children.len()
        ))),
    }
}

fn parse_order_by(order_by: &Element) -> Result<Vec<Order>, ParseFailure> {
    order_by.dav_children("order").map(parse_order).collect()
}

fn parse_order(order: &Element) -> Result<Order, ParseFailure> {
    let prop = order.dav_child("prop").ok_or_else(|| {
        ParseFailure::new("Missing {DAV:}prop when parsing {DAV:}order")
    })?;

    // Extra children are rejected, not ignored
    let property = match prop.children.as_slice() {
        [property] => property.name.clone(),
        [] => {
            return Err(ParseFailure::new(
                "Empty {DAV:}prop when parsing {DAV:}order",
            ))
        }
        _ => {
            return Err(ParseFailure::new(
                "{DAV:}prop in {DAV:}order must name exactly one property",
            ))
        }
    };

    let direction = if order.has_dav_child("descending") {
        Direction::Descending
    } else {
        Direction::Ascending
    };

    Ok(Order::new(property, direction))
}

fn parse_limit(limit: &Element) -> Result<usize, ParseFailure> {
    let nresults = limit
        .dav_child("nresults")
        .ok_or_else(|| ParseFailure::new("Missing {DAV:}nresults in {DAV:}limit"))?;

    nresults.text.trim().parse().map_err(|_| {
        ParseFailure::new(format!(
            "Invalid {{DAV:}}nresults '{}', expected a non-negative integer",
            nresults.text.trim()
        ))
    })
}
