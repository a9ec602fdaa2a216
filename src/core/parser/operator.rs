//! `{DAV:}where` operator parsing.
//!
//! Operator elements are dispatched through a static table keyed by
//! local name (all operators live in the `DAV:` namespace). Each entry
//! builds exactly one [`Operator`] variant.

use crate::core::error::ParseFailure;
use crate::core::query::{ComparisonKind, Operator, QualifiedName, DAV_NS};
use crate::core::xml::Element;
use once_cell::sync::Lazy;
use std::collections::HashMap;

type OperatorParser = fn(&Element) -> Result<Operator, ParseFailure>;

static OPERATORS: Lazy<HashMap<&'static str, OperatorParser>> = Lazy::new(|| {
    let mut table: HashMap<&'static str, OperatorParser> = HashMap::new();
    table.insert("and", parse_and);
    table.insert("or", parse_or);
    table.insert("not", parse_not);
    table.insert("eq", |e| parse_comparison(e, ComparisonKind::Eq));
    table.insert("neq", |e| parse_comparison(e, ComparisonKind::Neq));
    table.insert("lt", |e| parse_comparison(e, ComparisonKind::Lt));
    table.insert("lte", |e| parse_comparison(e, ComparisonKind::Lte));
    table.insert("gt", |e| parse_comparison(e, ComparisonKind::Gt));
    table.insert("gte", |e| parse_comparison(e, ComparisonKind::Gte));
    table.insert("like", |e| parse_comparison(e, ComparisonKind::Like));
    table.insert("contains", parse_contains);
    table.insert("is-defined", parse_is_defined);
    table.insert("is-collection", |_| Ok(Operator::IsCollection));
    table
});

/// Local names of every supported operator, sorted
pub fn supported_operators() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = OPERATORS.keys().copied().collect();
    names.sort_unstable();
    names
}

/// Parse one operator element and, recursively, its operands.
pub fn parse_operator(element: &Element) -> Result<Operator, ParseFailure> {
    let parser = if element.name.namespace == DAV_NS {
        OPERATORS.get(element.name.local.as_str())
    } else {
        None
    };

    match parser {
        Some(parse) => parse(element),
        None => Err(ParseFailure::new(format!(
            "Unsupported operator {} in {{DAV:}}where",
            element.name
        ))),
    }
}

fn parse_and(element: &Element) -> Result<Operator, ParseFailure> {
    Ok(Operator::and(parse_operands(element)?))
}

fn parse_or(element: &Element) -> Result<Operator, ParseFailure> {
    Ok(Operator::or(parse_operands(element)?))
}

fn parse_operands(element: &Element) -> Result<Vec<Operator>, ParseFailure> {
    if element.children.is_empty() {
        return Err(ParseFailure::new(format!(
            "{} requires at least one operand",
            element.name
        )));
    }
    element.children.iter().map(parse_operator).collect()
}

fn parse_not(element: &Element) -> Result<Operator, ParseFailure> {
    match element.children.as_slice() {
        [operand] => Ok(Operator::not(parse_operator(operand)?)),
        children => Err(ParseFailure::new(format!(
            "{{DAV:}}not requires exactly one operand, found {}",
            children.len()
        ))),
    }
}

fn parse_comparison(element: &Element, kind: ComparisonKind) -> Result<Operator, ParseFailure> {
    let property = required_property(element)?;
    let value = literal(element).ok_or_else(|| {
        ParseFailure::new(format!("Missing {{DAV:}}literal in {}", element.name))
    })?;
    Ok(Operator::compare(kind, property, value))
}

fn parse_contains(element: &Element) -> Result<Operator, ParseFailure> {
    let property = match element.dav_child("prop") {
        Some(_) => Some(required_property(element)?),
        None => None,
    };

    let value = match literal(element) {
        Some(value) => value,
        None if !element.text.trim().is_empty() => element.text.clone(),
        None => {
            return Err(ParseFailure::new(
                "Missing search text in {DAV:}contains",
            ))
        }
    };

    Ok(Operator::Contains { property, value })
}

fn parse_is_defined(element: &Element) -> Result<Operator, ParseFailure> {
    Ok(Operator::IsDefined {
        property: required_property(element)?,
    })
}

/// The single property named inside the operator's `{DAV:}prop`
fn required_property(element: &Element) -> Result<QualifiedName, ParseFailure> {
    let prop = element.dav_child("prop").ok_or_else(|| {
        ParseFailure::new(format!("Missing {{DAV:}}prop in {}", element.name))
    })?;

    match prop.children.as_slice() {
        [property] => Ok(property.name.clone()),
        [] => Err(ParseFailure::new(format!(
            "Empty {{DAV:}}prop in {}",
            element.name
        ))),
        _ => Err(ParseFailure::new(format!(
            "{{DAV:}}prop in {} must name exactly one property",
            element.name
        ))),
    }
}

fn literal(element: &Element) -> Option<String> {
    element
        .dav_child("literal")
        .or_else(|| element.dav_child("typed-literal"))
        .map(|literal| literal.text.clone())
}
