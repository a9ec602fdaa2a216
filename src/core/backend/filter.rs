//! Compiled `where` filters for the in-memory backend.
//!
//! An [`Operator`] tree is checked against the property definitions
//! once per query and turned into a [`Filter`]: literals are coerced to
//! the declared type and `like` patterns become regexes. Evaluating the
//! filter per resource is then infallible.

use crate::core::backend::memory::MemoryNode;
use crate::core::backend::{BackendError, PropertyType, SearchPropertyDefinition};
use crate::core::query::{ComparisonKind, Operator, QualifiedName};
use chrono::{DateTime, FixedOffset};
use regex::Regex;
use std::cmp::Ordering;
use std::collections::HashMap;

/// A property value coerced to its declared type
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    /// Strings compare with ASCII case folding
    Text(String),
    Integer(i64),
    Decimal(f64),
    Timestamp(DateTime<FixedOffset>),
    Boolean(bool),
}

impl TypedValue {
    /// Coerce `raw` to `data_type`. Dates accept RFC 3339 and the HTTP
    /// date format used by `getlastmodified`.
    pub fn parse(data_type: PropertyType, raw: &str) -> Option<Self> {
        let raw = raw.trim();
        match data_type {
            PropertyType::String => Some(TypedValue::Text(raw.to_ascii_lowercase())),
            PropertyType::Integer => raw.parse().ok().map(TypedValue::Integer),
            PropertyType::NonNegativeInteger => raw
                .parse::<i64>()
                .ok()
                .filter(|n| *n >= 0)
                .map(TypedValue::Integer),
            PropertyType::Decimal => raw
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(TypedValue::Decimal),
            PropertyType::DateTime => DateTime::parse_from_rfc3339(raw)
                .or_else(|_| DateTime::parse_from_rfc2822(raw))
                .ok()
                .map(TypedValue::Timestamp),
            PropertyType::Boolean => match raw.to_ascii_lowercase().as_str() {
                "true" | "1" => Some(TypedValue::Boolean(true)),
                "false" | "0" => Some(TypedValue::Boolean(false)),
                _ => None,
            },
        }
    }

    /// Order two values of the same type; `None` across types
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (TypedValue::Text(a), TypedValue::Text(b)) => Some(a.cmp(b)),
            (TypedValue::Integer(a), TypedValue::Integer(b)) => Some(a.cmp(b)),
            (TypedValue::Decimal(a), TypedValue::Decimal(b)) => a.partial_cmp(b),
            (TypedValue::Timestamp(a), TypedValue::Timestamp(b)) => Some(a.cmp(b)),
            (TypedValue::Boolean(a), TypedValue::Boolean(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub enum Filter {
    All(Vec<Filter>),
    Any(Vec<Filter>),
    Not(Box<Filter>),
    Compare {
        property: QualifiedName,
        data_type: PropertyType,
        kind: ComparisonKind,
        literal: TypedValue,
    },
    Like {
        property: QualifiedName,
        pattern: Regex,
    },
    /// Case-insensitive substring match over `properties`
    Contains {
        properties: Vec<QualifiedName>,
        needle: String,
    },
    IsDefined(QualifiedName),
    IsCollection,
}

impl Filter {
    /// Validate `operator` against the backend's definitions and compile it.
    pub fn compile(
        operator: &Operator,
        definitions: &HashMap<QualifiedName, SearchPropertyDefinition>,
    ) -> Result<Self, BackendError> {
        match operator {
            Operator::And { operands } => Ok(Filter::All(compile_all(operands, definitions)?)),
            Operator::Or { operands } => Ok(Filter::Any(compile_all(operands, definitions)?)),
            Operator::Not { operand } => Ok(Filter::Not(Box::new(Filter::compile(
                operand,
                definitions,
            )?))),
            Operator::Comparison(comparison) => {
                let definition = searchable(&comparison.property, definitions)?;

                if comparison.kind == ComparisonKind::Like {
                    return Ok(Filter::Like {
                        property: comparison.property.clone(),
                        pattern: like_pattern(&comparison.value)?,
                    });
                }

                let literal = TypedValue::parse(definition.data_type, &comparison.value)
                    .ok_or_else(|| {
                        BackendError::Failed(format!(
                            "Literal '{}' is not a valid {} for {}",
                            comparison.value,
                            definition.data_type.xsd_name(),
                            comparison.property
                        ))
                    })?;

                Ok(Filter::Compare {
                    property: comparison.property.clone(),
                    data_type: definition.data_type,
                    kind: comparison.kind,
                    literal,
                })
            }
            Operator::Contains { property, value } => {
                let properties = match property {
                    Some(name) => vec![searchable(name, definitions)?.name.clone()],
                    None => {
                        let mut names: Vec<QualifiedName> = definitions
                            .values()
                            .filter(|d| d.searchable)
                            .map(|d| d.name.clone())
                            .collect();
                        names.sort();
                        names
                    }
                };
                Ok(Filter::Contains {
                    properties,
                    needle: value.to_lowercase(),
                })
            }
            Operator::IsDefined { property } => Ok(Filter::IsDefined(property.clone())),
            Operator::IsCollection => Ok(Filter::IsCollection),
        }
    }

    pub fn matches(&self, node: &MemoryNode) -> bool {
        match self {
            Filter::All(filters) => filters.iter().all(|f| f.matches(node)),
            Filter::Any(filters) => filters.iter().any(|f| f.matches(node)),
            Filter::Not(filter) => !filter.matches(node),
            Filter::Compare {
                property,
                data_type,
                kind,
                literal,
            } => {
                let Some(value) = node
                    .property(property)
                    .and_then(|raw| TypedValue::parse(*data_type, raw))
                else {
                    return false;
                };
                match value.compare(literal) {
                    Some(ordering) => satisfies(*kind, ordering),
                    None => false,
                }
            }
            Filter::Like { property, pattern } => node
                .property(property)
                .is_some_and(|value| pattern.is_match(value)),
            Filter::Contains { properties, needle } => properties.iter().any(|name| {
                node.property(name)
                    .is_some_and(|value| value.to_lowercase().contains(needle.as_str()))
            }),
            Filter::IsDefined(property) => node.property(property).is_some(),
            Filter::IsCollection => node.collection,
        }
    }
}

fn compile_all(
    operands: &[Operator],
    definitions: &HashMap<QualifiedName, SearchPropertyDefinition>,
) -> Result<Vec<Filter>, BackendError> {
    operands
        .iter()
        .map(|operand| Filter::compile(operand, definitions))
        .collect()
}

fn searchable<'a>(
    name: &QualifiedName,
    definitions: &'a HashMap<QualifiedName, SearchPropertyDefinition>,
) -> Result<&'a SearchPropertyDefinition, BackendError> {
    let definition = definitions.get(name).ok_or_else(|| {
        BackendError::Failed(format!("Property {name} is not declared by this backend"))
    })?;
    if !definition.searchable {
        return Err(BackendError::Failed(format!(
            "Property {name} is not searchable"
        )));
    }
    Ok(definition)
}

fn satisfies(kind: ComparisonKind, ordering: Ordering) -> bool {
    match kind {
        ComparisonKind::Eq => ordering == Ordering::Equal,
        ComparisonKind::Neq => ordering != Ordering::Equal,
        ComparisonKind::Lt => ordering == Ordering::Less,
        ComparisonKind::Lte => ordering != Ordering::Greater,
        ComparisonKind::Gt => ordering == Ordering::Greater,
        ComparisonKind::Gte => ordering != Ordering::Less,
        // compiled into Filter::Like
        ComparisonKind::Like => false,
    }
}

/// Translate a `like` literal into an anchored, case-insensitive regex.
///
/// `%` matches any run of characters, `_` exactly one; a backslash
/// makes the next character literal.
fn like_pattern(literal: &str) -> Result<Regex, BackendError> {
    let mut pattern = String::from("(?is)^");
    let mut chars = literal.chars();

    while let Some(c) = chars.next() {
        match c {
            '%' => pattern.push_str(".*"),
            '_' => pattern.push('.'),
            '\\' => {
                if let Some(escaped) = chars.next() {
                    pattern.push_str(&regex::escape(escaped.encode_utf8(&mut [0; 4])));
                }
            }
            other => pattern.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
        }
    }
    pattern.push('$');

    Regex::new(&pattern)
        .map_err(|e| BackendError::Failed(format!("Invalid like pattern '{literal}': {e}")))
}
