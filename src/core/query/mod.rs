//! Query language model for DASL basic search.
//!
//! Plain data types produced by the grammar parser and consumed by
//! backends. Values are immutable once parsed and compare
//! structurally.

pub mod writer;

use serde::{Serialize, Serializer};
use std::fmt;

/// The `DAV:` namespace URI
pub const DAV_NS: &str = "DAV:";

/// A namespace-qualified XML name, displayed in Clark notation
/// (`{namespace}local`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedName {
    pub namespace: String,
    pub local: String,
}

impl QualifiedName {
    pub fn new(namespace: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            local: local.into(),
        }
    }

    /// Name in the `DAV:` namespace
    pub fn dav(local: impl Into<String>) -> Self {
        Self::new(DAV_NS, local)
    }

    /// Parse Clark notation. A name without `{...}` has no namespace.
    ///
    /// ```
    /// use davsearch::core::query::QualifiedName;
    ///
    /// let name = QualifiedName::from_clark("{DAV:}displayname").unwrap();
    /// assert_eq!(name, QualifiedName::dav("displayname"));
    /// assert!(QualifiedName::from_clark("{DAV:").is_none());
    /// ```
    pub fn from_clark(clark: &str) -> Option<Self> {
        match clark.strip_prefix('{') {
            Some(rest) => {
                let (namespace, local) = rest.split_once('}')?;
                if local.is_empty() {
                    return None;
                }
                Some(Self::new(namespace, local))
            }
            None if !clark.is_empty() => Some(Self::new("", clark)),
            None => None,
        }
    }

    pub fn is_dav(&self, local: &str) -> bool {
        self.namespace == DAV_NS && self.local == local
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}{}", self.namespace, self.local)
    }
}

impl Serialize for QualifiedName {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A parsed `{DAV:}basicsearch` query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchQuery {
    /// Properties to return; empty means the backend's default set
    pub select: Vec<QualifiedName>,

    /// Collections to search, never empty
    pub from: Vec<Scope>,

    /// Filter; `None` matches everything
    #[serde(rename = "where")]
    pub where_clause: Option<Operator>,

    /// Sort keys, most significant first
    pub order_by: Vec<Order>,

    /// Maximum number of results (`{DAV:}limit/{DAV:}nresults`)
    pub limit: Option<usize>,
}

/// A collection root plus recursion depth.
///
/// `href` is already resolved: an absolute path (or absolute URI)
/// without `.` or `..` segments. The parser produces it through
/// [`resolve_href`](crate::core::parser::resolve_href); `new` stores
/// the value as given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scope {
    pub href: String,
    pub depth: Depth,
}

impl Scope {
    pub fn new(href: impl Into<String>, depth: Depth) -> Self {
        Self {
            href: href.into(),
            depth,
        }
    }
}

/// Search depth below a scope root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Depth {
    /// The scope resource only
    Zero,
    /// The scope and its direct members
    One,
    /// The whole subtree
    #[default]
    Infinity,
}

impl Depth {
    /// Parse a `{DAV:}depth` marker value
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "0" => Some(Depth::Zero),
            "1" => Some(Depth::One),
            "infinity" => Some(Depth::Infinity),
            _ => None,
        }
    }

    /// Wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Depth::Zero => "0",
            Depth::One => "1",
            Depth::Infinity => "infinity",
        }
    }
}

/// Binary comparison kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonKind {
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
    Like,
}

impl ComparisonKind {
    /// Local name of the operator element in the `DAV:` namespace
    pub fn element_name(&self) -> &'static str {
        match self {
            ComparisonKind::Eq => "eq",
            ComparisonKind::Neq => "neq",
            ComparisonKind::Lt => "lt",
            ComparisonKind::Lte => "lte",
            ComparisonKind::Gt => "gt",
            ComparisonKind::Gte => "gte",
            ComparisonKind::Like => "like",
        }
    }
}

/// A `{prop} op literal` leaf
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comparison {
    pub kind: ComparisonKind,
    pub property: QualifiedName,
    pub value: String,
}

/// Filter expression tree
///
/// Every node owns its children. `And` and `Or` always hold at least
/// one operand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum Operator {
    And { operands: Vec<Operator> },
    Or { operands: Vec<Operator> },
    Not { operand: Box<Operator> },
    Comparison(Comparison),
    /// Full-text containment, optionally restricted to one property
    Contains {
        property: Option<QualifiedName>,
        value: String,
    },
    IsDefined { property: QualifiedName },
    IsCollection,
}

impl Operator {
    pub fn and(operands: Vec<Operator>) -> Self {
        Operator::And { operands }
    }

    pub fn or(operands: Vec<Operator>) -> Self {
        Operator::Or { operands }
    }

    pub fn not(operand: Operator) -> Self {
        Operator::Not {
            operand: Box::new(operand),
        }
    }

    pub fn compare(kind: ComparisonKind, property: QualifiedName, value: impl Into<String>) -> Self {
        Operator::Comparison(Comparison {
            kind,
            property,
            value: value.into(),
        })
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

/// One sort key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    pub property: QualifiedName,
    pub direction: Direction,
}

impl Order {
    pub fn new(property: QualifiedName, direction: Direction) -> Self {
        Self {
            property,
            direction,
        }
    }
}

/// A parsed request document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Document {
    Search(SearchQuery),
    Discovery,
}
