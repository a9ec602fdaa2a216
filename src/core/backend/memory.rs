//! In-memory reference backend.
//!
//! Holds a flat list of resources loaded from a JSON fixture:
//!
//! ```json
//! {
//!   "arbiter_path": "/search",
//!   "scopes": [{ "href": "/files/", "depth": "infinity" }],
//!   "properties": [
//!     { "name": "{DAV:}displayname", "type": "string" },
//!     { "name": "{DAV:}getcontentlength", "type": "nonNegativeInteger", "sortable": false }
//!   ],
//!   "nodes": [
//!     { "href": "/files/", "collection": true, "properties": { "{DAV:}displayname": "files" } },
//!     { "href": "/files/a.txt", "properties": { "{DAV:}getcontentlength": 12 } }
//!   ]
//! }
//! ```

use crate::core::backend::filter::{Filter, TypedValue};
use crate::core::backend::{
    BackendError, PropertyType, SearchBackend, SearchPropertyDefinition, SearchResult,
};
use crate::core::error::{DavSearchError, Result};
use crate::core::parser::href_path;
use crate::core::query::{Depth, Direction, Order, QualifiedName, Scope, SearchQuery};
use async_trait::async_trait;
use serde::Deserialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::debug;

/// A resource known to the memory backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryNode {
    pub href: String,
    pub collection: bool,
    pub properties: BTreeMap<QualifiedName, String>,
}

impl MemoryNode {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            collection: false,
            properties: BTreeMap::new(),
        }
    }

    pub fn collection(mut self) -> Self {
        self.collection = true;
        self
    }

    pub fn with_property(mut self, name: QualifiedName, value: impl Into<String>) -> Self {
        self.properties.insert(name, value.into());
        self
    }

    pub fn property(&self, name: &QualifiedName) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }
}

/// Backend over a fixed set of [`MemoryNode`]s
#[derive(Debug, Clone)]
pub struct MemoryBackend {
    arbiter_path: String,
    scopes: Vec<Scope>,
    definitions: Vec<SearchPropertyDefinition>,
    nodes: Vec<MemoryNode>,
}

#[derive(Deserialize)]
struct Fixture {
    arbiter_path: String,
    #[serde(default)]
    scopes: Vec<FixtureScope>,
    #[serde(default)]
    properties: Vec<FixtureProperty>,
    #[serde(default)]
    nodes: Vec<FixtureNode>,
}

#[derive(Deserialize)]
struct FixtureScope {
    href: String,
    depth: Option<String>,
}

#[derive(Deserialize)]
struct FixtureProperty {
    name: String,
    #[serde(rename = "type", default)]
    data_type: PropertyType,
    #[serde(default = "default_true")]
    searchable: bool,
    #[serde(default = "default_true")]
    selectable: bool,
    #[serde(default = "default_true")]
    sortable: bool,
}

#[derive(Deserialize)]
struct FixtureNode {
    href: String,
    #[serde(default)]
    collection: bool,
    #[serde(default)]
    properties: BTreeMap<String, serde_json::Value>,
}

fn default_true() -> bool {
    true
}

impl MemoryBackend {
    pub fn new(arbiter_path: impl Into<String>) -> Self {
        Self {
            arbiter_path: arbiter_path.into(),
            scopes: Vec::new(),
            definitions: Vec::new(),
            nodes: Vec::new(),
        }
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scopes.push(scope);
        self
    }

    pub fn with_definition(mut self, definition: SearchPropertyDefinition) -> Self {
        self.definitions.push(definition);
        self
    }

    pub fn with_node(mut self, node: MemoryNode) -> Self {
        self.nodes.push(node);
        self
    }

    /// Load a fixture file
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            DavSearchError::InvalidFixture(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::from_json(&json)
    }

    /// Build a backend from fixture JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let fixture: Fixture = serde_json::from_str(json)?;

        let mut backend = Self::new(fixture.arbiter_path);

        for scope in fixture.scopes {
            let depth = match scope.depth.as_deref() {
                Some(marker) => Depth::parse(marker).ok_or_else(|| {
                    DavSearchError::InvalidFixture(format!(
                        "Invalid depth '{marker}' for scope {}",
                        scope.href
                    ))
                })?,
                None => Depth::Infinity,
            };
            backend.scopes.push(Scope::new(scope.href, depth));
        }

        for property in fixture.properties {
            let name = clark(&property.name)?;
            backend.definitions.push(SearchPropertyDefinition {
                name,
                data_type: property.data_type,
                searchable: property.searchable,
                selectable: property.selectable,
                sortable: property.sortable,
            });
        }

        for node in fixture.nodes {
            let mut memory_node = MemoryNode::new(node.href);
            memory_node.collection = node.collection;
            for (name, value) in node.properties {
                let text = match value {
                    serde_json::Value::Null => continue,
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                };
                memory_node.properties.insert(clark(&name)?, text);
            }
            backend.nodes.push(memory_node);
        }

        Ok(backend)
    }

    fn definitions_by_name(&self) -> HashMap<QualifiedName, SearchPropertyDefinition> {
        self.definitions
            .iter()
            .map(|d| (d.name.clone(), d.clone()))
            .collect()
    }

    /// Every query scope must lie inside one of the configured roots.
    fn check_scopes(&self, scopes: &[Scope]) -> std::result::Result<(), BackendError> {
        if self.scopes.is_empty() {
            return Ok(());
        }
        for scope in scopes {
            let path = href_path(&scope.href);
            if !self.scopes.iter().any(|root| in_scope(path, root)) {
                return Err(BackendError::Forbidden(format!(
                    "{} is outside the searchable collections",
                    scope.href
                )));
            }
        }
        Ok(())
    }

    fn sort_keys(
        &self,
        order_by: &[Order],
        definitions: &HashMap<QualifiedName, SearchPropertyDefinition>,
    ) -> std::result::Result<Vec<(QualifiedName, PropertyType, Direction)>, BackendError> {
        order_by
            .iter()
            .map(|order| {
                let definition = definitions.get(&order.property).ok_or_else(|| {
                    BackendError::Failed(format!(
                        "Property {} is not declared by this backend",
                        order.property
                    ))
                })?;
                if !definition.sortable {
                    return Err(BackendError::Failed(format!(
                        "Property {} is not sortable",
                        order.property
                    )));
                }
                Ok((order.property.clone(), definition.data_type, order.direction))
            })
            .collect()
    }

    /// Project a node onto the selected properties. An empty selection
    /// returns every selectable property the node carries.
    fn project(
        &self,
        node: &MemoryNode,
        select: &[QualifiedName],
        definitions: &HashMap<QualifiedName, SearchPropertyDefinition>,
    ) -> SearchResult {
        let mut result = SearchResult::new(node.href.clone());

        if select.is_empty() {
            for definition in self.definitions.iter().filter(|d| d.selectable) {
                if let Some(value) = node.property(&definition.name) {
                    result
                        .properties
                        .insert(definition.name.clone(), Some(value.to_string()));
                }
            }
            return result;
        }

        for name in select {
            let value = definitions
                .get(name)
                .filter(|d| d.selectable)
                .and_then(|_| node.property(name))
                .map(str::to_string);
            result.properties.insert(name.clone(), value);
        }
        result
    }
}

#[async_trait]
impl SearchBackend for MemoryBackend {
    fn arbiter_path(&self) -> String {
        self.arbiter_path.clone()
    }

    fn property_definitions(&self) -> Vec<SearchPropertyDefinition> {
        self.definitions.clone()
    }

    fn supported_scopes(&self) -> Vec<Scope> {
        self.scopes.clone()
    }

    async fn search(
        &self,
        query: &SearchQuery,
    ) -> std::result::Result<Vec<SearchResult>, BackendError> {
        self.check_scopes(&query.from)?;

        let definitions = self.definitions_by_name();
        let filter = query
            .where_clause
            .as_ref()
            .map(|operator| Filter::compile(operator, &definitions))
            .transpose()?;
        let sort_keys = self.sort_keys(&query.order_by, &definitions)?;

        let mut matched: Vec<&MemoryNode> = self
            .nodes
            .iter()
            .filter(|node| {
                query
                    .from
                    .iter()
                    .any(|scope| in_scope(&node.href, scope))
            })
            .filter(|node| filter.as_ref().is_none_or(|f| f.matches(node)))
            .collect();

        matched.sort_by(|a, b| compare_nodes(a, b, &sort_keys));

        if let Some(limit) = query.limit {
            matched.truncate(limit);
        }

        debug!(
            scopes = query.from.len(),
            matched = matched.len(),
            "Memory backend evaluated query"
        );

        Ok(matched
            .into_iter()
            .map(|node| self.project(node, &query.select, &definitions))
            .collect())
    }
}

fn clark(name: &str) -> Result<QualifiedName> {
    QualifiedName::from_clark(name).ok_or_else(|| {
        DavSearchError::InvalidFixture(format!("'{name}' is not a Clark-notation property name"))
    })
}

/// Whether `href` lies within `scope` at the scope's depth
fn in_scope(href: &str, scope: &Scope) -> bool {
    let root = trim_path(href_path(&scope.href));
    let path = trim_path(href_path(href));

    if path == root {
        return true;
    }
    match scope.depth {
        Depth::Zero => false,
        Depth::One => path.rfind('/').is_some_and(|idx| &path[..idx] == root),
        Depth::Infinity => path
            .strip_prefix(root)
            .is_some_and(|rest| rest.starts_with('/')),
    }
}

fn trim_path(path: &str) -> &str {
    path.trim_end_matches('/')
}

/// Missing values sort last in either direction; ties fall back to href.
fn compare_nodes(
    a: &MemoryNode,
    b: &MemoryNode,
    keys: &[(QualifiedName, PropertyType, Direction)],
) -> Ordering {
    for (name, data_type, direction) in keys {
        let left = a.property(name).and_then(|v| TypedValue::parse(*data_type, v));
        let right = b.property(name).and_then(|v| TypedValue::parse(*data_type, v));

        let ordering = match (left, right) {
            (Some(l), Some(r)) => {
                let ordering = l.compare(&r).unwrap_or(Ordering::Equal);
                match direction {
                    Direction::Ascending => ordering,
                    Direction::Descending => ordering.reverse(),
                }
            }
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };

        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    a.href.cmp(&b.href)
}
