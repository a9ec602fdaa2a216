//! Search backend contract.
//!
//! The search engine never touches storage itself. A backend names the
//! collection that arbitrates searches, describes the properties it can
//! search on, and executes parsed queries.
//!
//! [`MemoryBackend`] is a reference implementation over a JSON fixture.

mod filter;
pub mod memory;

pub use memory::{MemoryBackend, MemoryNode};

pub use crate::core::error::BackendError;

use crate::core::query::{QualifiedName, Scope, SearchQuery};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Storage-side query execution.
///
/// Implementations must be safe to call concurrently; the engine holds
/// a shared reference and issues one `search` per request.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Path of the collection that accepts SEARCH requests
    fn arbiter_path(&self) -> String;

    /// Properties clients may select, search on or sort by
    fn property_definitions(&self) -> Vec<SearchPropertyDefinition>;

    /// Collections this backend can search. Empty means the arbiter
    /// collection itself.
    fn supported_scopes(&self) -> Vec<Scope> {
        Vec::new()
    }

    /// Execute a parsed query
    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>, BackendError>;
}

/// XML Schema type of a searchable property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PropertyType {
    #[default]
    String,
    Integer,
    NonNegativeInteger,
    Decimal,
    DateTime,
    Boolean,
}

impl PropertyType {
    /// Local name in the XML Schema namespace (`xs:` prefix)
    pub fn xsd_name(&self) -> &'static str {
        match self {
            PropertyType::String => "string",
            PropertyType::Integer => "integer",
            PropertyType::NonNegativeInteger => "nonNegativeInteger",
            PropertyType::Decimal => "decimal",
            PropertyType::DateTime => "dateTime",
            PropertyType::Boolean => "boolean",
        }
    }
}

/// Advertised capabilities of one property
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchPropertyDefinition {
    pub name: QualifiedName,
    pub data_type: PropertyType,
    /// May appear in `where`
    pub searchable: bool,
    /// May appear in `select`
    pub selectable: bool,
    /// May appear in `orderby`
    pub sortable: bool,
}

impl SearchPropertyDefinition {
    /// A definition with every capability enabled
    pub fn new(name: QualifiedName, data_type: PropertyType) -> Self {
        Self {
            name,
            data_type,
            searchable: true,
            selectable: true,
            sortable: true,
        }
    }

    pub fn searchable(mut self, searchable: bool) -> Self {
        self.searchable = searchable;
        self
    }

    pub fn selectable(mut self, selectable: bool) -> Self {
        self.selectable = selectable;
        self
    }

    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }
}

/// One matching resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub href: String,

    /// Selected properties. `None` means the property is not present
    /// on this resource.
    pub properties: BTreeMap<QualifiedName, Option<String>>,
}

impl SearchResult {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            properties: BTreeMap::new(),
        }
    }

    pub fn with_property(mut self, name: QualifiedName, value: Option<String>) -> Self {
        self.properties.insert(name, value);
        self
    }
}
