//! Query schema discovery.
//!
//! Answers `{DAV:}query-schema-discovery` from the backend's property
//! registry. Discovery never fails: an empty registry simply lists no
//! properties.

use crate::core::backend::{SearchBackend, SearchPropertyDefinition};
use crate::core::parser::supported_operators;
use crate::core::query::{Depth, Scope};
use serde::Serialize;

/// Local name of the only supported grammar, in the `DAV:` namespace
pub const BASICSEARCH_GRAMMAR: &str = "basicsearch";

/// What a client may query, per scope
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveryDocument {
    pub scopes: Vec<Scope>,
    /// Backend order is preserved
    pub properties: Vec<SearchPropertyDefinition>,
    pub operators: Vec<&'static str>,
    pub grammar: &'static str,
}

/// Build the discovery answer for `backend`.
///
/// A backend that advertises no scopes is described at its arbiter
/// path with infinite depth.
pub fn discover(backend: &dyn SearchBackend) -> DiscoveryDocument {
    let mut scopes = backend.supported_scopes();
    if scopes.is_empty() {
        scopes.push(Scope::new(backend.arbiter_path(), Depth::Infinity));
    }

    DiscoveryDocument {
        scopes,
        properties: backend.property_definitions(),
        operators: supported_operators(),
        grammar: BASICSEARCH_GRAMMAR,
    }
}
