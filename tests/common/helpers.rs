// Test helper functions

use super::fixtures::FIXTURE_JSON;
use davsearch::core::backend::MemoryBackend;
use davsearch::core::config::Config;
use davsearch::core::services::Services;
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

/// Services over the fixture backend with default configuration
#[allow(dead_code)] // Used in integration tests
pub fn create_test_services() -> Arc<Services> {
    create_test_services_with(Config::default())
}

/// Services over the fixture backend with custom configuration
#[allow(dead_code)]
pub fn create_test_services_with(config: Config) -> Arc<Services> {
    let backend = MemoryBackend::from_json(FIXTURE_JSON).expect("fixture JSON is valid");
    Arc::new(Services::with_backend(config, Arc::new(backend)))
}

/// Builder for `searchrequest` bodies
#[allow(dead_code)]
#[derive(Debug, Clone, Default)]
pub struct SearchBody {
    select: Vec<String>,
    scope: String,
    depth: Option<String>,
    where_xml: Option<String>,
    orderby_xml: Option<String>,
    limit: Option<String>,
}

#[allow(dead_code)]
impl SearchBody {
    /// Select one property, written as an element inside `<d:prop>`
    pub fn select(mut self, prop_xml: &str) -> Self {
        self.select.push(prop_xml.to_string());
        self
    }

    pub fn depth(mut self, depth: &str) -> Self {
        self.depth = Some(depth.to_string());
        self
    }

    /// Raw operator XML placed inside `<d:where>`
    pub fn filter(mut self, operator_xml: &str) -> Self {
        self.where_xml = Some(operator_xml.to_string());
        self
    }

    /// Raw `<d:order>` elements placed inside `<d:orderby>`
    pub fn order(mut self, order_xml: &str) -> Self {
        self.orderby_xml = Some(order_xml.to_string());
        self
    }

    pub fn limit(mut self, nresults: &str) -> Self {
        self.limit = Some(nresults.to_string());
        self
    }

    pub fn build(&self) -> String {
        let select = if self.select.is_empty() {
            "<d:allprop/>".to_string()
        } else {
            format!("<d:prop>{}</d:prop>", self.select.concat())
        };
        let depth = self
            .depth
            .as_ref()
            .map(|d| format!("<d:depth>{d}</d:depth>"))
            .unwrap_or_default();
        let filter = self
            .where_xml
            .as_ref()
            .map(|w| format!("<d:where>{w}</d:where>"))
            .unwrap_or_default();
        let order = self
            .orderby_xml
            .as_ref()
            .map(|o| format!("<d:orderby>{o}</d:orderby>"))
            .unwrap_or_default();
        let limit = self
            .limit
            .as_ref()
            .map(|n| format!("<d:limit><d:nresults>{n}</d:nresults></d:limit>"))
            .unwrap_or_default();

        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<d:searchrequest xmlns:d="DAV:" xmlns:oc="http://owncloud.org/ns">
  <d:basicsearch>
    <d:select>{select}</d:select>
    <d:from><d:scope><d:href>{scope}</d:href>{depth}</d:scope></d:from>
    {filter}
    {order}
    {limit}
  </d:basicsearch>
</d:searchrequest>"#,
            scope = self.scope,
        )
    }
}

/// Start a search body over `scope`
#[allow(dead_code)]
pub fn search_body(scope: &str) -> SearchBody {
    SearchBody {
        scope: scope.to_string(),
        ..SearchBody::default()
    }
}

/// Write a query document to a temporary file
#[allow(dead_code)]
pub fn write_query(body: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(body.as_bytes())
        .expect("Failed to write query");
    file
}
