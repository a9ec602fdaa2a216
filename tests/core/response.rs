//! Response rendering tests
//!
//! Rendered documents are read back with the crate's own XML reader so
//! assertions look at structure, not byte layout.

use crate::common::{fixture_backend, search_body, ARBITER};
use davsearch::core::response::{serialize, STATUS_NOT_FOUND, STATUS_OK, XML_CONTENT_TYPE};
use davsearch::core::search::{DavRequest, Dispatch, SearchEngine};
use davsearch::core::xml::{parse_document, Element};
use std::sync::Arc;

async fn respond(body: &str) -> davsearch::core::response::DavResponse {
    let engine = SearchEngine::new(Arc::new(fixture_backend()));
    let request = DavRequest::search(ARBITER, Some("application/xml"), body);
    match engine.process(&request).await {
        Dispatch::Handled(outcome) => serialize(&outcome),
        Dispatch::PassThrough(reason) => panic!("unexpected pass-through: {reason:?}"),
    }
}

fn statuses(response: &Element) -> Vec<&str> {
    response
        .dav_children("propstat")
        .filter_map(|p| p.dav_child("status"))
        .map(|s| s.text.as_str())
        .collect()
}

#[tokio::test]
async fn test_multistatus_splits_found_and_missing() {
    let body = search_body("/files/alice/")
        .select("<d:displayname/>")
        .select("<d:getlastmodified/>")
        .filter("<d:like><d:prop><d:displayname/></d:prop><d:literal>readme%</d:literal></d:like>")
        .build();

    let response = respond(&body).await;
    assert_eq!(response.status, 207);
    assert_eq!(response.header("Content-Type"), Some(XML_CONTENT_TYPE));

    let root = parse_document(&response.body).unwrap();
    assert!(root.is_dav("multistatus"));

    let responses: Vec<&Element> = root.dav_children("response").collect();
    assert_eq!(responses.len(), 1);
    assert_eq!(
        responses[0].dav_child("href").unwrap().text,
        "/files/alice/Readme.md"
    );
    assert_eq!(statuses(responses[0]), vec![STATUS_OK, STATUS_NOT_FOUND]);

    let missing = responses[0].dav_children("propstat").nth(1).unwrap();
    let prop = missing.dav_child("prop").unwrap();
    assert!(prop.has_dav_child("getlastmodified"));
    assert!(!prop.has_dav_child("displayname"));
}

#[tokio::test]
async fn test_foreign_namespace_property_round_trips() {
    let body = search_body("/files/alice/")
        .select("<oc:favorite/>")
        .filter("<d:eq><d:prop><oc:favorite/></d:prop><d:literal>true</d:literal></d:eq>")
        .build();

    let response = respond(&body).await;
    let root = parse_document(&response.body).unwrap();
    let prop = root
        .dav_child("response")
        .and_then(|r| r.dav_child("propstat"))
        .and_then(|p| p.dav_child("prop"))
        .unwrap();

    assert_eq!(prop.children.len(), 1);
    assert_eq!(
        prop.children[0].name.to_string(),
        "{http://owncloud.org/ns}favorite"
    );
    assert_eq!(prop.children[0].text, "true");
}

#[tokio::test]
async fn test_empty_result_is_empty_multistatus() {
    let body = search_body("/files/alice/")
        .filter("<d:contains>no such text</d:contains>")
        .build();

    let response = respond(&body).await;
    assert_eq!(response.status, 207);

    let root = parse_document(&response.body).unwrap();
    assert!(root.is_dav("multistatus"));
    assert!(root.children.is_empty());
}

#[tokio::test]
async fn test_discovery_document_structure() {
    let response = respond(r#"<d:query-schema-discovery xmlns:d="DAV:"/>"#).await;
    assert_eq!(response.status, 207);

    let root = parse_document(&response.body).unwrap();
    let scope = root.dav_child("response").unwrap();
    assert_eq!(scope.dav_child("href").unwrap().text, "/files/alice/");

    let schema = scope
        .dav_child("query-schema")
        .and_then(|q| q.dav_child("basicsearchschema"))
        .unwrap();
    let propdescs: Vec<&Element> = schema
        .dav_child("properties")
        .unwrap()
        .dav_children("propdesc")
        .collect();
    assert_eq!(propdescs.len(), 7);

    // getetag: selectable only
    let etag = propdescs
        .iter()
        .find(|p| {
            p.dav_child("prop")
                .is_some_and(|prop| prop.has_dav_child("getetag"))
        })
        .unwrap();
    assert!(etag.has_dav_child("selectable"));
    assert!(!etag.has_dav_child("searchable"));
    assert!(!etag.has_dav_child("sortable"));

    assert!(scope
        .dav_child("supported-query-grammar-set")
        .is_some_and(|set| set.has_dav_child("supported-query-grammar")));
}

#[tokio::test]
async fn test_bad_request_is_plain_text() {
    let response = respond("not xml at all").await;
    assert_eq!(response.status, 400);
    assert!(response.body_text().starts_with("Parse error: "));
}
