//! Search pipeline tests against the fixture backend

use crate::common::{fixture_backend, search_body, ARBITER};
use davsearch::core::backend::{SearchBackend, SearchResult};
use davsearch::core::query::QualifiedName;
use davsearch::core::search::{DavRequest, Dispatch, Outcome, PassThroughReason, SearchEngine};
use proptest::prelude::*;
use std::sync::Arc;

fn engine() -> SearchEngine {
    SearchEngine::new(Arc::new(fixture_backend()))
}

async fn run(body: &str) -> Outcome {
    let request = DavRequest::search(ARBITER, Some("text/xml; charset=utf-8"), body);
    match engine().process(&request).await {
        Dispatch::Handled(outcome) => outcome,
        Dispatch::PassThrough(reason) => panic!("unexpected pass-through: {reason:?}"),
    }
}

async fn results(body: &str) -> Vec<SearchResult> {
    match run(body).await {
        Outcome::MultiStatus { results, .. } => results,
        other => panic!("expected multistatus, got {other:?}"),
    }
}

fn hrefs(results: &[SearchResult]) -> Vec<&str> {
    results.iter().map(|r| r.href.as_str()).collect()
}

#[tokio::test]
async fn test_size_filter_sorted_descending() {
    let body = search_body("/files/alice/")
        .select("<d:displayname/>")
        .filter("<d:gt><d:prop><d:getcontentlength/></d:prop><d:literal>1000</d:literal></d:gt>")
        .order("<d:order><d:prop><d:getcontentlength/></d:prop><d:descending/></d:order>")
        .build();

    let results = results(&body).await;
    assert_eq!(
        hrefs(&results),
        vec![
            "/files/alice/photo.jpg",
            "/files/alice/Documents/report.pdf",
            "/files/alice/Documents/notes.txt",
        ]
    );
}

#[tokio::test]
async fn test_like_is_case_insensitive() {
    let body = search_body("/files/alice/")
        .filter("<d:like><d:prop><d:displayname/></d:prop><d:literal>%.TXT</d:literal></d:like>")
        .build();

    assert_eq!(
        hrefs(&results(&body).await),
        vec!["/files/alice/Documents/notes.txt"]
    );
}

#[tokio::test]
async fn test_depth_one_excludes_grandchildren() {
    let body = search_body("/files/alice/")
        .depth("1")
        .filter("<d:not><d:is-collection/></d:not>")
        .build();

    assert_eq!(
        hrefs(&results(&body).await),
        vec!["/files/alice/Readme.md", "/files/alice/photo.jpg"]
    );
}

#[tokio::test]
async fn test_dates_compare_across_formats() {
    let body = search_body("/files/alice/")
        .filter(
            "<d:gte><d:prop><d:getlastmodified/></d:prop>\
             <d:literal>2024-01-01T00:00:00Z</d:literal></d:gte>",
        )
        .order("<d:order><d:prop><d:getlastmodified/></d:prop></d:order>")
        .build();

    assert_eq!(
        hrefs(&results(&body).await),
        vec![
            "/files/alice/Documents/report.pdf",
            "/files/alice/Documents/notes.txt",
        ]
    );
}

#[tokio::test]
async fn test_limit_applies_after_ordering() {
    let body = search_body("/files/alice/")
        .filter("<d:not><d:is-collection/></d:not>")
        .order("<d:order><d:prop><d:getcontentlength/></d:prop><d:ascending/></d:order>")
        .limit("2")
        .build();

    assert_eq!(
        hrefs(&results(&body).await),
        vec!["/files/alice/Readme.md", "/files/alice/Documents/notes.txt"]
    );
}

#[tokio::test]
async fn test_explicit_select_reports_missing_values() {
    let body = search_body("/files/alice/")
        .select("<oc:favorite/>")
        .select("<oc:owner-id/>")
        .filter("<d:eq><d:prop><d:displayname/></d:prop><d:literal>REPORT.PDF</d:literal></d:eq>")
        .build();

    let results = results(&body).await;
    assert_eq!(results.len(), 1);

    let favorite = QualifiedName::new("http://owncloud.org/ns", "favorite");
    let owner = QualifiedName::new("http://owncloud.org/ns", "owner-id");
    assert_eq!(results[0].properties[&favorite], Some("true".to_string()));
    // Not selectable, so never disclosed
    assert_eq!(results[0].properties[&owner], None);
}

#[tokio::test]
async fn test_contains_searches_every_searchable_property() {
    let body = search_body("/files/alice/")
        .filter("<d:contains>JPEG</d:contains>")
        .build();

    assert_eq!(hrefs(&results(&body).await), vec!["/files/alice/photo.jpg"]);
}

#[tokio::test]
async fn test_scope_outside_roots_is_forbidden() {
    let body = search_body("/files/bob/").build();
    match run(&body).await {
        Outcome::Forbidden(message) => {
            assert_eq!(message, "/files/bob/ is outside the searchable collections")
        }
        other => panic!("expected forbidden, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unsearchable_property_is_server_error() {
    let body = search_body("/files/alice/")
        .filter("<d:eq><d:prop><d:getetag/></d:prop><d:literal>\"r1\"</d:literal></d:eq>")
        .build();

    assert_eq!(
        run(&body).await,
        Outcome::ServerError("Property {DAV:}getetag is not searchable".to_string())
    );
}

#[tokio::test]
async fn test_parse_failure_is_bad_request() {
    let outcome = run("<d:searchrequest xmlns:d=\"DAV:\"/>").await;
    assert_eq!(
        outcome,
        Outcome::BadRequest("Missing {DAV:}basicsearch in {DAV:}searchrequest".to_string())
    );
    assert_eq!(outcome.status(), 400);
}

#[tokio::test]
async fn test_pass_through_checks() {
    let engine = engine();
    let body = search_body("/files/alice/").build();

    let json = DavRequest::search(ARBITER, Some("application/json"), body.clone());
    assert_eq!(
        engine.process(&json).await,
        Dispatch::PassThrough(PassThroughReason::UnsupportedMediaType)
    );

    let elsewhere = DavRequest::search("/files/alice/", Some("text/xml"), body.clone());
    assert_eq!(
        engine.process(&elsewhere).await,
        Dispatch::PassThrough(PassThroughReason::NotArbiterPath)
    );

    let trailing = DavRequest::search(format!("{ARBITER}/"), Some("text/xml"), body);
    assert_eq!(
        engine.process(&trailing).await,
        Dispatch::PassThrough(PassThroughReason::NotArbiterPath)
    );
}

fn plain_text_body() -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![
        prop::collection::vec(any::<u8>(), 0..512),
        ".{0,128}".prop_map(String::into_bytes),
        Just(search_body("/files/alice/").build().into_bytes()),
        Just(br#"<d:query-schema-discovery xmlns:d="DAV:"/>"#.to_vec()),
    ]
}

proptest! {
    #[test]
    fn test_plain_text_bodies_always_pass_through(body in plain_text_body()) {
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let request = DavRequest::search(ARBITER, Some("text/plain"), body);

        prop_assert_eq!(
            runtime.block_on(engine().process(&request)),
            Dispatch::PassThrough(PassThroughReason::UnsupportedMediaType)
        );
    }
}

#[tokio::test]
async fn test_discovery_lists_backend_registry() {
    let body = r#"<d:query-schema-discovery xmlns:d="DAV:"/>"#;
    match run(body).await {
        Outcome::Discovery(document) => {
            let backend = fixture_backend();
            assert_eq!(document.properties, backend.property_definitions());
            assert_eq!(document.scopes, backend.supported_scopes());
            assert!(document.operators.contains(&"like"));
        }
        other => panic!("expected discovery, got {other:?}"),
    }
}
