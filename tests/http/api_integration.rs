//! Integration tests for the davsearch HTTP adapter
//!
//! Exercises SEARCH, OPTIONS and PROPFIND through the router, including
//! the pass-through and body limit paths.

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use davsearch::core::config::Config;
use davsearch::http;
use tower::ServiceExt as TowerServiceExt;

use crate::common::helpers::create_test_services_with;
use crate::common::{create_test_services, search_body, ARBITER};

/// Create a test application over the fixture backend
fn create_test_app() -> Router {
    http::router(create_test_services())
}

fn search_request(path: &str, content_type: &str, body: String) -> Request<Body> {
    Request::builder()
        .method("SEARCH")
        .uri(path)
        .header("content-type", content_type)
        .body(Body::from(body))
        .unwrap()
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let response = create_test_app()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_search_returns_multistatus() {
    let body = search_body("/files/alice/")
        .select("<d:displayname/>")
        .filter("<d:like><d:prop><d:displayname/></d:prop><d:literal>photo%</d:literal></d:like>")
        .build();

    let response = create_test_app()
        .oneshot(search_request(ARBITER, "text/xml; charset=\"utf-8\"", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::MULTI_STATUS);
    assert_eq!(
        response.headers()["content-type"],
        "application/xml; charset=utf-8"
    );

    let xml = body_string(response).await;
    assert!(xml.contains("<d:href>/files/alice/photo.jpg</d:href>"));
    assert!(xml.contains("<d:displayname>photo.jpg</d:displayname>"));
    assert!(xml.contains("<d:status>HTTP/1.1 200 OK</d:status>"));
}

#[tokio::test]
async fn test_search_trailing_slash_is_not_arbiter() {
    let body = search_body("/files/alice/").limit("1").build();
    let path = format!("{ARBITER}/");

    let response = create_test_app()
        .oneshot(search_request(&path, "application/xml", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers()["allow"], "OPTIONS, PROPFIND");
}

#[tokio::test]
async fn test_parse_error_is_bad_request() {
    let response = create_test_app()
        .oneshot(search_request(
            ARBITER,
            "text/xml",
            r#"<d:searchrequest xmlns:d="DAV:"><d:basicsearch/></d:searchrequest>"#.to_string(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_string(response).await,
        "Parse error: Missing {DAV:}from when parsing {DAV:}basicsearch"
    );
}

#[tokio::test]
async fn test_forbidden_scope() {
    let body = search_body("/files/bob/").build();

    let response = create_test_app()
        .oneshot(search_request(ARBITER, "text/xml", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_non_xml_body_is_unsupported_media_type() {
    let response = create_test_app()
        .oneshot(search_request(
            ARBITER,
            "application/json",
            r#"{"query": "report"}"#.to_string(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn test_search_elsewhere_is_method_not_allowed() {
    let body = search_body("/files/alice/").build();

    let response = create_test_app()
        .oneshot(search_request("/files/alice/", "text/xml", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers()["allow"], "OPTIONS, PROPFIND");
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let mut config = Config::default();
    config.limits.max_body_bytes = 64;
    let app = http::router(create_test_services_with(config));

    let body = search_body("/files/alice/").build();
    assert!(body.len() > 64);

    let response = app
        .oneshot(search_request(ARBITER, "text/xml", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_options_on_arbiter_advertises_dasl() {
    let response = create_test_app()
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri(ARBITER)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["dasl"], "<DAV:basicsearch>");
    assert_eq!(response.headers()["allow"], "OPTIONS, PROPFIND, SEARCH");
}

#[tokio::test]
async fn test_options_elsewhere_has_no_dasl() {
    let response = create_test_app()
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/files/alice/")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get("dasl").is_none());
}

#[tokio::test]
async fn test_propfind_on_arbiter_lists_grammar() {
    let response = create_test_app()
        .oneshot(
            Request::builder()
                .method("PROPFIND")
                .uri(ARBITER)
                .header("depth", "0")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::MULTI_STATUS);

    let xml = body_string(response).await;
    assert!(xml.contains("<d:supported-query-grammar-set>"));
    assert!(xml.contains("<d:basicsearch/>"));
}

#[tokio::test]
async fn test_propfind_elsewhere_is_not_found() {
    let response = create_test_app()
        .oneshot(
            Request::builder()
                .method("PROPFIND")
                .uri("/files/alice/")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_other_methods_not_allowed() {
    let response = create_test_app()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(ARBITER)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers()["allow"], "OPTIONS, PROPFIND, SEARCH");
}
