//! HTTP request handlers for davsearch
//!
//! Bridges axum requests to the protocol-neutral search pipeline and
//! turns [`DavResponse`]s back into HTTP responses.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::debug;

use crate::core::capabilities::{allowed_methods, dasl_header, supported_query_grammar_response};
use crate::core::response::{serialize, DavResponse};
use crate::core::search::{DavRequest, Dispatch, PassThroughReason};
use crate::core::services::Services;

/// Methods this server answers on every path
const BASE_METHODS: [&str; 2] = ["OPTIONS", "PROPFIND"];

/// Health check response body
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Health check handler
///
/// Returns server status and version information.
///
/// # Returns
///
/// JSON response with status "ok" and version number
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// DAV method handler
///
/// Installed as the router fallback so it sees extension methods.
///
/// # Arguments
///
/// * `services` - Shared application state
/// * `request` - The raw request
///
/// # Returns
///
/// - `SEARCH`: the pipeline's answer; `415` when the body is not XML,
///   `405` when the path is not the arbiter collection
/// - `OPTIONS`: `200` with `DAV`, `Allow` and, on the arbiter, `DASL`
/// - `PROPFIND` on the arbiter: the supported query grammar set
/// - anything else: `405`
pub async fn dav_handler(State(services): State<Arc<Services>>, request: Request) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let arbiter = services.engine.arbiter_path();

    match method.as_str() {
        "SEARCH" => search(&services, request).await,
        "OPTIONS" => options(&path, &arbiter),
        "PROPFIND" if services.engine.is_arbiter_path(&path) => {
            into_http_response(supported_query_grammar_response(&path))
        }
        "PROPFIND" => text_response(StatusCode::NOT_FOUND, format!("No resource at {path}")),
        _ => method_not_allowed(&method, &path, &arbiter),
    }
}

async fn search(services: &Services, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let path = parts.uri.path().to_string();

    let body = match to_bytes(body, services.config.limits.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!(path = %path, error = %e, "Rejecting search body");
            return text_response(
                StatusCode::PAYLOAD_TOO_LARGE,
                format!(
                    "Request body exceeds {} bytes",
                    services.config.limits.max_body_bytes
                ),
            );
        }
    };

    let content_type = parts
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let dav_request = DavRequest {
        method: parts.method.to_string(),
        base_uri: services.base_uri_for(&path),
        path: path.clone(),
        content_type,
        body: body.to_vec(),
    };

    match services.engine.process(&dav_request).await {
        Dispatch::Handled(outcome) => into_http_response(serialize(&outcome)),
        Dispatch::PassThrough(PassThroughReason::UnsupportedMediaType) => text_response(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "SEARCH bodies must be text/xml or application/xml",
        ),
        Dispatch::PassThrough(PassThroughReason::NotArbiterPath) => {
            method_not_allowed(&parts.method, &path, &services.engine.arbiter_path())
        }
    }
}

fn options(path: &str, arbiter: &str) -> Response {
    let mut response = StatusCode::OK.into_response();
    let headers = response.headers_mut();

    headers.insert(HeaderName::from_static("dav"), HeaderValue::from_static("1"));
    if let Ok(allow) = HeaderValue::from_str(&allow_header(path, arbiter)) {
        headers.insert(header::ALLOW, allow);
    }
    if let Some((name, value)) = dasl_header(path, arbiter) {
        if let Ok(name) = HeaderName::from_bytes(name.as_bytes()) {
            headers.insert(name, HeaderValue::from_static(value));
        }
    }

    response
}

fn method_not_allowed(method: &Method, path: &str, arbiter: &str) -> Response {
    let mut response = text_response(
        StatusCode::METHOD_NOT_ALLOWED,
        format!("{method} is not supported on {path}"),
    );
    if let Ok(allow) = HeaderValue::from_str(&allow_header(path, arbiter)) {
        response.headers_mut().insert(header::ALLOW, allow);
    }
    response
}

fn allow_header(path: &str, arbiter: &str) -> String {
    let mut methods: Vec<&str> = BASE_METHODS.to_vec();
    methods.extend(allowed_methods(path, arbiter));
    methods.join(", ")
}

fn text_response(status: StatusCode, body: impl Into<String>) -> Response {
    into_http_response(DavResponse::text(status.as_u16(), body))
}

/// Convert a pipeline response into an axum response
pub fn into_http_response(response: DavResponse) -> Response {
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let mut http_response = Response::new(Body::from(response.body));
    *http_response.status_mut() = status;

    let headers = http_response.headers_mut();
    for (name, value) in &response.headers {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            headers.insert(name, value);
        }
    }

    http_response
}
