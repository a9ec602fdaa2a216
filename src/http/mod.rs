//! HTTP adapter
//!
//! Depends only on core/. Never imports from cli/.
//!
//! Serves the search pipeline over axum: a health endpoint plus a
//! fallback handler for the DAV methods (SEARCH, OPTIONS, PROPFIND),
//! which axum cannot route by name.

pub mod handlers;
pub mod middleware;

pub use handlers::*;

use crate::core::services::Services;
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Build the application router
pub fn router(services: Arc<Services>) -> Router {
    Router::new()
        .route("/health", get(handlers::health_handler))
        .fallback(handlers::dav_handler)
        .layer(axum::middleware::from_fn(middleware::log_request))
        .layer(CorsLayer::permissive())
        .with_state(services)
}
