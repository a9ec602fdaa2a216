//! davsearch HTTP server entry point
//!
//! Serves DASL `SEARCH` on the configured arbiter collection.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use davsearch::core::config::Config;
use davsearch::core::services::Services;
use davsearch::core::xdg::XdgDirs;
use davsearch::http;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "davsearch=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting davsearch server");
    tracing::info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let xdg = XdgDirs::new();
    xdg.log_paths();

    // Load configuration
    let config = Config::load_with_xdg(&xdg)?;
    config.log_config();

    let services = Arc::new(Services::new(config.clone())?);
    tracing::info!(
        arbiter = %services.engine.arbiter_path(),
        "Search backend ready"
    );

    let app = http::router(services);

    // Bind to address and start server
    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Listening on {}", addr);
    tracing::info!("Service ready - Health check at http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
