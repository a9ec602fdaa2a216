//! Search command - run a query document against a fixture

use super::{load_backend, read_document};
use crate::cli::output::colors;
use crate::cli::OutputFormat;
use crate::core::backend::SearchResult;
use crate::core::config::Config;
use crate::core::error::{BackendError, DavSearchError, ParseFailure};
use crate::core::response::serialize;
use crate::core::search::{DavRequest, Dispatch, Outcome, SearchEngine};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

/// Arguments for the search command
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// searchrequest document (`-` reads stdin)
    pub file: PathBuf,

    /// JSON fixture for the in-memory backend (defaults to backend.fixture)
    #[arg(long, short = 'f')]
    pub fixture: Option<PathBuf>,

    /// Base URI for resolving relative scope hrefs (defaults to the arbiter path)
    #[arg(long)]
    pub base_uri: Option<String>,

    /// Only show matching hrefs
    #[arg(long)]
    pub hrefs_only: bool,
}

/// Search response
#[derive(Debug, Serialize)]
pub struct SearchOutput<'a> {
    pub status: u16,
    pub total_results: usize,
    pub results: &'a [SearchResult],
}

/// Execute the search command
pub async fn execute(
    args: SearchArgs,
    config: Config,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let backend = load_backend(args.fixture.as_ref(), &config)?;
    let engine = SearchEngine::new(Arc::new(backend))
        .with_timeout(config.request_timeout())
        .with_max_depth(config.limits.max_nesting_depth);

    let body = read_document(&args.file)
        .map_err(|e| format!("Failed to read {}: {e}", args.file.display()))?;

    let arbiter = engine.arbiter_path();
    let base_uri = args
        .base_uri
        .or_else(|| config.server.base_uri.clone())
        .unwrap_or_else(|| arbiter.clone());
    let request = DavRequest::search(arbiter, Some("application/xml"), body).with_base_uri(base_uri);

    let outcome = match engine.process(&request).await {
        Dispatch::Handled(outcome) => outcome,
        Dispatch::PassThrough(reason) => {
            return Err(format!("Request was not handled: {reason:?}").into())
        }
    };

    let results = match &outcome {
        Outcome::MultiStatus { results, .. } => results.as_slice(),
        Outcome::Discovery(_) => &[],
        Outcome::BadRequest(message) => {
            return Err(DavSearchError::from(ParseFailure::new(message.clone())).into())
        }
        Outcome::Forbidden(message) => {
            return Err(DavSearchError::from(BackendError::Forbidden(message.clone())).into())
        }
        Outcome::ServerError(message) => {
            return Err(DavSearchError::from(BackendError::Failed(message.clone())).into())
        }
    };

    match format {
        OutputFormat::Human if args.hrefs_only => {
            for result in results {
                println!("{}", colors::href(&result.href));
            }
        }
        OutputFormat::Human => {
            let response = serialize(&outcome);
            if response.status != outcome.status() {
                return Err(response.body_text().into_owned().into());
            }
            eprintln!(
                "{} {}",
                colors::success(&response.status.to_string()),
                colors::dim(&format!("{} result(s)", results.len()))
            );
            println!("{}", response.body_text());
        }
        OutputFormat::Json => {
            let output = SearchOutput {
                status: outcome.status(),
                total_results: results.len(),
                results,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
