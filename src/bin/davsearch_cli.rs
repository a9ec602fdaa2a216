//! davsearch CLI - run DASL basic search queries from the command line
//!
//! # Examples
//!
//! ```bash
//! # Show the typed form of a query
//! davsearch parse query.xml
//!
//! # Evaluate a query against a fixture
//! davsearch search query.xml --fixture fixture.json
//!
//! # List searchable properties
//! davsearch discover --fixture fixture.json --format json
//! ```

use clap::Parser;
use davsearch::cli::output::print_error;
use davsearch::cli::{exit_code, run, Cli};

#[tokio::main]
async fn main() {
    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "davsearch=warn".into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        print_error(&e.to_string());
        std::process::exit(exit_code(e.as_ref()));
    }
}
