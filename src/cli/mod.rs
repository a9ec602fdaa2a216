//! CLI adapter for davsearch
//!
//! Runs the search pipeline from the command line: parse query documents,
//! evaluate them against a JSON fixture and inspect the effective
//! configuration. This module is parallel to `http/` - both depend on
//! `core/` but not on each other.
//!
//! # Architecture
//!
//! ```text
//!              +------------------+
//!              |     core/        |
//!              |  (domain logic)  |
//!              +--------+---------+
//!                       |
//!          +------------+------------+
//!          |                         |
//!          v                         v
//! +------------------+      +------------------+
//! |      http/       |      |      cli/        |
//! | (axum adapter)   |      | (clap adapter)   |
//! +------------------+      +------------------+
//! ```

pub mod commands;
pub mod output;

use crate::core::error::DavSearchError;
use clap::{Parser, Subcommand};

/// Exit status for failures without a more specific code
pub const EXIT_FAILURE: i32 = 1;

/// Exit status when the query document is rejected (sysexits `EX_DATAERR`)
pub const EXIT_BAD_QUERY: i32 = 65;

/// Exit status when the backend refuses the query (sysexits `EX_NOPERM`)
pub const EXIT_FORBIDDEN: i32 = 77;

/// davsearch - DASL basic search for DAV servers
///
/// Parse `searchrequest` documents, run them against an in-memory
/// fixture and print the multi-status answer a DAV server would send.
#[derive(Parser, Debug)]
#[command(name = "davsearch")]
#[command(author = "RHOBIMD HEALTH")]
#[command(version)]
#[command(about = "DASL basic search toolkit", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for scripting
    Json,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse a searchrequest document and print the typed query
    Parse(commands::ParseArgs),

    /// Run a searchrequest against a fixture and print the multistatus
    Search(commands::SearchArgs),

    /// Print the query schema a fixture advertises
    Discover(commands::DiscoverArgs),

    /// Show current configuration
    #[command(name = "show-config")]
    ShowConfig(commands::ConfigArgs),

    /// Generate shell completion scripts
    ///
    /// Output completion script to stdout. To install:
    ///
    ///   bash:  davsearch completions bash > ~/.local/share/bash-completion/completions/davsearch
    ///   zsh:   davsearch completions zsh > ~/.zfunc/_davsearch
    ///   fish:  davsearch completions fish > ~/.config/fish/completions/davsearch.fish
    Completions(commands::CompletionsArgs),
}

/// Run the CLI with the provided arguments
pub async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    use crate::core::config::Config;

    // parse and completions work without configuration
    match cli.command {
        Commands::Completions(args) => commands::completions::execute(args),
        Commands::Parse(args) => commands::parse::execute(args, cli.format),
        Commands::Search(args) => {
            let config = Config::load()?;
            commands::search::execute(args, config, cli.format).await
        }
        Commands::Discover(args) => {
            let config = Config::load()?;
            commands::discover::execute(args, config, cli.format)
        }
        Commands::ShowConfig(args) => {
            let config = Config::load()?;
            commands::config::execute(args, &config, cli.format)
        }
    }
}

/// Process exit status for an error returned by [`run`]
pub fn exit_code(err: &(dyn std::error::Error + 'static)) -> i32 {
    match err.downcast_ref::<DavSearchError>() {
        Some(e) if e.is_bad_request() => EXIT_BAD_QUERY,
        Some(e) if e.is_forbidden() => EXIT_FORBIDDEN,
        _ => EXIT_FAILURE,
    }
}
