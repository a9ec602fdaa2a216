//! Discover command - show the query schema a fixture advertises

use super::load_backend;
use crate::cli::output::colors;
use crate::cli::OutputFormat;
use crate::core::config::Config;
use crate::core::response::render_discovery;
use crate::core::search::discover;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the discover command
#[derive(Args, Debug)]
pub struct DiscoverArgs {
    /// JSON fixture for the in-memory backend (defaults to backend.fixture)
    #[arg(long, short = 'f')]
    pub fixture: Option<PathBuf>,

    /// Print the multistatus document instead of a property table
    #[arg(long)]
    pub xml: bool,
}

/// Execute the discover command
pub fn execute(
    args: DiscoverArgs,
    config: Config,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let backend = load_backend(args.fixture.as_ref(), &config)?;
    let document = discover(&backend);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&document)?);
        }
        OutputFormat::Human if args.xml => {
            let body = render_discovery(&document)?;
            println!("{}", String::from_utf8_lossy(&body));
        }
        OutputFormat::Human => {
            println!("{}", colors::label("Scopes:"));
            for scope in &document.scopes {
                println!(
                    "  {} {}",
                    colors::href(&scope.href),
                    colors::dim(&format!("(depth {})", scope.depth.as_str()))
                );
            }

            println!("\n{}", colors::label("Properties:"));
            if document.properties.is_empty() {
                println!("  {}", colors::dim("(none)"));
            }
            for definition in &document.properties {
                println!(
                    "  {} {} {}",
                    colors::property(&definition.name.to_string()),
                    colors::dim(&format!("xs:{}", definition.data_type.xsd_name())),
                    capability_flags(
                        definition.searchable,
                        definition.selectable,
                        definition.sortable
                    )
                );
            }

            println!("\n{}", colors::label("Operators:"));
            println!("  {}", document.operators.join(", "));
        }
    }

    Ok(())
}

/// Compact `where/select/order` marker, `-` for missing capabilities
fn capability_flags(searchable: bool, selectable: bool, sortable: bool) -> String {
    let flag = |on: bool, name: &'static str| if on { name } else { "-" };
    format!(
        "[{} {} {}]",
        flag(searchable, "where"),
        flag(selectable, "select"),
        flag(sortable, "order")
    )
}
