//! Parse command - show the typed form of a query document

use super::{read_document, DEFAULT_BASE_URI};
use crate::cli::output::colors;
use crate::cli::OutputFormat;
use crate::core::error::DavSearchError;
use crate::core::parser;
use crate::core::query::{Direction, Document, Operator, SearchQuery};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

/// Arguments for the parse command
#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Query document (`-` reads stdin)
    pub file: PathBuf,

    /// Base URI for resolving relative scope hrefs
    #[arg(long, default_value = DEFAULT_BASE_URI)]
    pub base_uri: String,
}

/// JSON shape of a parsed document
#[derive(Debug, Serialize)]
#[serde(tag = "document", rename_all = "kebab-case")]
pub enum ParseOutput<'a> {
    Searchrequest { query: &'a SearchQuery },
    QuerySchemaDiscovery,
}

/// Execute the parse command
pub fn execute(args: ParseArgs, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let body = read_document(&args.file)
        .map_err(|e| format!("Failed to read {}: {e}", args.file.display()))?;
    let document = parser::parse(&body, &args.base_uri).map_err(DavSearchError::from)?;

    match format {
        OutputFormat::Human => match &document {
            Document::Search(query) => print_query(query),
            Document::Discovery => println!("{}", colors::label("query-schema-discovery")),
        },
        OutputFormat::Json => {
            let output = match &document {
                Document::Search(query) => ParseOutput::Searchrequest { query },
                Document::Discovery => ParseOutput::QuerySchemaDiscovery,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

fn print_query(query: &SearchQuery) {
    println!("{}", colors::label("basicsearch"));

    if query.select.is_empty() {
        println!("  select:   {}", colors::dim("allprop"));
    } else {
        println!("  select:");
        for name in &query.select {
            println!("    {}", colors::property(&name.to_string()));
        }
    }

    println!("  from:");
    for scope in &query.from {
        println!(
            "    {} {}",
            colors::href(&scope.href),
            colors::dim(&format!("(depth {})", scope.depth.as_str()))
        );
    }

    match &query.where_clause {
        Some(operator) => println!("  where:    {}", describe_operator(operator)),
        None => println!("  where:    {}", colors::dim("(match all)")),
    }

    if !query.order_by.is_empty() {
        let keys: Vec<String> = query
            .order_by
            .iter()
            .map(|order| {
                let direction = match order.direction {
                    Direction::Ascending => "asc",
                    Direction::Descending => "desc",
                };
                format!("{} {direction}", order.property)
            })
            .collect();
        println!("  order by: {}", keys.join(", "));
    }

    if let Some(limit) = query.limit {
        println!("  limit:    {}", colors::number(&limit.to_string()));
    }
}

/// Render a filter tree as a single-line prefix expression
pub fn describe_operator(operator: &Operator) -> String {
    match operator {
        Operator::And { operands } => describe_group("and", operands),
        Operator::Or { operands } => describe_group("or", operands),
        Operator::Not { operand } => format!("not({})", describe_operator(operand)),
        Operator::Comparison(comparison) => format!(
            "{}({}, {:?})",
            comparison.kind.element_name(),
            comparison.property,
            comparison.value
        ),
        Operator::Contains {
            property: Some(property),
            value,
        } => format!("contains({property}, {value:?})"),
        Operator::Contains {
            property: None,
            value,
        } => format!("contains({value:?})"),
        Operator::IsDefined { property } => format!("is-defined({property})"),
        Operator::IsCollection => "is-collection()".to_string(),
    }
}

fn describe_group(name: &str, operands: &[Operator]) -> String {
    let inner: Vec<String> = operands.iter().map(describe_operator).collect();
    format!("{name}({})", inner.join(", "))
}
