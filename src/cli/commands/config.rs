//! Config command - show current configuration

use crate::cli::output::colors;
use crate::cli::OutputFormat;
use crate::core::config::Config;
use crate::core::xdg::XdgDirs;
use clap::Args;
use serde::Serialize;

/// Arguments for the show-config command
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Also show the XDG directories searched for config and fixtures
    #[arg(long, short = 'a')]
    pub all: bool,
}

/// Configuration response
#[derive(Debug, Serialize)]
pub struct ConfigResponse<'a> {
    #[serde(flatten)]
    pub config: &'a Config,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paths: Option<PathsOutput>,
}

#[derive(Debug, Serialize)]
pub struct PathsOutput {
    pub config_file: String,
    pub fixture_file: String,
}

/// Execute the show-config command
pub fn execute(
    args: ConfigArgs,
    config: &Config,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let paths = args.all.then(|| {
        let xdg = XdgDirs::new();
        PathsOutput {
            config_file: xdg.config_file().to_string_lossy().into_owned(),
            fixture_file: xdg.fixture_file().to_string_lossy().into_owned(),
        }
    });

    let response = ConfigResponse { config, paths };

    match format {
        OutputFormat::Human => {
            let fixture = config
                .backend
                .fixture
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(none)".to_string());

            println!("{}", colors::label("Configuration:"));
            println!("  server:");
            println!("    listen: {}", config.bind_address());
            println!(
                "    base_uri: {}",
                config.server.base_uri.as_deref().unwrap_or("(request path)")
            );
            println!("  backend:");
            println!("    arbiter_path: {}", colors::href(&config.backend.arbiter_path));
            println!("    fixture: {fixture}");
            println!("  limits:");
            println!(
                "    request_timeout_sec: {}",
                colors::number(&config.limits.request_timeout_sec.to_string())
            );
            println!(
                "    max_body_bytes: {}",
                colors::number(&config.limits.max_body_bytes.to_string())
            );

            if let Some(paths) = &response.paths {
                println!("  paths:");
                println!("    config_file: {}", paths.config_file);
                println!("    fixture_file: {}", paths.fixture_file);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
