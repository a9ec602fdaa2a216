//! Tests for the show-config CLI command

use davsearch::cli::commands::config::{execute, ConfigArgs};
use davsearch::cli::OutputFormat;
use davsearch::core::config::Config;

#[test]
fn test_show_config_human() {
    let result = execute(ConfigArgs { all: false }, &Config::default(), OutputFormat::Human);
    assert!(result.is_ok());
}

#[test]
fn test_show_config_json_with_paths() {
    let mut config = Config::default();
    config.server.base_uri = Some("https://cloud.example/remote.php/search".to_string());

    let result = execute(ConfigArgs { all: true }, &config, OutputFormat::Json);
    assert!(result.is_ok());
}
