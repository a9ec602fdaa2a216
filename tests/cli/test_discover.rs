//! Tests for the discover CLI command

use crate::common::write_fixture;
use davsearch::cli::commands::discover::{execute, DiscoverArgs};
use davsearch::cli::OutputFormat;
use davsearch::core::config::Config;

#[test]
fn test_discover_all_formats() {
    let fixture = write_fixture();

    for (format, xml) in [
        (OutputFormat::Human, false),
        (OutputFormat::Human, true),
        (OutputFormat::Json, false),
    ] {
        let args = DiscoverArgs {
            fixture: Some(fixture.path().to_path_buf()),
            xml,
        };
        let result = execute(args, Config::default(), format);
        assert!(result.is_ok(), "Discover should succeed: {:?}", result.err());
    }
}

#[test]
fn test_invalid_fixture_is_error() {
    let fixture = crate::common::write_query(r#"{ "scopes": [] }"#);

    let args = DiscoverArgs {
        fixture: Some(fixture.path().to_path_buf()),
        xml: false,
    };
    assert!(execute(args, Config::default(), OutputFormat::Human).is_err());
}
