//! Tests for the search CLI command

use crate::common::{search_body, write_fixture, write_query};
use davsearch::cli::commands::search::{execute, SearchArgs};
use davsearch::cli::{exit_code, OutputFormat, EXIT_BAD_QUERY, EXIT_FAILURE, EXIT_FORBIDDEN};
use davsearch::core::config::Config;
use std::path::PathBuf;

fn args(query: PathBuf, fixture: Option<PathBuf>) -> SearchArgs {
    SearchArgs {
        file: query,
        fixture,
        base_uri: None,
        hrefs_only: false,
    }
}

#[tokio::test]
async fn test_search_human() {
    let fixture = write_fixture();
    let query = write_query(
        &search_body("/files/alice/")
            .filter("<d:not><d:is-collection/></d:not>")
            .build(),
    );

    let args = args(query.path().to_path_buf(), Some(fixture.path().to_path_buf()));
    let result = execute(args, Config::default(), OutputFormat::Human).await;
    assert!(result.is_ok(), "Search should succeed: {:?}", result.err());
}

#[tokio::test]
async fn test_search_json_and_hrefs_only() {
    let fixture = write_fixture();
    let query = write_query(&search_body("/files/alice/").limit("2").build());

    let result = execute(
        args(query.path().to_path_buf(), Some(fixture.path().to_path_buf())),
        Config::default(),
        OutputFormat::Json,
    )
    .await;
    assert!(result.is_ok(), "JSON search should succeed: {:?}", result.err());

    let mut hrefs = args(query.path().to_path_buf(), Some(fixture.path().to_path_buf()));
    hrefs.hrefs_only = true;
    let result = execute(hrefs, Config::default(), OutputFormat::Human).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_fixture_from_config() {
    let fixture = write_fixture();
    let query = write_query(&search_body("/files/alice/").build());

    let mut config = Config::default();
    config.backend.fixture = Some(fixture.path().to_path_buf());

    let result = execute(args(query.path().to_path_buf(), None), config, OutputFormat::Json).await;
    assert!(result.is_ok(), "Search should succeed: {:?}", result.err());
}

#[tokio::test]
async fn test_search_without_fixture_fails() {
    let query = write_query(&search_body("/files/alice/").build());

    let err = execute(
        args(query.path().to_path_buf(), None),
        Config::default(),
        OutputFormat::Human,
    )
    .await
    .unwrap_err();
    assert!(err.to_string().starts_with("No fixture given"));
    assert_eq!(exit_code(err.as_ref()), EXIT_FAILURE);
}

#[tokio::test]
async fn test_forbidden_scope_is_error() {
    let fixture = write_fixture();
    let query = write_query(&search_body("/files/bob/").build());

    let err = execute(
        args(query.path().to_path_buf(), Some(fixture.path().to_path_buf())),
        Config::default(),
        OutputFormat::Json,
    )
    .await
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Backend error: Forbidden: /files/bob/ is outside the searchable collections"
    );
    assert_eq!(exit_code(err.as_ref()), EXIT_FORBIDDEN);
}

#[tokio::test]
async fn test_parse_error_is_error() {
    let fixture = write_fixture();
    let query = write_query("<d:searchrequest xmlns:d=\"DAV:\">");

    let err = execute(
        args(query.path().to_path_buf(), Some(fixture.path().to_path_buf())),
        Config::default(),
        OutputFormat::Human,
    )
    .await
    .unwrap_err();
    assert!(err.to_string().starts_with("Parse error: Malformed XML: "));
    assert_eq!(exit_code(err.as_ref()), EXIT_BAD_QUERY);
}
