// Common test utilities and fixtures

pub mod fixtures;
pub mod helpers;

// Re-export commonly used items
// Note: These may appear unused in unit tests but are used in integration tests
#[allow(unused_imports)]
pub use fixtures::{fixture_backend, write_fixture, ARBITER, FIXTURE_JSON};
#[allow(unused_imports)]
pub use helpers::{create_test_services, search_body, write_query, SearchBody};
