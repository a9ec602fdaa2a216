// Test fixtures: a small file tree for the in-memory backend

use davsearch::core::backend::MemoryBackend;
use std::io::Write;
use tempfile::NamedTempFile;

/// Arbiter collection of [`FIXTURE_JSON`]
#[allow(dead_code)]
pub const ARBITER: &str = "/remote.php/search";

/// One user's files. Only `/files/alice/` is searchable.
///
/// Sizes: report.pdf 52000, notes.txt 1200, photo.jpg 2400000,
/// Readme.md 800 (no last-modified date).
#[allow(dead_code)]
pub const FIXTURE_JSON: &str = r#"{
    "arbiter_path": "/remote.php/search",
    "scopes": [{ "href": "/files/alice/", "depth": "infinity" }],
    "properties": [
        { "name": "{DAV:}displayname", "type": "string" },
        { "name": "{DAV:}getcontentlength", "type": "nonNegativeInteger" },
        { "name": "{DAV:}getcontenttype", "type": "string" },
        { "name": "{DAV:}getlastmodified", "type": "dateTime" },
        { "name": "{DAV:}getetag", "type": "string", "searchable": false, "sortable": false },
        { "name": "{http://owncloud.org/ns}favorite", "type": "boolean" },
        { "name": "{http://owncloud.org/ns}owner-id", "type": "string", "selectable": false }
    ],
    "nodes": [
        {
            "href": "/files/alice/",
            "collection": true,
            "properties": { "{DAV:}displayname": "alice" }
        },
        {
            "href": "/files/alice/Documents/",
            "collection": true,
            "properties": { "{DAV:}displayname": "Documents" }
        },
        {
            "href": "/files/alice/Documents/report.pdf",
            "properties": {
                "{DAV:}displayname": "report.pdf",
                "{DAV:}getcontentlength": 52000,
                "{DAV:}getcontenttype": "application/pdf",
                "{DAV:}getlastmodified": "2024-03-01T10:00:00Z",
                "{DAV:}getetag": "\"r1\"",
                "{http://owncloud.org/ns}favorite": true,
                "{http://owncloud.org/ns}owner-id": "alice"
            }
        },
        {
            "href": "/files/alice/Documents/notes.txt",
            "properties": {
                "{DAV:}displayname": "notes.txt",
                "{DAV:}getcontentlength": 1200,
                "{DAV:}getcontenttype": "text/plain",
                "{DAV:}getlastmodified": "Sun, 12 May 2024 08:30:00 +0000",
                "{http://owncloud.org/ns}owner-id": "alice"
            }
        },
        {
            "href": "/files/alice/photo.jpg",
            "properties": {
                "{DAV:}displayname": "photo.jpg",
                "{DAV:}getcontentlength": 2400000,
                "{DAV:}getcontenttype": "image/jpeg",
                "{DAV:}getlastmodified": "2023-11-20T19:45:00Z",
                "{http://owncloud.org/ns}favorite": false
            }
        },
        {
            "href": "/files/alice/Readme.md",
            "properties": {
                "{DAV:}displayname": "Readme.md",
                "{DAV:}getcontentlength": 800,
                "{DAV:}getcontenttype": "text/markdown"
            }
        },
        {
            "href": "/files/bob/secret.txt",
            "properties": { "{DAV:}displayname": "secret.txt" }
        }
    ]
}"#;

/// Backend over [`FIXTURE_JSON`]
#[allow(dead_code)]
pub fn fixture_backend() -> MemoryBackend {
    MemoryBackend::from_json(FIXTURE_JSON).expect("fixture JSON is valid")
}

/// Write [`FIXTURE_JSON`] to a temporary file
#[allow(dead_code)]
pub fn write_fixture() -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(FIXTURE_JSON.as_bytes())
        .expect("Failed to write fixture");
    file
}
