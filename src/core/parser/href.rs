//! Reference resolution for scope hrefs (RFC 3986 section 5.2).
//!
//! Handles the shapes that show up in search requests: absolute URLs,
//! absolute paths and relative paths against either a full URL or a
//! bare path base.

/// Resolve `href` against `base`.
///
/// ```
/// use davsearch::core::parser::resolve_href;
///
/// assert_eq!(resolve_href("/remote.php/search", "/files/"), "/files/");
/// assert_eq!(resolve_href("/dav/search", "files/a/"), "/dav/files/a/");
/// assert_eq!(
///     resolve_href("https://cloud.example/dav/search", "../files/"),
///     "https://cloud.example/files/"
/// );
/// ```
pub fn resolve_href(base: &str, href: &str) -> String {
    let href = href.trim();

    if has_scheme(href) {
        return href.to_string();
    }

    let (authority, base_path) = split_authority(base);

    if let Some(rest) = href.strip_prefix("//") {
        let scheme = base.split_once(':').map(|(s, _)| s).unwrap_or("http");
        return format!("{scheme}://{rest}");
    }

    let (href_path, suffix) = split_suffix(href);

    let path = if href_path.is_empty() {
        strip_suffix_of(base_path).to_string()
    } else if href_path.starts_with('/') {
        remove_dot_segments(href_path)
    } else {
        let base_path = strip_suffix_of(base_path);
        let directory = match base_path.rfind('/') {
            Some(idx) => &base_path[..=idx],
            None => "/",
        };
        remove_dot_segments(&format!("{directory}{href_path}"))
    };

    format!("{authority}{path}{suffix}")
}

/// Path component of an href, without scheme, authority, query or fragment
pub fn href_path(href: &str) -> &str {
    let (_, path) = split_authority(href);
    let (path, _) = split_suffix(path);
    if path.is_empty() {
        "/"
    } else {
        path
    }
}

fn has_scheme(href: &str) -> bool {
    match href.find(':') {
        Some(idx) => {
            let scheme = &href[..idx];
            !scheme.is_empty()
                && scheme.starts_with(|c: char| c.is_ascii_alphabetic())
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
                && !href[..idx].contains('/')
        }
        None => false,
    }
}

/// Split `scheme://authority` from the rest of `uri`.
fn split_authority(uri: &str) -> (&str, &str) {
    if !has_scheme(uri) {
        return ("", uri);
    }
    match uri.find("://") {
        Some(idx) => {
            let after = idx + 3;
            match uri[after..].find('/') {
                Some(slash) => uri.split_at(after + slash),
                None => (uri, ""),
            }
        }
        None => ("", uri),
    }
}

fn split_suffix(path: &str) -> (&str, &str) {
    match path.find(['?', '#']) {
        Some(idx) => path.split_at(idx),
        None => (path, ""),
    }
}

fn strip_suffix_of(path: &str) -> &str {
    split_suffix(path).0
}

fn remove_dot_segments(path: &str) -> String {
    let mut output: Vec<&str> = Vec::new();
    let segments: Vec<&str> = path.split('/').collect();
    let last = segments.len().saturating_sub(1);

    for (i, segment) in segments.iter().enumerate() {
        match *segment {
            "." => {
                if i == last {
                    output.push("");
                }
            }
            ".." => {
                if output.len() > 1 {
                    output.pop();
                }
                if i == last {
                    output.push("");
                }
            }
            s => output.push(s),
        }
    }

    let joined = output.join("/");
    if joined.starts_with('/') {
        joined
    } else {
        format!("/{joined}")
    }
}
