//! Mirror prefix normalization ("defuzzing").
//!
//! Raw mirror specs come from hand-edited list files and may be anything
//! from a bare hostname to a full resolver URL. Normalization produces a
//! prefix that a URN can be appended to directly.

/// Default name-to-resource resolver path appended to bare origins.
pub const DEFAULT_RESOLVER_PATH: &str = "/uri-res/N2R?";

/// Normalize a raw mirror spec into a URN-appendable prefix.
///
/// - a string with no `/` is a bare hostname: prepend `http://`;
/// - a bare `http(s)://host` with no path gets the default resolver path;
/// - anything not ending in `/` or `?` gets a `?` so appending the URN
///   forms a query-style location.
pub fn defuzz(raw: &str) -> String {
    let mut url = raw.trim().to_string();
    if !url.contains('/') {
        url.insert_str(0, "http://");
    }
    if is_bare_origin(&url) {
        url.push_str(DEFAULT_RESOLVER_PATH);
    }
    if !url.ends_with('/') && !url.ends_with('?') {
        url.push('?');
    }
    url
}

/// True for exactly `http://host` or `https://host` with no path part.
fn is_bare_origin(url: &str) -> bool {
    let rest = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"));
    matches!(rest, Some(r) if !r.is_empty() && !r.contains('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_hostname_gets_scheme_and_resolver_path() {
        assert_eq!(defuzz("example.org"), "http://example.org/uri-res/N2R?");
    }

    #[test]
    fn bare_origin_gets_resolver_path() {
        assert_eq!(
            defuzz("http://example.org"),
            "http://example.org/uri-res/N2R?"
        );
        assert_eq!(
            defuzz("https://example.org:8080"),
            "https://example.org:8080/uri-res/N2R?"
        );
    }

    #[test]
    fn trailing_slash_left_alone() {
        assert_eq!(defuzz("http://example.org/"), "http://example.org/");
        assert_eq!(defuzz("http://example.org/repo/"), "http://example.org/repo/");
    }

    #[test]
    fn path_without_terminator_gets_query_mark() {
        assert_eq!(defuzz("http://example.org/path"), "http://example.org/path?");
    }

    #[test]
    fn existing_query_mark_left_alone() {
        assert_eq!(
            defuzz("http://example.org/uri-res/N2R?"),
            "http://example.org/uri-res/N2R?"
        );
    }

    #[test]
    fn surrounding_whitespace_trimmed() {
        assert_eq!(defuzz("  example.org \n"), "http://example.org/uri-res/N2R?");
    }
}
