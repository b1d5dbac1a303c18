//! URL extraction module
//!
//! Derives the four wordlist candidates (subdomain, path, file and parameter
//! names) from a single URL. Everything here is pure: a URL that cannot be
//! parsed, or that has nothing interesting in it, simply yields absent fields.

use crate::filter::{is_guid, is_numeric};
use percent_encoding::percent_decode_str;
use url::{Host, Url};

/// Maximum number of `/`-split segments kept for the path wordlist.
/// The leading empty segment counts, so this is a depth of two.
const PATH_SEGMENTS: usize = 3;

/// Values extracted from one URL
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedRecord {
    pub subdomain: Option<String>,
    pub path: Option<String>,
    pub file: Option<String>,
    pub parameters: Vec<String>,
}

impl ExtractedRecord {
    /// True when the URL contributed nothing to any category
    pub fn is_empty(&self) -> bool {
        self.subdomain.is_none()
            && self.path.is_none()
            && self.file.is_none()
            && self.parameters.is_empty()
    }
}

/// Extract every category from a URL string.
///
/// Never fails: unparseable input produces an empty record.
pub fn extract(url: &str) -> ExtractedRecord {
    let input = url.trim();
    let Some(parsed) = parse(input) else {
        return ExtractedRecord::default();
    };
    let path = decoded_path(input, &parsed);

    ExtractedRecord {
        subdomain: subdomain(&parsed),
        path: path.as_deref().and_then(depth_limited_path),
        file: path.as_deref().and_then(file_of_path),
        parameters: parameter_names(&parsed),
    }
}

/// Parse an absolute URL; `//host/path` is taken as `https://host/path`
fn parse(input: &str) -> Option<Url> {
    if input.starts_with("//") {
        Url::parse(&format!("https:{}", input)).ok()
    } else {
        Url::parse(input).ok()
    }
}

/// Percent-decoded path exactly as written in `input`.
///
/// `Url::path()` resolves dot segments and re-encodes, so the path is sliced
/// from the input instead: everything after the authority, up to the query or
/// fragment. `None` for opaque URLs (`mailto:`).
pub fn decoded_path(input: &str, url: &Url) -> Option<String> {
    if url.cannot_be_a_base() {
        return None;
    }

    // Protocol-relative input has no scheme to strip
    let rest = match input.split_once(':') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case(url.scheme()) => rest,
        _ => input,
    };
    let Some(rest) = rest.strip_prefix("//") else {
        // `http:host/x` has no authority marker
        return Some(String::new());
    };

    let rest = &rest[..rest.find(['?', '#']).unwrap_or(rest.len())];
    let raw = &rest[rest.find('/').unwrap_or(rest.len())..];
    Some(percent_decode_str(raw).decode_utf8_lossy().into_owned())
}

/// Subdomain label of the URL's host, based on the public suffix list
pub fn subdomain(url: &Url) -> Option<String> {
    match url.host()? {
        Host::Domain(domain) => subdomain_of_host(domain),
        Host::Ipv4(_) | Host::Ipv6(_) => None,
    }
}

/// Subdomain heuristic for a bare hostname.
///
/// ICANN suffixes: drop the first occurrence of the suffix and keep the label
/// before the next dot. Private multi-label suffixes (`github.io`): drop the
/// suffix and the separating dot, keep everything that is left.
pub fn subdomain_of_host(host: &str) -> Option<String> {
    let suffix = psl::suffix(host.as_bytes())?;
    let tld = std::str::from_utf8(suffix.as_bytes()).ok()?;
    let stripped = host.replacen(tld, "", 1);

    match suffix.typ() {
        Some(psl::Type::Icann) => {
            let remainder = stripped.strip_suffix('.').unwrap_or(&stripped);
            match remainder.find('.') {
                Some(dot) if dot > 0 => Some(remainder[..dot].to_string()),
                _ => None,
            }
        }
        _ if tld.contains('.') => {
            let mut remainder = stripped;
            remainder.pop()?;
            if remainder.is_empty() {
                None
            } else {
                Some(remainder)
            }
        }
        // Unmanaged single-label suffix
        _ => None,
    }
}

/// Truncate a decoded path to at most [`PATH_SEGMENTS`] segments.
///
/// Returns `None` for an empty path or the bare root.
pub fn depth_limited_path(path: &str) -> Option<String> {
    let segments: Vec<&str> = path.split('/').collect();
    let keep = segments.len().min(PATH_SEGMENTS);

    let out = segments[..keep].join("/");
    if out.len() <= 1 {
        return None;
    }
    Some(out)
}

/// Final segment of a decoded path, unless the path is a directory, a number
/// or a GUID
pub fn file_of_path(path: &str) -> Option<String> {
    if path.is_empty() || path.ends_with('/') {
        return None;
    }

    let last = path.rsplit('/').next()?;
    if last.is_empty() || is_numeric(last) || is_guid(last) {
        return None;
    }
    Some(last.to_string())
}

/// Distinct query parameter names, in first-seen order
pub fn parameter_names(url: &Url) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();

    for (key, _) in url.query_pairs() {
        if key.is_empty() || names.iter().any(|n| n.as_str() == key.as_ref()) {
            continue;
        }
        names.push(key.into_owned());
    }

    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_record() {
        let record = extract("https://api.dev.example.com/users/123/profile.json?token=abc&id=5");

        assert_eq!(record.subdomain.as_deref(), Some("api"));
        assert_eq!(record.path.as_deref(), Some("/users/123"));
        assert_eq!(record.file.as_deref(), Some("profile.json"));
        assert_eq!(record.parameters, vec!["token", "id"]);
    }

    #[test]
    fn test_root_url_is_empty() {
        let record = extract("https://example.com/");

        assert_eq!(record.subdomain, None);
        assert_eq!(record.path, None);
        assert_eq!(record.file, None);
        assert!(record.parameters.is_empty());
        assert!(record.is_empty());
    }

    #[test]
    fn test_multi_label_icann_suffix() {
        let record = extract("https://shop.example.co.uk/category/shoes/red-sneaker.html");

        assert_eq!(record.subdomain.as_deref(), Some("shop"));
        assert_eq!(record.path.as_deref(), Some("/category/shoes"));
        assert_eq!(record.file.as_deref(), Some("red-sneaker.html"));
    }

    #[test]
    fn test_guid_file_is_dropped() {
        let record = extract("https://example.com/files/3fa85f64-5717-4562-b3fc-2c963f66afa6");

        assert_eq!(record.file, None);
        assert_eq!(record.path.as_deref(), Some("/files/3fa85f64-5717-4562-b3fc-2c963f66afa6"));
    }

    #[test]
    fn test_numeric_file_is_dropped() {
        let record = extract("https://example.com/orders/1234");
        assert_eq!(record.file, None);
    }

    #[test]
    fn test_empty_query() {
        let record = extract("https://example.com/page?");

        assert!(record.parameters.is_empty());
        assert_eq!(record.path.as_deref(), Some("/page"));
        assert_eq!(record.file.as_deref(), Some("page"));
    }

    #[test]
    fn test_duplicate_parameters_keep_first_order() {
        let record = extract("https://example.com/?b=1&a=2&b=3&=4&&c");
        assert_eq!(record.parameters, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_unparseable_input() {
        assert!(extract("not a url").is_empty());
        assert!(extract("").is_empty());
        assert!(extract("example.com/admin").is_empty());
    }

    #[test]
    fn test_extraction_is_repeatable() {
        let url = "https://a.b.example.org/x/y/z.php?q=1";
        assert_eq!(extract(url), extract(url));
    }

    #[test]
    fn test_depth_limited_path() {
        assert_eq!(depth_limited_path(""), None);
        assert_eq!(depth_limited_path("/"), None);
        assert_eq!(depth_limited_path("/a"), Some("/a".to_string()));
        assert_eq!(depth_limited_path("/a/"), Some("/a/".to_string()));
        assert_eq!(depth_limited_path("/a/b"), Some("/a/b".to_string()));
        assert_eq!(depth_limited_path("/a/b/c/d"), Some("/a/b".to_string()));
    }

    #[test]
    fn test_path_depth_never_exceeds_two() {
        let urls = [
            "https://example.com/a/b/c/d/e/f",
            "https://example.com//x//y",
            "https://example.com/one/two/",
        ];
        for url in urls {
            if let Some(path) = extract(url).path {
                assert!(path.split('/').count() <= PATH_SEGMENTS, "{path}");
            }
        }
    }

    #[test]
    fn test_file_of_path() {
        assert_eq!(file_of_path(""), None);
        assert_eq!(file_of_path("/dir/"), None);
        assert_eq!(file_of_path("/dir/index.php"), Some("index.php".to_string()));
        assert_eq!(file_of_path("/{3FA85F64-5717-4562-B3FC-2C963F66AFA6}"), None);
    }

    #[test]
    fn test_subdomain_of_host() {
        assert_eq!(subdomain_of_host("www.example.com"), Some("www".to_string()));
        assert_eq!(subdomain_of_host("example.com"), None);
        assert_eq!(subdomain_of_host("com"), None);
        assert_eq!(subdomain_of_host("mail.example.co.uk"), Some("mail".to_string()));
    }

    #[test]
    fn test_private_suffix_keeps_remainder() {
        assert_eq!(subdomain_of_host("project.github.io"), Some("project".to_string()));
        assert_eq!(subdomain_of_host("a.b.github.io"), Some("a.b".to_string()));
        assert_eq!(subdomain_of_host("github.io"), None);
    }

    #[test]
    fn test_subdomain_strips_first_suffix_occurrence() {
        // The suffix is removed wherever it first appears, even inside a label
        assert_eq!(subdomain_of_host("community.example.com"), Some("munity".to_string()));
    }

    #[test]
    fn test_subdomain_absent_for_ip_and_unknown_tld() {
        assert_eq!(extract("http://127.0.0.1/admin").subdomain, None);
        assert_eq!(extract("http://[::1]/admin").subdomain, None);
        assert_eq!(extract("http://intranet.local/").subdomain, None);
    }

    #[test]
    fn test_opaque_url_has_no_path_or_file() {
        let record = extract("mailto:someone@example.com");
        assert_eq!(record.path, None);
        assert_eq!(record.file, None);
    }

    #[test]
    fn test_percent_encoded_path_is_decoded() {
        let record = extract("https://example.com/my%20docs/report%20final.pdf");

        assert_eq!(record.path.as_deref(), Some("/my docs/report final.pdf"));
        assert_eq!(record.file.as_deref(), Some("report final.pdf"));
    }

    #[test]
    fn test_non_ascii_path_is_kept_verbatim() {
        let record = extract("https://example.com/café/menü.html");

        assert_eq!(record.path.as_deref(), Some("/café/menü.html"));
        assert_eq!(record.file.as_deref(), Some("menü.html"));
    }

    #[test]
    fn test_dot_segments_are_not_resolved() {
        let record = extract("https://example.com/a/../b/c/d.php");

        assert_eq!(record.path.as_deref(), Some("/a/.."));
        assert_eq!(record.file.as_deref(), Some("d.php"));
    }

    #[test]
    fn test_protocol_relative_url() {
        let record = extract("//cdn.example.com/js/app.js");

        assert_eq!(record.subdomain.as_deref(), Some("cdn"));
        assert_eq!(record.path.as_deref(), Some("/js/app.js"));
        assert_eq!(record.file.as_deref(), Some("app.js"));

        let with_port = extract("//cdn.example.com:8080/js/app.js");
        assert_eq!(with_port.path.as_deref(), Some("/js/app.js"));
    }

    #[test]
    fn test_decoded_path_stops_at_query_and_fragment() {
        let input = "HTTPS://user@example.com:8443/x%2Fy/z?next=/other/path#/frag";
        let url = Url::parse(input).unwrap();

        assert_eq!(decoded_path(input, &url).as_deref(), Some("/x/y/z"));
    }
}
