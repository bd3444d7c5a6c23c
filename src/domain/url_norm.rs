// src/domain/url_norm.rs
use url::Url;

/// Query parameter used to mark an intentional copy of an existing bookmark.
/// Carries no routing meaning and never survives normalization.
pub const DUP_MARKER: &str = "_dup";

const TRACKING_PARAMS: &[&str] = &[
    // UTM parameters
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    // Social media trackers
    "fbclid",
    "gclid",
    "ocid",
    "dclid",
    // Common referrer parameters
    "ref",
    "source",
    "referrer",
    "referral",
    // Others
    "_ga",
    "_gl",
    "mc_cid",
    "mc_eid",
    // Session and tracking IDs
    "session_id",
    "tracking_id",
    "click_id",
    // Duplicate bookmark marker
    DUP_MARKER,
];

fn is_tracking_param(key: &str) -> bool {
    let lower = key.to_lowercase();
    TRACKING_PARAMS.contains(&lower.as_str())
}

/// Canonicalize a URL string for duplicate-equality comparison.
///
/// Lowercases the host, strips a leading `www.`, collapses repeated path
/// separators, drops a single trailing slash (except for the root path),
/// removes tracking parameters and re-encodes the remaining query sorted,
/// and drops an empty fragment. The scheme defaults to `https` when absent.
///
/// Pure and idempotent; an unparseable input is returned unchanged.
pub fn normalize_url(raw: &str) -> String {
    try_normalize(raw).unwrap_or_else(|| raw.to_string())
}

fn try_normalize(raw: &str) -> Option<String> {
    let url = parse_lenient(raw)?;

    let host = url.host_str()?.to_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host).to_string();

    let mut path = url.path().to_string();
    while path.contains("//") {
        path = path.replace("//", "/");
    }
    if path.ends_with('/') && path != "/" {
        path.pop();
    }

    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| !is_tracking_param(k))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    pairs.sort();

    let mut normalized = format!("{}://{}", url.scheme(), host);
    if let Some(port) = url.port() {
        normalized.push_str(&format!(":{}", port));
    }
    normalized.push_str(&path);

    if !pairs.is_empty() {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (k, v) in &pairs {
            serializer.append_pair(k, v);
        }
        normalized.push('?');
        normalized.push_str(&serializer.finish());
    }

    if let Some(fragment) = url.fragment() {
        if !fragment.is_empty() {
            normalized.push('#');
            normalized.push_str(fragment);
        }
    }

    Some(normalized)
}

fn parse_lenient(raw: &str) -> Option<Url> {
    if raw.trim().is_empty() {
        return None;
    }
    if raw.contains("://") {
        Url::parse(raw).ok()
    } else {
        Url::parse(&format!("https://{}", raw)).ok()
    }
}

/// True when the raw URL carries the intentional-duplicate marker parameter.
pub fn has_dup_marker(raw: &str) -> bool {
    parse_lenient(raw)
        .map(|url| url.query_pairs().any(|(k, _)| k == DUP_MARKER))
        .unwrap_or(false)
}

/// Remove the duplicate marker parameter, leaving everything else as-is.
/// Returns the input unchanged when it cannot be parsed.
pub fn strip_dup_marker(raw: &str) -> String {
    let Some(mut url) = parse_lenient(raw) else {
        return raw.to_string();
    };

    let remaining: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != DUP_MARKER)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    if remaining.is_empty() {
        url.set_query(None);
    } else {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (k, v) in &remaining {
            serializer.append_pair(k, v);
        }
        url.set_query(Some(&serializer.finish()));
    }

    url.to_string()
}

/// Lowercased host of a URL, for the derived `domain` field.
/// Empty when the URL has no parseable host.
pub fn host_of(raw: &str) -> String {
    parse_lenient(raw)
        .and_then(|url| url.host_str().map(|h| h.to_lowercase()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_tracking_params_and_casing_when_normalize_then_canonical_form() {
        assert_eq!(
            normalize_url("HTTPS://WWW.Example.com/a/?utm_source=x"),
            "https://example.com/a"
        );
        assert_eq!(
            normalize_url("https://example.com/a"),
            normalize_url("HTTPS://WWW.Example.com/a/?utm_source=x")
        );
    }

    #[test]
    fn given_missing_scheme_when_normalize_then_defaults_to_https() {
        assert_eq!(normalize_url("example.com/page"), "https://example.com/page");
    }

    #[test]
    fn given_repeated_separators_when_normalize_then_collapsed() {
        assert_eq!(
            normalize_url("https://example.com//a///b/"),
            "https://example.com/a/b"
        );
    }

    #[test]
    fn given_root_path_when_normalize_then_trailing_slash_kept() {
        assert_eq!(normalize_url("https://example.com/"), "https://example.com/");
    }

    #[test]
    fn given_query_when_normalize_then_sorted_and_tracking_free() {
        assert_eq!(
            normalize_url("https://example.com/p?b=2&fbclid=abc&a=1&_dup=3"),
            "https://example.com/p?a=1&b=2"
        );
    }

    #[test]
    fn given_empty_fragment_when_normalize_then_dropped() {
        assert_eq!(normalize_url("https://example.com/p#"), "https://example.com/p");
        assert_eq!(
            normalize_url("https://example.com/p#section"),
            "https://example.com/p#section"
        );
    }

    #[test]
    fn given_any_url_when_normalize_twice_then_idempotent() {
        let inputs = [
            "HTTPS://WWW.Example.com/a/?utm_source=x&z=1&b=2",
            "example.com//x//y/?ref=here#frag",
            "https://example.com:8443/p/",
            "not a url at all",
        ];
        for input in inputs {
            let once = normalize_url(input);
            assert_eq!(normalize_url(&once), once, "not idempotent for {}", input);
        }
    }

    #[test]
    fn given_unparseable_input_when_normalize_then_unchanged() {
        assert_eq!(normalize_url("::::"), "::::");
        assert_eq!(normalize_url(""), "");
    }

    #[test]
    fn given_nonstandard_port_when_normalize_then_port_kept() {
        assert_eq!(
            normalize_url("https://example.com:8443/p"),
            "https://example.com:8443/p"
        );
        assert_eq!(normalize_url("https://example.com:443/p"), "https://example.com/p");
    }

    #[test]
    fn given_dup_marker_when_helpers_then_detected_and_stripped() {
        let marked = "https://example.com/p?_dup=1699999999&x=1";
        assert!(has_dup_marker(marked));
        assert!(!has_dup_marker("https://example.com/p?x=1"));

        let stripped = strip_dup_marker(marked);
        assert!(!has_dup_marker(&stripped));
        assert_eq!(normalize_url(&stripped), "https://example.com/p?x=1");

        assert_eq!(
            normalize_url(&strip_dup_marker("https://example.com/p?_dup=2")),
            "https://example.com/p"
        );
    }

    #[test]
    fn given_url_when_host_of_then_lowercased_host() {
        assert_eq!(host_of("HTTPS://GitHub.com/rust-lang/rust"), "github.com");
        assert_eq!(host_of("github.com/rust-lang"), "github.com");
        assert_eq!(host_of("::::"), "");
    }
}
