//! URL splitting and percent-encoding helpers shared by both strategies.

use std::collections::BTreeMap;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use url::form_urlencoded;

/// Characters escaped inside a single path segment. `/` is included so a
/// parameter value can never introduce an extra segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Characters escaped in a fragment. `%` is left alone so an already
/// encoded fragment passes through unchanged.
const FRAGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`');

/// The pieces of a raw request URL the router cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitUrl {
    /// The path, still percent-encoded.
    pub path: String,
    /// The raw query string, without the leading `?`.
    pub query: Option<String>,
    /// The fragment, without the leading `#`.
    pub fragment: Option<String>,
}

/// Splits a URL into path, query, and fragment.
///
/// Accepts either an absolute URL (`http://host/path?q`) or a bare path with
/// optional query and fragment.
///
/// # Examples
///
/// ```
/// use waypoint_http::urls::encoding::split_url;
///
/// let split = split_url("https://example.com:8080/blog/list?page=2#top");
/// assert_eq!(split.path, "/blog/list");
/// assert_eq!(split.query.as_deref(), Some("page=2"));
/// assert_eq!(split.fragment.as_deref(), Some("top"));
///
/// let split = split_url("/blog/list?page=2");
/// assert_eq!(split.path, "/blog/list");
/// ```
pub fn split_url(raw: &str) -> SplitUrl {
    if raw.contains("://") {
        if let Ok(parsed) = url::Url::parse(raw) {
            return SplitUrl {
                path: parsed.path().to_string(),
                query: parsed.query().map(str::to_string),
                fragment: parsed.fragment().map(str::to_string),
            };
        }
    }

    let (rest, fragment) = match raw.split_once('#') {
        Some((rest, fragment)) => (rest, Some(fragment.to_string())),
        None => (raw, None),
    };
    let (path, query) = match rest.split_once('?') {
        Some((path, query)) => (path, Some(query.to_string())),
        None => (rest, None),
    };

    SplitUrl {
        path: path.to_string(),
        query,
        fragment,
    }
}

/// Collapses runs of `/` into one and guarantees a leading `/`.
pub fn collapse_slashes(path: &str) -> String {
    let mut result = String::with_capacity(path.len() + 1);
    result.push('/');
    for c in path.chars() {
        if c == '/' && result.ends_with('/') {
            continue;
        }
        result.push(c);
    }
    result
}

/// Percent-encodes a value for use as one path segment.
pub fn encode_segment(value: &str) -> String {
    utf8_percent_encode(value, PATH_SEGMENT).to_string()
}

/// Percent-encodes a fragment (without the leading `#`).
pub fn encode_fragment(fragment: &str) -> String {
    utf8_percent_encode(fragment, FRAGMENT).to_string()
}

/// Percent-decodes one path segment. Invalid UTF-8 is replaced lossily.
pub fn decode_segment(segment: &str) -> String {
    percent_decode_str(segment).decode_utf8_lossy().into_owned()
}

/// Decodes an `application/x-www-form-urlencoded` query string into a flat map.
///
/// When a key repeats, the last value wins.
pub fn decode_query(query: &str) -> BTreeMap<String, String> {
    form_urlencoded::parse(query.as_bytes()).into_owned().collect()
}

/// Encodes key/value pairs as a query string (without the leading `?`).
pub fn encode_query<'a, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}
