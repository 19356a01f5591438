//! Headers argument of the response head and the `Server-Timing` merge.

use bytes::Bytes;
use http::header::{HeaderMap, HeaderName, HeaderValue};

/// The `server-timing` header name.
pub const SERVER_TIMING: HeaderName = HeaderName::from_static("server-timing");

/// The canonical `Server-Timing` header name used in raw header lines.
pub const SERVER_TIMING_LINE_NAME: &str = "Server-Timing";

/// Headers passed along with the status code when the response head is written.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum ResponseHeaders {
    /// A key-value mapping of headers.
    Map(HeaderMap),
    /// A list of raw header lines in the form `Name: value`.
    Lines(Vec<String>),
    /// An opaque preformatted header block which is passed through unchanged.
    Raw(Bytes),
}

impl ResponseHeaders {
    /// Merges the `Server-Timing` header value into the optional headers.
    ///
    /// - If there are no headers, a map with only the `server-timing` header is created.
    /// - If the headers are raw lines, a new `Server-Timing: <value>` line is appended.
    /// - A value which is not a valid header value is skipped with a warning.
    /// - If the headers are a map, its `server-timing` header is set or overwritten.
    /// - An opaque header block is returned as it is.
    pub fn merge_server_timing(headers: Option<Self>, value: &str) -> Self {
        match headers {
            None => {
                let mut headers = HeaderMap::new();
                insert_server_timing(&mut headers, value);
                Self::Map(headers)
            }
            Some(Self::Lines(mut lines)) => {
                if is_valid_header_value(value) {
                    lines.push(format!("{SERVER_TIMING_LINE_NAME}: {value}"));
                }
                Self::Lines(lines)
            }
            Some(Self::Map(mut headers)) => {
                insert_server_timing(&mut headers, value);
                Self::Map(headers)
            }
            Some(Self::Raw(bytes)) => {
                tracing::debug!(
                    server_timing = value,
                    "skip merging the server timing into an opaque header block"
                );
                Self::Raw(bytes)
            }
        }
    }

    /// Returns the `Server-Timing` header value if it exists.
    pub fn server_timing(&self) -> Option<&str> {
        match self {
            Self::Map(headers) => headers.get(SERVER_TIMING).and_then(|v| v.to_str().ok()),
            Self::Lines(lines) => lines.iter().rev().find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.trim()
                    .eq_ignore_ascii_case(SERVER_TIMING_LINE_NAME)
                    .then(|| value.trim())
            }),
            Self::Raw(_) => None,
        }
    }

    /// Returns the number of headers or header lines.
    /// An opaque header block is counted as a single entry.
    pub fn len(&self) -> usize {
        match self {
            Self::Map(headers) => headers.len(),
            Self::Lines(lines) => lines.len(),
            Self::Raw(_) => 1,
        }
    }

    /// Returns `true` if there are no headers.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Map(headers) => headers.is_empty(),
            Self::Lines(lines) => lines.is_empty(),
            Self::Raw(bytes) => bytes.is_empty(),
        }
    }
}

impl From<HeaderMap> for ResponseHeaders {
    #[inline]
    fn from(headers: HeaderMap) -> Self {
        Self::Map(headers)
    }
}

impl From<Vec<String>> for ResponseHeaders {
    #[inline]
    fn from(lines: Vec<String>) -> Self {
        Self::Lines(lines)
    }
}

impl From<Bytes> for ResponseHeaders {
    #[inline]
    fn from(bytes: Bytes) -> Self {
        Self::Raw(bytes)
    }
}

/// Inserts the `server-timing` header into the map, overwriting any existing value.
/// Returns `true` if the value can be sent as a header value.
fn is_valid_header_value(value: &str) -> bool {
    match HeaderValue::try_from(value) {
        Ok(_) => true,
        Err(err) => {
            tracing::warn!(
                server_timing = value,
                "fail to convert the server timing into a header value: {err}"
            );
            false
        }
    }
}

fn insert_server_timing(headers: &mut HeaderMap, value: &str) {
    match HeaderValue::try_from(value) {
        Ok(header_value) => {
            headers.insert(SERVER_TIMING, header_value);
        }
        Err(err) => {
            tracing::warn!(
                server_timing = value,
                "fail to convert the server timing into a header value: {err}"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ResponseHeaders, SERVER_TIMING};
    use bytes::Bytes;
    use http::header::{HeaderMap, HeaderValue};

    const VALUE: &str = r#"db;dur=12;desc="query""#;

    #[test]
    fn it_creates_headers_when_absent() {
        let headers = ResponseHeaders::merge_server_timing(None, VALUE);
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.server_timing(), Some(VALUE));
    }

    #[test]
    fn it_merges_into_header_map() {
        let mut map = HeaderMap::new();
        map.insert("x-foo", HeaderValue::from_static("1"));
        map.insert(SERVER_TIMING, HeaderValue::from_static("stale"));

        let headers = ResponseHeaders::merge_server_timing(Some(map.into()), VALUE);
        let ResponseHeaders::Map(map) = headers else {
            panic!("headers should be a map");
        };
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("x-foo").and_then(|v| v.to_str().ok()), Some("1"));
        assert_eq!(map.get(SERVER_TIMING).and_then(|v| v.to_str().ok()), Some(VALUE));
    }

    #[test]
    fn it_appends_header_line() {
        let lines = vec!["X-Foo: 1".to_owned()];
        let headers = ResponseHeaders::merge_server_timing(Some(lines.into()), VALUE);
        let ResponseHeaders::Lines(lines) = headers else {
            panic!("headers should be a list of lines");
        };
        assert_eq!(lines, ["X-Foo: 1".to_owned(), format!("Server-Timing: {VALUE}")]);
    }

    #[test]
    fn it_passes_opaque_headers_through() {
        let block = Bytes::from_static(b"X-Foo: 1\r\n");
        let headers = ResponseHeaders::merge_server_timing(Some(block.clone().into()), VALUE);
        assert!(matches!(headers, ResponseHeaders::Raw(ref bytes) if *bytes == block));
        assert_eq!(headers.server_timing(), None);
    }

    #[test]
    fn it_skips_invalid_header_values() {
        let headers = ResponseHeaders::merge_server_timing(None, "db;desc=\"line\nbreak\"");
        assert!(headers.is_empty());
        assert_eq!(headers.server_timing(), None);
    }

    #[test]
    fn it_skips_invalid_header_lines() {
        let lines = vec!["X-Foo: 1".to_owned()];
        let value = "db;desc=\"q\r\nSet-Cookie: session=evil\"";
        let headers = ResponseHeaders::merge_server_timing(Some(lines.into()), value);
        let ResponseHeaders::Lines(lines) = headers else {
            panic!("headers should be a list of lines");
        };
        assert_eq!(lines, ["X-Foo: 1".to_owned()]);
    }
}
