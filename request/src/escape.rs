//! String escaping helpers shared by the body encoders.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_encode};

/// Everything but `A-Z a-z 0-9 - _ . ~` is escaped in a query component.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Escapes bytes for use as a query component: unreserved characters pass
/// through, space becomes `+`, everything else is `%XX`.
///
/// # Examples
///
/// ```
/// use curl2req_request::query_escape;
///
/// assert_eq!(query_escape(b"<fa>"), "%3Cfa%3E");
/// assert_eq!(query_escape(b"a b&c=d\n"), "a+b%26c%3Dd%0A");
/// ```
pub fn query_escape(input: &[u8]) -> String {
    input
        .split(|&b| b == b' ')
        .map(|chunk| percent_encode(chunk, QUERY_COMPONENT).to_string())
        .collect::<Vec<_>>()
        .join("+")
}

/// Escapes `\` and `"` for embedding in a quoted-string.
pub fn escape_quotes(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '\\' | '"') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Canonical MIME header key: first letter and every letter after `-` upper
/// case, the rest lower case (`content-TYPE` → `Content-Type`).
pub fn canonical_header_key(key: &str) -> String {
    let mut upper = true;
    key.chars()
        .map(|ch| {
            let out = if upper {
                ch.to_ascii_uppercase()
            } else {
                ch.to_ascii_lowercase()
            };
            upper = ch == '-';
            out
        })
        .collect()
}
