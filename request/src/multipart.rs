//! `multipart/form-data` encoding for `-F` values.

use crate::error::{Result, TranslateError};
use crate::escape::escape_quotes;

/// Characters that force the boundary parameter to be quoted.
const TSPECIALS: &str = "()<>@,;:\\\"/[]?= ";

/// One `-F` occurrence, parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    /// Field name (`name` in Content-Disposition).
    pub name: String,
    /// Field content, or an `@path` file reference.
    pub content: String,
    /// Part content type from a `;type=` attribute.
    pub content_type: Option<String>,
}

impl FormField {
    /// Parses `name=content[;type=mime][;other=...]`.
    ///
    /// Only `type` is recognized among the trailing attributes; segments
    /// without `=` are ignored. Name, content and type are trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`TranslateError::MalformedFormField`] when the first segment
    /// has no `=`.
    ///
    /// # Examples
    ///
    /// ```
    /// use curl2req_request::FormField;
    ///
    /// let field = FormField::parse("cc=dddd;type=text/plain").unwrap();
    /// assert_eq!(field.name, "cc");
    /// assert_eq!(field.content, "dddd");
    /// assert_eq!(field.content_type.as_deref(), Some("text/plain"));
    /// ```
    pub fn parse(value: &str) -> Result<Self> {
        let mut segments = value.split(';');
        let first = segments.next().unwrap_or_default();
        let (name, content) = first
            .split_once('=')
            .ok_or_else(|| TranslateError::MalformedFormField(value.to_string()))?;

        let mut content_type = None;
        for segment in segments {
            if let Some((key, val)) = segment.split_once('=') {
                if key.trim() == "type" {
                    content_type = Some(val.trim().to_string());
                }
            }
        }

        Ok(Self {
            name: name.trim().to_string(),
            content: content.trim().to_string(),
            content_type,
        })
    }

    /// The referenced path when the content is an `@path` file reference.
    pub fn file_path(&self) -> Option<&str> {
        self.content.strip_prefix('@')
    }
}

/// Incremental `multipart/form-data` writer over an in-memory buffer.
///
/// # Examples
///
/// ```
/// use curl2req_request::MultipartWriter;
///
/// let mut writer = MultipartWriter::with_boundary("XyZ").unwrap();
/// writer.add_part("aa", None, None, b"bbb");
/// assert_eq!(writer.content_type(), "multipart/form-data; boundary=XyZ");
///
/// let body = writer.finish();
/// assert_eq!(
///     String::from_utf8(body).unwrap(),
///     "--XyZ\r\nContent-Disposition: form-data; name=\"aa\"\r\n\r\nbbb\r\n--XyZ--\r\n",
/// );
/// ```
#[derive(Debug)]
pub struct MultipartWriter {
    boundary: String,
    buf: Vec<u8>,
    parts: usize,
}

impl MultipartWriter {
    /// A writer with a random boundary.
    pub fn new() -> Self {
        Self {
            boundary: uuid::Uuid::new_v4().simple().to_string(),
            buf: Vec::new(),
            parts: 0,
        }
    }

    /// A writer with a caller-chosen boundary.
    ///
    /// # Errors
    ///
    /// Returns [`TranslateError::Config`] unless the boundary is 1 to 70
    /// characters from the RFC 2046 boundary alphabet, not ending in a space.
    pub fn with_boundary(boundary: &str) -> Result<Self> {
        let valid = (1..=70).contains(&boundary.len())
            && !boundary.ends_with(' ')
            && boundary
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || "'()+_,-./:=? ".contains(ch));
        if !valid {
            return Err(TranslateError::Config(format!(
                "invalid multipart boundary: {boundary:?}"
            )));
        }
        Ok(Self {
            boundary: boundary.to_string(),
            buf: Vec::new(),
            parts: 0,
        })
    }

    /// The boundary separating parts.
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// The request content type carrying the boundary.
    pub fn content_type(&self) -> String {
        if self.boundary.chars().any(|ch| TSPECIALS.contains(ch)) {
            format!("multipart/form-data; boundary=\"{}\"", self.boundary)
        } else {
            format!("multipart/form-data; boundary={}", self.boundary)
        }
    }

    /// Appends a part. `name`, `filename` and `content_type` are
    /// quote-escaped.
    pub fn add_part(
        &mut self,
        name: &str,
        filename: Option<&str>,
        content_type: Option<&str>,
        content: &[u8],
    ) {
        let delimiter = if self.parts == 0 { "" } else { "\r\n" };
        let mut head = format!("{delimiter}--{}\r\n", self.boundary);

        head.push_str(&format!(
            "Content-Disposition: form-data; name=\"{}\"",
            escape_quotes(name)
        ));
        if let Some(filename) = filename {
            head.push_str(&format!("; filename=\"{}\"", escape_quotes(filename)));
        }
        head.push_str("\r\n");
        if let Some(content_type) = content_type {
            head.push_str(&format!("Content-Type: {}\r\n", escape_quotes(content_type)));
        }
        head.push_str("\r\n");

        self.buf.extend_from_slice(head.as_bytes());
        self.buf.extend_from_slice(content);
        self.parts += 1;
    }

    /// Writes the closing delimiter and returns the encoded body.
    pub fn finish(mut self) -> Vec<u8> {
        let delimiter = if self.parts == 0 { "" } else { "\r\n" };
        self.buf
            .extend_from_slice(format!("{delimiter}--{}--\r\n", self.boundary).as_bytes());
        self.buf
    }
}

impl Default for MultipartWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_field() {
        let field = FormField::parse(" aa = bbb ").unwrap();
        assert_eq!(field.name, "aa");
        assert_eq!(field.content, "bbb");
        assert!(field.content_type.is_none());
        assert!(field.file_path().is_none());
    }

    #[test]
    fn test_parse_file_reference() {
        let field = FormField::parse("kk=@dir/data.txt;filename=x").unwrap();
        assert_eq!(field.file_path(), Some("dir/data.txt"));
        assert!(field.content_type.is_none());
    }

    #[test]
    fn test_parse_content_may_contain_equals() {
        let field = FormField::parse("q=a=b").unwrap();
        assert_eq!(field.name, "q");
        assert_eq!(field.content, "a=b");
    }

    #[test]
    fn test_parse_requires_equals() {
        let err = FormField::parse("novalue;type=text/plain").unwrap_err();
        assert!(matches!(
            err,
            TranslateError::MalformedFormField(v) if v == "novalue;type=text/plain"
        ));
    }

    #[test]
    fn test_parts_with_filename_and_type() {
        let mut writer = MultipartWriter::with_boundary("b").unwrap();
        writer.add_part("a\"b", Some("f.txt"), Some("text/plain"), b"x");
        writer.add_part("c", None, None, b"y");
        let body = String::from_utf8(writer.finish()).unwrap();
        assert_eq!(
            body,
            "--b\r\n\
             Content-Disposition: form-data; name=\"a\\\"b\"; filename=\"f.txt\"\r\n\
             Content-Type: text/plain\r\n\r\n\
             x\r\n\
             --b\r\n\
             Content-Disposition: form-data; name=\"c\"\r\n\r\n\
             y\r\n\
             --b--\r\n"
        );
    }

    #[test]
    fn test_part_content_type_is_quote_escaped() {
        let mut writer = MultipartWriter::with_boundary("b").unwrap();
        writer.add_part("t", None, Some(r#"text/plain; charset="utf-8""#), b"x");
        let body = String::from_utf8(writer.finish()).unwrap();
        assert!(
            body.contains("Content-Type: text/plain; charset=\\\"utf-8\\\"\r\n"),
            "got: {body}"
        );
    }

    #[test]
    fn test_random_boundaries_differ() {
        let a = MultipartWriter::new();
        let b = MultipartWriter::new();
        assert_ne!(a.boundary(), b.boundary());
        assert!(a.content_type().starts_with("multipart/form-data; boundary="));
    }

    #[test]
    fn test_boundary_validation() {
        assert!(MultipartWriter::with_boundary("").is_err());
        assert!(MultipartWriter::with_boundary("trailing ").is_err());
        assert!(MultipartWriter::with_boundary("bad\"quote").is_err());
        assert!(MultipartWriter::with_boundary(&"x".repeat(71)).is_err());
        let quoted = MultipartWriter::with_boundary("a:b").unwrap();
        assert_eq!(quoted.content_type(), "multipart/form-data; boundary=\"a:b\"");
    }
}
