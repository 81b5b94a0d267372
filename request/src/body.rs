//! Lazily composed request body sources.
//!
//! A [`Body`] is a pull-based byte stream. Data flag occurrences become
//! individual bodies that are chained together in order; text-family data is
//! wrapped in [`AsciiLines`] so embedded line terminators disappear as the
//! stream is read.

use std::fmt;
use std::io::{self, BufRead, BufReader, Cursor, Read};

/// A request body byte source.
///
/// Reading consumes it; rebuild the request to read it again.
///
/// # Examples
///
/// ```
/// use curl2req_request::Body;
///
/// let body = Body::from_bytes("a=b\n")
///     .ascii()
///     .chain(Body::from_bytes("&"))
///     .chain(Body::from_bytes("c=d"));
/// assert_eq!(body.read_to_vec().unwrap(), b"a=b&c=d");
/// ```
pub struct Body {
    reader: Box<dyn Read + Send>,
}

impl Body {
    /// A body over in-memory bytes.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self::from_reader(Cursor::new(bytes.into()))
    }

    /// A body over an arbitrary reader.
    pub fn from_reader<R: Read + Send + 'static>(reader: R) -> Self {
        Self {
            reader: Box::new(reader),
        }
    }

    /// Strips line terminators from this body as it is read.
    pub fn ascii(self) -> Self {
        Self::from_reader(AsciiLines::new(BufReader::new(self.reader)))
    }

    /// Appends `next`, read once this body is exhausted.
    pub fn chain(self, next: Body) -> Self {
        Self::from_reader(self.reader.chain(next.reader))
    }

    /// Reads the whole body into memory.
    pub fn read_to_vec(mut self) -> io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.reader.read_to_end(&mut buf)?;
        Ok(buf)
    }

    /// Returns the underlying reader.
    pub fn into_reader(self) -> Box<dyn Read + Send> {
        self.reader
    }
}

impl Read for Body {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Body").finish_non_exhaustive()
    }
}

/// Reader that yields each line of the inner source without its `\n` or
/// `\r\n` terminator.
///
/// A final line without a terminator is passed through unchanged. Lines are
/// pulled one at a time, so large sources are never buffered whole.
pub struct AsciiLines<R> {
    inner: R,
    line: Vec<u8>,
    pos: usize,
}

impl<R: BufRead> AsciiLines<R> {
    /// Wraps a buffered reader.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            line: Vec::new(),
            pos: 0,
        }
    }

    fn fill_line(&mut self) -> io::Result<bool> {
        while self.pos >= self.line.len() {
            self.line.clear();
            self.pos = 0;
            if self.inner.read_until(b'\n', &mut self.line)? == 0 {
                return Ok(false);
            }
            if self.line.last() == Some(&b'\n') {
                self.line.pop();
            }
            if self.line.last() == Some(&b'\r') {
                self.line.pop();
            }
        }
        Ok(true)
    }
}

impl<R: BufRead> Read for AsciiLines<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() || !self.fill_line()? {
            return Ok(0);
        }
        let pending = &self.line[self.pos..];
        let n = pending.len().min(buf.len());
        buf[..n].copy_from_slice(&pending[..n]);
        self.pos += n;
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ascii(input: &str) -> Vec<u8> {
        let mut out = Vec::new();
        AsciiLines::new(input.as_bytes())
            .read_to_end(&mut out)
            .unwrap();
        out
    }

    #[test]
    fn test_ascii_strips_lf_and_crlf() {
        assert_eq!(ascii("a=b\r\nc=d\ne"), b"a=bc=de");
    }

    #[test]
    fn test_ascii_keeps_unterminated_last_line() {
        assert_eq!(ascii("tail"), b"tail");
    }

    #[test]
    fn test_ascii_skips_blank_lines() {
        assert_eq!(ascii("\n\nx\n\n"), b"x");
        assert!(ascii("").is_empty());
    }

    #[test]
    fn test_ascii_small_reads() {
        let mut reader = AsciiLines::new("abc\ndef\n".as_bytes());
        let mut out = Vec::new();
        let mut buf = [0u8; 2];
        loop {
            let n = reader.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            out.extend_from_slice(&buf[..n]);
        }
        assert_eq!(out, b"abcdef");
    }

    #[test]
    fn test_chain_reads_in_order() {
        let body = Body::from_bytes("one")
            .chain(Body::from_bytes("-"))
            .chain(Body::from_bytes("two"));
        assert_eq!(body.read_to_vec().unwrap(), b"one-two");
    }

    #[test]
    fn test_binary_body_is_untouched() {
        let body = Body::from_bytes("{\n\t\"a\": 1\n}");
        assert_eq!(body.read_to_vec().unwrap(), b"{\n\t\"a\": 1\n}");
    }
}
