//! The translated request handed to an HTTP client runtime.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::body::Body;

/// Transport-level client behavior requested by the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientOptions {
    /// Skip TLS certificate verification (`-k`).
    pub insecure_transport: bool,
    /// Follow redirects; only `-L` turns this on.
    pub follow_redirects: bool,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            insecure_transport: false,
            follow_redirects: true,
        }
    }
}

/// A fully specified outbound HTTP request.
///
/// `headers` keeps insertion order and duplicates. When an explicit or
/// implied content type exists it is the first entry. `host` overrides the
/// request's Host without appearing in `headers`.
#[derive(Debug)]
pub struct RequestDescription {
    /// HTTP method (`GET` unless a flag chose another).
    pub method: String,
    /// Absolute target URL.
    pub url: Url,
    /// Host override from a `-H "Host: ..."` header.
    pub host: Option<String>,
    /// Header name/value pairs.
    pub headers: Vec<(String, String)>,
    /// Request body, if any flag supplied one.
    pub body: Option<Body>,
    /// Client transport options.
    pub client: ClientOptions,
}

impl RequestDescription {
    /// First value of the named header, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Every value of the named header in order.
    pub fn header_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.headers
            .iter()
            .filter(move |(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// The request content type, if any.
    pub fn content_type(&self) -> Option<&str> {
        self.header("Content-Type")
    }

    /// Takes the body out, leaving `None`.
    pub fn take_body(&mut self) -> Option<Body> {
        self.body.take()
    }
}
