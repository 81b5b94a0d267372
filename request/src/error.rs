//! Error types for request translation.
//!
//! Every variant is terminal: a translation either yields a complete
//! [`RequestDescription`](crate::RequestDescription) or one of these.

use std::path::PathBuf;

use curl2req_core::CoreError;
use thiserror::Error;

/// Errors that can occur while translating curl arguments into a request.
#[derive(Debug, Error)]
pub enum TranslateError {
    /// Argument classification failed (unknown flag, missing flag value).
    #[error(transparent)]
    Classify(#[from] CoreError),

    /// A `-H` value has no `:` separator.
    #[error("header value must contain ':': {0}")]
    MalformedHeader(String),

    /// A `-F` value has no `=` in its first `;`-separated segment.
    #[error("form value must contain '=': {0}")]
    MalformedFormField(String),

    /// Two flag families both tried to supply the request body.
    #[error("request body is already filled")]
    BodyAlreadyFilled,

    /// Two flags that cannot be combined were both set.
    #[error("cannot use {flag} with {other}")]
    IncompatibleFlags {
        /// The flag being applied.
        flag: &'static str,
        /// The flag it conflicts with.
        other: &'static str,
    },

    /// The flag is known to the grammar but has no translation.
    #[error("unsupported flag: {0}")]
    UnsupportedFlag(String),

    /// Neither a positional URL nor `--url` was given.
    #[error("url is missing")]
    MissingUrl,

    /// A file referenced by a flag value could not be read.
    #[error("failed to read {flag} file {}: {source}", path.display())]
    FileRead {
        /// Long name of the flag that referenced the file.
        flag: &'static str,
        /// The referenced path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The target URL could not be parsed.
    #[error("invalid url {url}: {source}")]
    UrlParse {
        /// The URL as it was handed to the parser.
        url: String,
        /// The underlying parse error.
        #[source]
        source: url::ParseError,
    },

    /// Draining the data body into a query string failed.
    #[error("failed to read request body: {0}")]
    BodyRead(#[source] std::io::Error),

    /// The HTTP client rejected the translated request.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Translation settings could not be loaded or are invalid.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Convenience alias for results with [`TranslateError`].
pub type Result<T> = std::result::Result<T, TranslateError>;
