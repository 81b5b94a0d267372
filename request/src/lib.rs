//! Translate a curl command line into an HTTP request description.
//!
//! This crate is the second stage of the pipeline started in
//! `curl2req-core`: it interprets classified curl flags and produces a
//! [`RequestDescription`] (method, absolute URL, ordered headers, lazily
//! composed body, and client options) ready to hand to an HTTP client.
//!
//! # Main entry points
//!
//! - [`translate`]: classify and build with the embedded curl grammar and
//!   default [`TranslateConfig`].
//! - [`translate_with`]: same, with a caller-supplied schema and config.
//! - [`build_request`]: build from an existing [`ClassifiedArgs`].
//!
//! # Example
//!
//! ```
//! use curl2req_request::translate;
//!
//! let request = translate(&[
//!     "curl", "-X", "POST", "-d", "a=b", "-d", "c=d\ne\n",
//!     "https://www.example.com/post",
//! ])
//! .unwrap();
//!
//! assert_eq!(request.method, "POST");
//! assert_eq!(request.content_type(), Some("application/x-www-form-urlencoded"));
//! assert!(!request.client.follow_redirects);
//!
//! let body = request.body.unwrap().read_to_vec().unwrap();
//! assert_eq!(body, b"a=b&c=de");
//! ```
//!
//! # Feature flags
//!
//! - **`reqwest`**: adds [`RequestDescription::into_reqwest`], which builds a
//!   configured blocking `reqwest` client and request.
//!
//! [`ClassifiedArgs`]: curl2req_core::ClassifiedArgs

mod body;
mod builder;
#[cfg(feature = "reqwest")]
mod client;
mod config;
mod description;
mod error;
mod escape;
mod multipart;

use curl2req_core::FlagSchema;

pub use body::{AsciiLines, Body};
pub use builder::{SUPPORTED_FLAGS, build_request};
pub use config::TranslateConfig;
pub use description::{ClientOptions, RequestDescription};
pub use error::{Result, TranslateError};
pub use escape::{canonical_header_key, escape_quotes, query_escape};
pub use multipart::{FormField, MultipartWriter};

/// Translates `argv` using the embedded curl grammar and default settings.
///
/// The first element is conventionally the program name (`curl`); it is never
/// mistaken for the URL.
///
/// # Errors
///
/// Returns a [`TranslateError`] describing the first flag that could not be
/// classified or translated.
pub fn translate<S: AsRef<str>>(argv: &[S]) -> Result<RequestDescription> {
    translate_with(FlagSchema::embedded(), &TranslateConfig::default(), argv)
}

/// Translates `argv` against `schema` with explicit settings.
///
/// # Errors
///
/// See [`translate`].
pub fn translate_with<S: AsRef<str>>(
    schema: &FlagSchema,
    config: &TranslateConfig,
    argv: &[S],
) -> Result<RequestDescription> {
    let args = schema.classify(argv)?;
    build_request(&args, config)
}
