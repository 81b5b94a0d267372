//! curl flag grammar and argument classification.
//!
//! This crate is the first stage of translating a curl command line into an
//! HTTP request:
//!
//! - [`FlagSchema`]: the set of recognized flags, loaded from `curl -h`
//!   style help text ([`FlagSchema::parse`]) or from the embedded grammar
//!   ([`FlagSchema::embedded`]).
//! - [`classify`]: splits an argument vector into schema-backed flags with
//!   their values ([`ParsedFlag`]) and positional arguments, producing a
//!   [`ClassifiedArgs`].
//!
//! The request-building stage lives in the `curl2req-request` crate.
//!
//! # Example
//!
//! ```
//! use curl2req_core::{FlagSchema, classify};
//!
//! let schema = FlagSchema::embedded();
//! let args = classify(schema, &["curl", "-X", "POST", "-d", "a=b", "example.com/post"]).unwrap();
//!
//! assert_eq!(args.last_value("request"), "POST");
//! assert_eq!(args.values("data"), ["a=b"]);
//! assert_eq!(args.arg(-1), "example.com/post");
//! ```

mod error;
mod flagset;
mod grammar;

pub use error::{CoreError, Result};
pub use flagset::{ClassifiedArgs, FlagRef, ParsedFlag, classify};
pub use grammar::{FlagSchema, FlagSpec, HELP_TEXT, USAGE_MARKER};
