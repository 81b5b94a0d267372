//! Error types for grammar loading and argument classification.

use thiserror::Error;

/// Errors produced while loading the flag grammar or classifying an
/// argument vector against it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A token starting with `-` names no flag in the schema.
    #[error("unknown flag: {0}")]
    UnknownFlag(String),

    /// A flag that takes a parameter is the last token, or is followed by
    /// another flag instead of its value.
    #[error("insufficient argument: {0}")]
    InsufficientArgument(String),

    /// The grammar text does not have the expected `curl -h` shape.
    #[error("malformed flag grammar at line {line}: {reason}")]
    GrammarFormat {
        /// 1-based line number in the grammar text.
        line: usize,
        /// What was wrong with the line.
        reason: &'static str,
    },
}

/// Convenience alias for results with [`CoreError`].
pub type Result<T> = std::result::Result<T, CoreError>;
