//! Error types shared across the crate.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::loader::ConfigError;

/// Top-level error returned by facade construction.
///
/// Steady-state logging never returns errors; only building a logger or a
/// sink can fail.
#[derive(Debug, Error)]
pub enum LogError {
    /// The log directory or file could not be created or opened.
    #[error("failed to initialise log sink `{name}` at {}: {source}", path.display())]
    Init {
        name: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid log format: {0}")]
    Format(#[from] FormatError),
}

/// Problems with a format template or with `%s` argument rendering.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("not enough arguments for format string: expected {expected}, got {given}")]
    NotEnoughArguments { expected: usize, given: usize },

    #[error("not all arguments converted: expected {expected}, got {given}")]
    TooManyArguments { expected: usize, given: usize },

    #[error("unsupported format character '{0}' at index {1}")]
    UnsupportedConversion(char, usize),

    #[error("incomplete format at end of template")]
    Incomplete,

    #[error("unknown placeholder `%({0})`")]
    UnknownPlaceholder(String),

    #[error("unterminated placeholder starting at index {0}")]
    UnterminatedPlaceholder(usize),

    #[error("field width in placeholder at index {index} exceeds {max}")]
    WidthTooLarge { index: usize, max: usize },

    #[error("invalid date format `{0}`")]
    InvalidDateFormat(String),
}
