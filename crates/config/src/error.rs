//! Error types for configuration loading and scoped overrides.
//!
//! Responsibilities:
//! - Define error variants for `.env` loading, field population and value conversion.
//! - Define the usage error raised by the flat override entry point.
//!
//! Does NOT handle:
//! - Lookup ambiguity inside override scopes (logged, never an error; see `scope`).
//!
//! Invariants:
//! - All error variants include context for debugging (variable names, paths, etc.).
//! - Dotenv errors NEVER include raw .env line contents to prevent secret leakage.

use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading `.env` files or populating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("required field: environment variable `{var}` must be defined")]
    RequiredField { var: String },

    #[error("empty field: environment variable `{var}` cannot be empty")]
    EmptyField { var: String },

    #[error("missing time layout for environment variable `{var}` of type time")]
    TimeLayoutRequired { var: String },

    #[error("invalid value for environment variable `{var}`: {message}")]
    InvalidValue { var: String, message: String },

    #[error("field `{0}` is not declared in the schema")]
    UnknownField(String),

    #[error("field `{field}` holds a {found} value, expected {expected}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("unable to determine the current directory: {0}")]
    CurrentDir(#[source] std::io::Error),

    /// Failed to parse the `.env` file due to invalid syntax.
    ///
    /// SAFETY: This error only includes the byte index of the parse failure,
    /// NOT the offending line content, to prevent leaking secrets.
    #[error(
        "failed to parse .env file {} at position {error_index}. Hint: set DOTENV_DISABLED=1 to skip .env loading",
        .path.display()
    )]
    DotenvParse { path: PathBuf, error_index: usize },

    /// Failed to read the `.env` file due to an I/O error.
    #[error("failed to read .env file {}: {kind}", .path.display())]
    DotenvIo { path: PathBuf, kind: ErrorKind },

    /// Unknown dotenv error (future variants from dotenvy crate).
    ///
    /// SAFETY: This error does not include any raw dotenv content.
    #[error(
        "failed to load .env file {}. Hint: set DOTENV_DISABLED=1 to skip .env loading",
        .path.display()
    )]
    DotenvUnknown { path: PathBuf },
}

impl ConfigError {
    /// Map a dotenvy error onto a variant that never carries file content.
    pub(crate) fn from_dotenv(path: PathBuf, err: dotenvy::Error) -> Self {
        match err {
            dotenvy::Error::LineParse(_, error_index) => {
                ConfigError::DotenvParse { path, error_index }
            }
            dotenvy::Error::Io(io_err) => ConfigError::DotenvIo {
                path,
                kind: io_err.kind(),
            },
            _ => ConfigError::DotenvUnknown { path },
        }
    }
}

/// Misuse of the override entry points.
///
/// This signals a programming mistake, not a runtime condition: callers are
/// expected to treat it as fatal to the operation that made the call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OverrideError {
    #[error("run_with_override requires an even number of arguments (got {count})")]
    OddArguments { count: usize },
}

/// Conversion failures from a raw environment string to a typed value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValueError {
    #[error("`{value}` is not a valid {target}")]
    Int { value: String, target: &'static str },

    #[error("`{value}` is not a valid {target}")]
    Float { value: String, target: &'static str },

    #[error("`{0}` is not a valid boolean")]
    Bool(String),

    #[error("`{value}` does not match time layout `{layout}`")]
    Time { value: String, layout: String },

    #[error("`{value}` is not a valid duration: {reason}")]
    Duration { value: String, reason: String },
}
