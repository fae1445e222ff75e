//! CLI exit codes for scripting and automation.
//!
//! Responsibilities:
//! - Define structured exit codes that scripts can use to distinguish failures.
//! - Map command errors to exit codes.
//!
//! Does NOT handle:
//! - Error message formatting (handled by anyhow Display).
//!
//! Invariants:
//! - Exit code 2 always means a required variable was missing or empty.

use std::path::PathBuf;

use thiserror::Error;

/// Structured exit codes for envscope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Success - command completed successfully.
    Success = 0,

    /// General error - no `.env` file found, unreadable file, or other failure.
    GeneralError = 1,

    /// Validation error - one or more required variables are missing or empty.
    ///
    /// Scripts should provide the variables and not retry unchanged.
    ValidationError = 2,
}

impl ExitCode {
    /// Convert the exit code to an i32 for use with std::process::exit().
    pub const fn as_i32(self) -> i32 {
        self as u8 as i32
    }
}

/// Failures raised by the command handlers themselves.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("No .env file found in {} or any parent directory", .dir.display())]
    EnvFileNotFound { dir: PathBuf },

    #[error("{} required variable(s) failed validation:\n  {}", .failures.len(), .failures.join("\n  "))]
    RequiredMissing { failures: Vec<String> },
}

impl From<&CommandError> for ExitCode {
    fn from(err: &CommandError) -> Self {
        match err {
            CommandError::EnvFileNotFound { .. } => ExitCode::GeneralError,
            CommandError::RequiredMissing { .. } => ExitCode::ValidationError,
        }
    }
}

/// Extension trait for anyhow::Error to extract exit codes.
pub trait ExitCodeExt {
    /// Returns ExitCode::GeneralError if no `CommandError` is in the chain.
    fn exit_code(&self) -> ExitCode;
}

impl ExitCodeExt for anyhow::Error {
    fn exit_code(&self) -> ExitCode {
        self.chain()
            .find_map(|cause| cause.downcast_ref::<CommandError>())
            .map_or(ExitCode::GeneralError, ExitCode::from)
    }
}
