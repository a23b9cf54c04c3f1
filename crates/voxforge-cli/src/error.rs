//! CLI-specific error types and mappings.
//!
//! This module provides the error type for the CLI adapter and maps studio
//! and settings errors to exit codes and user-facing messages.

use thiserror::Error;
use voxforge_core::{SettingsError, StudioError};

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// A studio operation failed.
    #[error("{0}")]
    Studio(String),

    /// The request or arguments were rejected.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// The studio is busy with another job.
    #[error("{0}")]
    Busy(String),

    /// IO error (terminal, file not found, etc.).
    #[error("IO error: {0}")]
    Io(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow Unix conventions:
    /// - 0: Success
    /// - 1: General error
    /// - 2: Misuse of shell command (invalid arguments)
    /// - 64-78: Reserved for specific error categories (see sysexits.h)
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Studio(_) => 1,
            Self::Arguments(_) => 2, // EX_USAGE
            Self::Busy(_) => 75,     // EX_TEMPFAIL
            Self::Io(_) => 74,       // EX_IOERR
            Self::Config(_) => 78,   // EX_CONFIG
        }
    }
}

impl From<StudioError> for CliError {
    fn from(err: StudioError) -> Self {
        match err {
            StudioError::Busy => Self::Busy(err.to_string()),
            StudioError::InvalidRequest(_)
            | StudioError::UnknownVoice(_)
            | StudioError::CharacterBudgetExceeded { .. }
            | StudioError::Catalog(_)
            | StudioError::Training(_) => Self::Arguments(err.to_string()),
            StudioError::Synthesis(_) | StudioError::Cancelled | StudioError::ServiceStopped => {
                Self::Studio(err.to_string())
            }
        }
    }
}

impl From<SettingsError> for CliError {
    fn from(err: SettingsError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
