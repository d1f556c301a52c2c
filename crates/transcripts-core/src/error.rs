//! Error types and exit codes for the transcripts pipeline
//!
//! Exit codes:
//! - 0: Success
//! - 1: Generic failure (write/serialize errors)
//! - 2: Usage error (bad flags/args)
//! - 3: Data error (missing or malformed input, invalid config)

mod macros;

use std::path::PathBuf;
use thiserror::Error;

/// Process exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success (0)
    Success = 0,
    /// Generic failure (1)
    Failure = 1,
    /// Usage error - bad flags/args (2)
    Usage = 2,
    /// Data error - missing input, invalid JSON, invalid config (3)
    Data = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

/// Errors that can occur while building the archive
#[derive(Error, Debug)]
pub enum ArchiveError {
    // Usage errors (exit code 2)
    #[error("{0}")]
    UsageError(String),

    #[error("invalid {context}: {value}")]
    InvalidValue { context: String, value: String },

    // Data errors (exit code 3)
    #[error("input file not found: {path:?}")]
    InputNotFound { path: PathBuf },

    #[error("invalid input in {path:?}: {reason}")]
    InvalidInput { path: PathBuf, reason: String },

    #[error("invalid config in {path:?}: {reason}")]
    InvalidConfig { path: PathBuf, reason: String },

    // Generic failures (exit code 1)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to {operation} {target}: {reason}")]
    FailedOperationWithTarget {
        operation: String,
        target: String,
        reason: String,
    },

    #[error("{0}")]
    Other(String),
}

impl ArchiveError {
    /// Create an error for a failed IO operation with context
    pub fn io_operation(
        operation: &str,
        path: impl std::fmt::Display,
        error: impl std::fmt::Display,
    ) -> Self {
        ArchiveError::FailedOperationWithTarget {
            operation: operation.to_string(),
            target: path.to_string(),
            reason: error.to_string(),
        }
    }

    /// Create an error for an invalid value or configuration
    pub fn invalid_value(context: &str, value: impl std::fmt::Display) -> Self {
        ArchiveError::InvalidValue {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an error for an input file that cannot be used
    pub fn invalid_input(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        ArchiveError::InvalidInput {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            ArchiveError::UsageError(_) | ArchiveError::InvalidValue { .. } => ExitCode::Usage,

            ArchiveError::InputNotFound { .. }
            | ArchiveError::InvalidInput { .. }
            | ArchiveError::InvalidConfig { .. } => ExitCode::Data,

            ArchiveError::Io(_)
            | ArchiveError::Json(_)
            | ArchiveError::FailedOperationWithTarget { .. }
            | ArchiveError::Other(_) => ExitCode::Failure,
        }
    }

    /// Get the error type identifier
    pub fn error_type(&self) -> &'static str {
        match self {
            ArchiveError::UsageError(_) => "usage_error",
            ArchiveError::InvalidValue { .. } => "invalid_value",
            ArchiveError::InputNotFound { .. } => "input_not_found",
            ArchiveError::InvalidInput { .. } => "invalid_input",
            ArchiveError::InvalidConfig { .. } => "invalid_config",
            ArchiveError::Io(_) => "io_error",
            ArchiveError::Json(_) => "json_error",
            ArchiveError::FailedOperationWithTarget { .. } => "failed_operation_with_target",
            ArchiveError::Other(_) => "other",
        }
    }

    /// Convert error to JSON representation for structured error output
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.exit_code() as i32,
                "type": self.error_type(),
                "message": self.to_string(),
            }
        })
    }
}

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, ArchiveError>;
