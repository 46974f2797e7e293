//! Error types for todo-board
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad args, invalid config, blank title)
//! - 3: Not found (unknown todo id)
//! - 4: Operation failed (io error, lock contention)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the todo-board CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const NOT_FOUND: i32 = 3;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for todo-board operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Title is required")]
    TitleRequired,

    // Not found (exit code 3)
    #[error("Todo {id} not found in list '{list}'")]
    TodoNotFound { list: String, id: u64 },

    // Operation failures (exit code 4)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Template error: {0}")]
    Template(#[from] liquid::Error),

    #[error("Lock acquisition failed: {0}")]
    LockFailed(PathBuf),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            // User errors
            Error::InvalidConfig(_)
            | Error::InvalidArgument(_)
            | Error::TitleRequired
            | Error::TomlParse(_)
            | Error::Yaml(_) => exit_codes::USER_ERROR,

            Error::TodoNotFound { .. } => exit_codes::NOT_FOUND,

            // Operation failures
            Error::Io(_)
            | Error::Json(_)
            | Error::TomlSerialize(_)
            | Error::Template(_)
            | Error::LockFailed(_)
            | Error::OperationFailed(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// Structured fields for machine-readable output, when the variant has any
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Error::TodoNotFound { list, id } => Some(serde_json::json!({
                "list": list,
                "id": id,
            })),
            Error::LockFailed(path) => Some(serde_json::json!({
                "path": path.display().to_string(),
            })),
            _ => None,
        }
    }
}

/// Result type alias for todo-board operations
pub type Result<T> = std::result::Result<T, Error>;

/// Wrapper for displaying errors in JSON format
#[derive(serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&Error> for JsonError {
    fn from(err: &Error) -> Self {
        JsonError {
            error: err.to_string(),
            code: err.exit_code(),
            details: err.details(),
        }
    }
}
