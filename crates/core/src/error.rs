//! Error types for the DocChat client.
//!
//! This module defines a unified error enum covering configuration, I/O,
//! backend transport and serialization failures.

use thiserror::Error;

/// Unified error type for the DocChat client.
///
/// All fallible functions in the workspace return `Result<T, AppError>`.
/// Backend failures are values, never panics; the workflow layer turns them
/// into user-visible text.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backend answered with a non-success HTTP status.
    ///
    /// `operation` is the capitalised operation label ("Upload", "Index", "Ask", ...).
    #[error("{operation} failed: {status}{}", detail_suffix(.detail))]
    Transport {
        operation: &'static str,
        status: u16,
        detail: Option<String>,
    },

    /// The request never produced an HTTP status (connection refused, body unreadable, ...)
    #[error("Network error: {0}")]
    Network(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

fn detail_suffix(detail: &Option<String>) -> String {
    match detail {
        Some(d) if !d.is_empty() => format!(" ({})", d),
        _ => String::new(),
    }
}

impl AppError {
    /// Build a transport error for an operation without a backend detail.
    pub fn transport(operation: &'static str, status: u16) -> Self {
        AppError::Transport {
            operation,
            status,
            detail: None,
        }
    }

    /// HTTP status carried by a transport error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::Transport { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
