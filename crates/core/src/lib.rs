//! DocChat Core Library
//!
//! This crate provides the foundational utilities shared by the DocChat client:
//! - Error handling (`AppError`, `AppResult`)
//! - Logging infrastructure
//! - Configuration management
//! - The `Namespace` value that partitions a document corpus

pub mod config;
pub mod error;
pub mod logging;
pub mod namespace;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use namespace::Namespace;
