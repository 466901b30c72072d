//! Command handlers for the DocChat CLI.
//!
//! This module organizes all CLI commands into separate submodules.

pub mod ask;
pub mod health;
pub mod preview;
pub mod search;
pub mod session;
pub mod upload;

// Re-export command types for convenience
pub use ask::AskCommand;
pub use health::HealthCommand;
pub use preview::PreviewCommand;
pub use search::SearchCommand;
pub use session::SessionCommand;
pub use upload::UploadCommand;
