//! Retrieval API client for the DocChat backend.
//!
//! This crate provides typed access to the three workflow operations
//! (upload, index, ask) plus the backend's read-only helpers (search,
//! chunk preview, health). Every operation is a single request/response
//! round trip: no caching, no retries, no streaming.
//!
//! # Example
//! ```no_run
//! use docchat_api::{AskRequest, HttpBackend, RetrievalBackend};
//! use docchat_core::Namespace;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = HttpBackend::new("http://127.0.0.1:8000")?;
//! let request = AskRequest::new(Namespace::new("research"), "What is RAG?");
//! let result = backend.ask_question(&request).await?;
//! println!("{}", result.answer);
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod factory;
pub mod http;
pub mod types;

// Re-export main types
pub use backend::RetrievalBackend;
pub use factory::create_backend;
pub use http::HttpBackend;
pub use types::{
    AnswerMode, AskRequest, AskResult, ChunkMetadata, Citation, DocumentFile, FileRef,
    HealthStatus, IndexResult, PreviewChunk, PreviewQuery, PreviewResponse, SavedFile,
    SearchHit, SearchQuery, SearchResponse, UploadResult,
};
