//! Retrieval backend abstraction.
//!
//! The workflow controllers talk to the backend only through this trait, so
//! the HTTP transport can be swapped for a scripted double in tests.

use docchat_core::{AppResult, Namespace};

use crate::types::{
    AskRequest, AskResult, DocumentFile, HealthStatus, IndexResult, PreviewQuery,
    PreviewResponse, SearchQuery, SearchResponse, UploadResult,
};

/// Operations exposed by the retrieval backend.
///
/// Each call resolves exactly once, with either the decoded success body or
/// an error. A non-success HTTP status is reported as `AppError::Transport`.
#[async_trait::async_trait]
pub trait RetrievalBackend: Send + Sync {
    /// Human-readable backend address, for logs and banners.
    fn endpoint(&self) -> &str;

    /// Send `files` to be stored under `namespace`.
    ///
    /// An empty `files` slice is forwarded as-is; the backend decides whether
    /// that is acceptable.
    async fn upload_documents(
        &self,
        namespace: &Namespace,
        files: &[DocumentFile],
    ) -> AppResult<UploadResult>;

    /// Embed and upsert every unindexed document in `namespace`.
    async fn trigger_indexing(&self, namespace: &Namespace) -> AppResult<IndexResult>;

    /// Answer a question from the namespace's index.
    async fn ask_question(&self, request: &AskRequest) -> AppResult<AskResult>;

    /// Raw fused retrieval results, without answer generation.
    async fn search(&self, query: &SearchQuery) -> AppResult<SearchResponse>;

    /// Preview how a stored file is chunked.
    async fn preview_chunks(&self, query: &PreviewQuery) -> AppResult<PreviewResponse>;

    /// Liveness probe.
    async fn health(&self) -> AppResult<HealthStatus>;
}
