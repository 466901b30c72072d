//! Wire types for the retrieval backend.
//!
//! Field names follow the backend's JSON exactly (`top_k`, `points_upserted`, ...).

use docchat_core::{config, AppError, AppResult, Namespace};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::Path;

/// A document selected for upload, held in memory until submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentFile {
    /// File name sent as the multipart part's filename
    pub name: String,

    /// Raw file bytes
    pub content: Vec<u8>,
}

impl DocumentFile {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Read a document from disk, naming it after the path's final component.
    pub async fn from_path(path: &Path) -> AppResult<Self> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| AppError::Other(format!("Not a file path: {:?}", path)))?;

        let content = tokio::fs::read(path).await?;

        Ok(Self { name, content })
    }

    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }

    /// The `{name, size}` view of this document.
    pub fn reference(&self) -> FileRef {
        FileRef {
            name: self.name.clone(),
            size: self.size(),
        }
    }
}

/// A file the user selected but has not yet transmitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    pub name: String,

    /// Size in bytes
    pub size: u64,
}

impl FileRef {
    /// Size in kilobytes, rounded to the nearest integer.
    pub fn size_kb(&self) -> u64 {
        (self.size + 512) / 1024
    }
}

impl fmt::Display for FileRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "• {} ({} KB)", self.name, self.size_kb())
    }
}

/// Backend confirmation of an upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResult {
    /// Number of files accepted
    pub count: u64,

    /// Namespace the files were stored under
    pub namespace: String,

    /// Per-file details, when the backend reports them
    #[serde(default)]
    pub files_saved: Vec<SavedFile>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedFile {
    pub filename: String,
    pub size_kb: f64,
}

/// Backend confirmation of an indexing run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexResult {
    /// Retrieval units created
    pub points_upserted: u64,

    pub files_indexed: u64,
}

/// Human-readable reference to a source chunk backing an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub label: String,
}

impl Citation {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

/// How the backend routed a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnswerMode {
    #[serde(rename = "DOC_QA")]
    DocQa,
    #[serde(rename = "SMALL_TALK")]
    SmallTalk,
    #[serde(other)]
    Unknown,
}

/// Structured answer to one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AskResult {
    pub answer: String,

    /// Citations in backend order; a missing or null list reads as empty
    #[serde(default, deserialize_with = "null_as_empty")]
    pub citations: Vec<Citation>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<AnswerMode>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Citation>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Citation>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Body of `POST /ask/`.
///
/// `top_k` and `alpha` are forwarded untouched; the backend owns range checks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AskRequest {
    pub namespace: Namespace,
    pub question: String,
    pub top_k: u32,
    pub alpha: f64,
}

impl AskRequest {
    /// Create a request with the default tuning (`top_k` 4, `alpha` 0.6).
    pub fn new(namespace: Namespace, question: impl Into<String>) -> Self {
        Self {
            namespace,
            question: question.into(),
            top_k: config::DEFAULT_TOP_K,
            alpha: config::DEFAULT_ALPHA,
        }
    }

    pub fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }
}

/// Query string of `GET /search/`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchQuery {
    pub namespace: Namespace,
    #[serde(rename = "q")]
    pub query: String,
    pub k: u32,
    pub alpha: f64,
}

impl SearchQuery {
    /// Create a query with the backend's own defaults (`k` 8, `alpha` 0.6).
    pub fn new(namespace: Namespace, query: impl Into<String>) -> Self {
        Self {
            namespace,
            query: query.into(),
            k: 8,
            alpha: config::DEFAULT_ALPHA,
        }
    }
}

/// Fused retrieval results for a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub namespace: String,
    pub alpha: f64,
    #[serde(default)]
    pub results: Vec<SearchHit>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub score: f64,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub snippet: String,
}

/// Query string of `GET /ingest/preview`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewQuery {
    pub namespace: Namespace,
    pub filename: String,
    pub limit: u32,
}

impl PreviewQuery {
    pub fn new(namespace: Namespace, filename: impl Into<String>) -> Self {
        Self {
            namespace,
            filename: filename.into(),
            limit: 3,
        }
    }
}

/// First few chunks the backend would produce for a stored file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewResponse {
    pub namespace: String,
    pub filename: String,
    pub total_chunks: u64,
    #[serde(default)]
    pub preview: Vec<PreviewChunk>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewChunk {
    pub text: String,
    pub metadata: ChunkMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub filename: String,
    pub namespace: String,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub section: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub uploaded_at: Option<String>,
}

/// Response of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub message: String,
}
