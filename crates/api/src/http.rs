//! HTTP implementation of the retrieval backend.
//!
//! Talks JSON and multipart to the DocChat FastAPI service:
//! `POST /upload/`, `POST /index/`, `POST /ask/`, `GET /search/`,
//! `GET /ingest/preview`, `GET /health`.

use crate::backend::RetrievalBackend;
use crate::types::{
    AskRequest, AskResult, DocumentFile, HealthStatus, IndexResult, PreviewQuery,
    PreviewResponse, SearchQuery, SearchResponse, UploadResult,
};
use docchat_core::{AppError, AppResult, Namespace};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// FastAPI error body: `{"detail": "..."}`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

/// Retrieval backend reached over HTTP.
pub struct HttpBackend {
    /// Base URL without a trailing slash
    base_url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpBackend {
    /// Create a backend client for `base_url` (e.g. `http://127.0.0.1:8000`).
    pub fn new(base_url: impl Into<String>) -> AppResult<Self> {
        let base_url = base_url.into();
        reqwest::Url::parse(&base_url)
            .map_err(|e| AppError::Config(format!("Invalid backend URL {}: {}", base_url, e)))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Build the multipart body for an upload.
    fn upload_form(namespace: &Namespace, files: &[DocumentFile]) -> Form {
        files.iter().fold(
            Form::new().text("namespace", namespace.to_string()),
            |form, file| {
                let part = Part::bytes(file.content.clone()).file_name(file.name.clone());
                form.part("files", part)
            },
        )
    }

    async fn send(
        operation: &'static str,
        request: reqwest::RequestBuilder,
    ) -> AppResult<reqwest::Response> {
        request.send().await.map_err(|e| {
            AppError::Network(format!(
                "Failed to send {} request: {}",
                operation.to_lowercase(),
                e
            ))
        })
    }

    /// Map a non-success status to a transport error, otherwise decode the body.
    async fn read_response<T: DeserializeOwned>(
        operation: &'static str,
        response: reqwest::Response,
    ) -> AppResult<T> {
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = extract_detail(&body);
            tracing::warn!(
                operation,
                status = status.as_u16(),
                detail = ?detail,
                "Backend returned an error status"
            );
            return Err(AppError::Transport {
                operation,
                status: status.as_u16(),
                detail,
            });
        }

        response.json::<T>().await.map_err(|e| {
            AppError::Serialization(format!(
                "Failed to parse {} response: {}",
                operation.to_lowercase(),
                e
            ))
        })
    }
}

/// Pull a string `detail` out of an error body, if there is one.
fn extract_detail(body: &str) -> Option<String> {
    match serde_json::from_str::<ErrorBody>(body).ok()?.detail {
        serde_json::Value::String(detail) => Some(detail),
        _ => None,
    }
}

#[async_trait::async_trait]
impl RetrievalBackend for HttpBackend {
    fn endpoint(&self) -> &str {
        &self.base_url
    }

    async fn upload_documents(
        &self,
        namespace: &Namespace,
        files: &[DocumentFile],
    ) -> AppResult<UploadResult> {
        tracing::info!(namespace = %namespace, files = files.len(), "Uploading documents");

        let request = self
            .client
            .post(self.url("/upload/"))
            .multipart(Self::upload_form(namespace, files));

        let response = Self::send("Upload", request).await?;
        let result: UploadResult = Self::read_response("Upload", response).await?;

        tracing::info!(count = result.count, namespace = %result.namespace, "Upload accepted");
        Ok(result)
    }

    async fn trigger_indexing(&self, namespace: &Namespace) -> AppResult<IndexResult> {
        tracing::info!(namespace = %namespace, "Triggering indexing");

        let request = self
            .client
            .post(self.url("/index/"))
            .query(&[("namespace", namespace.as_str())]);

        let response = Self::send("Index", request).await?;
        let result: IndexResult = Self::read_response("Index", response).await?;

        tracing::info!(
            points_upserted = result.points_upserted,
            files_indexed = result.files_indexed,
            "Indexing finished"
        );
        Ok(result)
    }

    async fn ask_question(&self, request: &AskRequest) -> AppResult<AskResult> {
        tracing::info!(namespace = %request.namespace, "Sending question");
        tracing::debug!("Ask request: {:?}", request);

        let http_request = self.client.post(self.url("/ask/")).json(request);

        let response = Self::send("Ask", http_request).await?;
        let result: AskResult = Self::read_response("Ask", response).await?;

        tracing::info!(citations = result.citations.len(), "Received answer");
        tracing::debug!("Ask result: {:?}", result);
        Ok(result)
    }

    async fn search(&self, query: &SearchQuery) -> AppResult<SearchResponse> {
        tracing::info!(namespace = %query.namespace, k = query.k, "Searching");

        let request = self.client.get(self.url("/search/")).query(query);

        let response = Self::send("Search", request).await?;
        let result: SearchResponse = Self::read_response("Search", response).await?;

        tracing::info!(results = result.results.len(), "Search finished");
        Ok(result)
    }

    async fn preview_chunks(&self, query: &PreviewQuery) -> AppResult<PreviewResponse> {
        tracing::info!(namespace = %query.namespace, filename = %query.filename, "Previewing chunks");

        let request = self.client.get(self.url("/ingest/preview")).query(query);

        let response = Self::send("Preview", request).await?;
        let result: PreviewResponse = Self::read_response("Preview", response).await?;

        tracing::info!(
            total_chunks = result.total_chunks,
            shown = result.preview.len(),
            "Preview received"
        );
        Ok(result)
    }

    async fn health(&self) -> AppResult<HealthStatus> {
        tracing::debug!("Checking backend health at {}", self.base_url);

        let request = self.client.get(self.url("/health"));

        let response = Self::send("Health", request).await?;
        let status: HealthStatus = Self::read_response("Health", response).await?;

        tracing::info!(status = %status.status, "Health check finished");
        Ok(status)
    }
}
