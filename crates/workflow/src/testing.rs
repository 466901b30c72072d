//! Scripted backend double for workflow tests.

use async_trait::async_trait;
use docchat_api::{
    AskRequest, AskResult, Citation, DocumentFile, HealthStatus, IndexResult, PreviewQuery,
    PreviewResponse, RetrievalBackend, SearchQuery, SearchResponse, UploadResult,
};
use docchat_core::{AppError, AppResult, Namespace};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// A recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Upload { namespace: String, files: Vec<String> },
    Index { namespace: String },
    Ask(AskRequest),
}

/// Backend that replays scripted results and records every call.
#[derive(Default)]
pub(crate) struct ScriptedBackend {
    uploads: Mutex<VecDeque<AppResult<UploadResult>>>,
    indexes: Mutex<VecDeque<AppResult<IndexResult>>>,
    answers: Mutex<HashMap<String, AppResult<AskResult>>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn upload_returns(self, result: AppResult<UploadResult>) -> Self {
        self.uploads.lock().unwrap().push_back(result);
        self
    }

    pub(crate) fn index_returns(self, result: AppResult<IndexResult>) -> Self {
        self.indexes.lock().unwrap().push_back(result);
        self
    }

    pub(crate) fn answer(self, question: &str, result: AppResult<AskResult>) -> Self {
        self.answers
            .lock()
            .unwrap()
            .insert(question.to_string(), result);
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

pub(crate) fn uploaded(count: u64, namespace: &str) -> UploadResult {
    UploadResult {
        count,
        namespace: namespace.to_string(),
        files_saved: Vec::new(),
    }
}

pub(crate) fn answered(answer: &str, labels: &[&str]) -> AskResult {
    AskResult {
        answer: answer.to_string(),
        citations: labels.iter().map(|l| Citation::new(*l)).collect(),
        mode: None,
    }
}

fn unscripted(operation: &str) -> AppError {
    AppError::Other(format!("unscripted {} call", operation))
}

#[async_trait]
impl RetrievalBackend for ScriptedBackend {
    fn endpoint(&self) -> &str {
        "scripted://backend"
    }

    async fn upload_documents(
        &self,
        namespace: &Namespace,
        files: &[DocumentFile],
    ) -> AppResult<UploadResult> {
        self.record(Call::Upload {
            namespace: namespace.to_string(),
            files: files.iter().map(|f| f.name.clone()).collect(),
        });
        self.uploads
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(unscripted("upload")))
    }

    async fn trigger_indexing(&self, namespace: &Namespace) -> AppResult<IndexResult> {
        self.record(Call::Index {
            namespace: namespace.to_string(),
        });
        self.indexes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(unscripted("index")))
    }

    async fn ask_question(&self, request: &AskRequest) -> AppResult<AskResult> {
        self.record(Call::Ask(request.clone()));
        self.answers
            .lock()
            .unwrap()
            .remove(&request.question)
            .unwrap_or_else(|| Err(unscripted("ask")))
    }

    async fn search(&self, _query: &SearchQuery) -> AppResult<SearchResponse> {
        Err(unscripted("search"))
    }

    async fn preview_chunks(&self, _query: &PreviewQuery) -> AppResult<PreviewResponse> {
        Err(unscripted("preview"))
    }

    async fn health(&self) -> AppResult<HealthStatus> {
        Ok(HealthStatus {
            status: "ok".to_string(),
            message: "scripted".to_string(),
        })
    }
}
