//! Upload workflow: upload the selected documents, then index the namespace.

use docchat_api::{DocumentFile, FileRef, IndexResult, RetrievalBackend, UploadResult};
use docchat_core::{AppError, AppResult, Namespace};
use std::path::PathBuf;
use std::sync::Arc;

use crate::selection::collect_documents;
use crate::status::StatusReporter;

/// Status shown while the upload request is in flight.
pub const STATUS_UPLOADING: &str = "Uploading…";

/// Terminal result of one [`UploadController::submit`].
#[derive(Debug)]
pub enum UploadOutcome {
    /// Both steps succeeded; this is the completion signal for the workflow root.
    Indexed {
        upload: UploadResult,
        index: IndexResult,
    },

    /// The upload was rejected; indexing was not attempted.
    UploadFailed(AppError),

    /// Documents are stored but not indexed.
    IndexFailed {
        upload: UploadResult,
        error: AppError,
    },
}

impl UploadOutcome {
    /// The index result when the whole sequence succeeded.
    pub fn completion(&self) -> Option<&IndexResult> {
        match self {
            UploadOutcome::Indexed { index, .. } => Some(index),
            _ => None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.completion().is_some()
    }
}

/// Drives upload → index for a namespace and keeps the status line.
pub struct UploadController {
    backend: Arc<dyn RetrievalBackend>,
    selected: Vec<DocumentFile>,
    status: String,
    reporter: StatusReporter,
}

impl UploadController {
    pub fn new(backend: Arc<dyn RetrievalBackend>) -> Self {
        Self {
            backend,
            selected: Vec::new(),
            status: String::new(),
            reporter: StatusReporter::noop(),
        }
    }

    /// Publish status changes through `reporter` as well.
    pub fn with_reporter(mut self, reporter: StatusReporter) -> Self {
        self.reporter = reporter;
        self
    }

    /// Replace the selection.
    pub fn select(&mut self, files: Vec<DocumentFile>) {
        tracing::debug!("Selected {} files", files.len());
        self.selected = files;
    }

    /// Replace the selection with the documents found at `paths`.
    ///
    /// On error the previous selection is kept.
    pub async fn select_paths(&mut self, paths: &[PathBuf]) -> AppResult<usize> {
        let files = collect_documents(paths).await?;
        let count = files.len();
        self.select(files);
        Ok(count)
    }

    /// `{name, size}` of every selected file, in selection order.
    pub fn selected_files(&self) -> Vec<FileRef> {
        self.selected.iter().map(DocumentFile::reference).collect()
    }

    /// Current status line; empty before the first submit.
    pub fn status(&self) -> &str {
        &self.status
    }

    fn set_status(&mut self, status: String) {
        self.reporter.emit(&status);
        self.status = status;
    }

    /// Upload the selection to `namespace`, then index it.
    ///
    /// Strictly sequential with no rollback: a failed upload never reaches
    /// indexing, and a failed index leaves the uploaded documents in place.
    /// Every failure ends up as the status line. The selection is kept in
    /// all cases so a retry is another `submit`.
    pub async fn submit(&mut self, namespace: &Namespace) -> UploadOutcome {
        tracing::info!(namespace = %namespace, files = self.selected.len(), "Submitting upload");
        self.set_status(STATUS_UPLOADING.to_string());

        let upload = match self
            .backend
            .upload_documents(namespace, &self.selected)
            .await
        {
            Ok(upload) => upload,
            Err(error) => {
                tracing::warn!("Upload failed: {}", error);
                self.set_status(error.to_string());
                return UploadOutcome::UploadFailed(error);
            }
        };

        self.set_status(uploaded_status(&upload));

        match self.backend.trigger_indexing(namespace).await {
            Ok(index) => {
                self.set_status(indexed_status(&index));
                UploadOutcome::Indexed { upload, index }
            }
            Err(error) => {
                tracing::warn!(
                    namespace = %namespace,
                    "Indexing failed after a successful upload: {}",
                    error
                );
                self.set_status(error.to_string());
                UploadOutcome::IndexFailed { upload, error }
            }
        }
    }
}

fn uploaded_status(upload: &UploadResult) -> String {
    format!(
        "Uploaded {} files to {}. Now indexing…",
        upload.count, upload.namespace
    )
}

fn indexed_status(index: &IndexResult) -> String {
    format!(
        "Indexed: {} points from {} files.",
        index.points_upserted, index.files_indexed
    )
}
