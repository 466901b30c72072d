//! Workflow root: the shared namespace and the top-level phase.
//!
//! Phase transitions:
//! - Upload -> Chat, only on the upload controller's completion signal
//! - Chat -> Upload, only on explicit user navigation
//! - Upload -> Upload on navigation is a no-op

use docchat_api::{IndexResult, RetrievalBackend};
use docchat_core::{AppConfig, AppError, AppResult, Namespace};
use std::fmt;
use std::sync::Arc;

use crate::chat::{ChatController, PendingAsk};
use crate::conversation::ExchangeEntry;
use crate::status::StatusReporter;
use crate::upload::{UploadController, UploadOutcome};

/// Which view is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Upload,
    Chat,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Upload => f.write_str("upload"),
            Phase::Chat => f.write_str("chat"),
        }
    }
}

/// What caused a phase change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseTrigger {
    /// Upload and indexing both succeeded
    Indexed,
    /// The user asked to go back
    Navigation,
}

/// Validate that `trigger` may move the workflow from `from` to `to`.
pub fn validate_transition(from: Phase, to: Phase, trigger: PhaseTrigger) -> AppResult<()> {
    let valid = matches!(
        (from, to, trigger),
        (Phase::Upload, Phase::Chat, PhaseTrigger::Indexed)
            | (Phase::Chat, Phase::Upload, PhaseTrigger::Navigation)
            | (Phase::Upload, Phase::Upload, PhaseTrigger::Navigation)
    );

    if valid {
        Ok(())
    } else {
        Err(AppError::Other(format!(
            "Cannot move from {} to {} on {:?}",
            from, to, trigger
        )))
    }
}

/// Holds the single namespace and the active phase, and owns both controllers.
///
/// The namespace is written only through [`WorkflowRoot::set_namespace`] and
/// handed to a controller by reference for each operation.
pub struct WorkflowRoot {
    namespace: Namespace,
    phase: Phase,
    upload: UploadController,
    chat: ChatController,
    last_index: Option<IndexResult>,
}

impl WorkflowRoot {
    pub fn new(backend: Arc<dyn RetrievalBackend>, namespace: Namespace) -> Self {
        Self {
            namespace,
            phase: Phase::Upload,
            upload: UploadController::new(backend.clone()),
            chat: ChatController::new(backend),
            last_index: None,
        }
    }

    /// Build a root with the configured namespace and tuning.
    pub fn from_config(backend: Arc<dyn RetrievalBackend>, config: &AppConfig) -> Self {
        let mut root = Self::new(backend.clone(), config.namespace.clone());
        root.chat = ChatController::new(backend).with_tuning(config.alpha, config.top_k);
        root
    }

    pub fn with_status_reporter(mut self, reporter: StatusReporter) -> Self {
        self.upload = self.upload.with_reporter(reporter);
        self
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Replace the namespace from user input; blank input means `"default"`.
    pub fn set_namespace(&mut self, input: &str) {
        self.namespace = Namespace::new(input);
        tracing::info!(namespace = %self.namespace, "Namespace changed");
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Result of the indexing run that last opened the chat phase.
    pub fn last_index(&self) -> Option<&IndexResult> {
        self.last_index.as_ref()
    }

    pub fn upload(&self) -> &UploadController {
        &self.upload
    }

    pub fn upload_mut(&mut self) -> &mut UploadController {
        &mut self.upload
    }

    pub fn chat(&self) -> &ChatController {
        &self.chat
    }

    pub fn chat_mut(&mut self) -> &mut ChatController {
        &mut self.chat
    }

    fn transition(&mut self, to: Phase, trigger: PhaseTrigger) -> AppResult<()> {
        validate_transition(self.phase, to, trigger)?;
        if self.phase != to {
            tracing::info!(from = %self.phase, to = %to, ?trigger, "Phase transition");
        }
        self.phase = to;
        Ok(())
    }

    /// Run upload → index for the current namespace.
    ///
    /// Moves to the chat phase when the controller signals completion.
    pub async fn submit_upload(&mut self) -> AppResult<UploadOutcome> {
        if self.phase != Phase::Upload {
            return Err(AppError::Other(
                "Uploads are only available in the upload phase".to_string(),
            ));
        }

        let outcome = self.upload.submit(&self.namespace).await;

        if let Some(index) = outcome.completion() {
            self.last_index = Some(*index);
            self.transition(Phase::Chat, PhaseTrigger::Indexed)?;
        }

        Ok(outcome)
    }

    /// Explicit user navigation back to the upload view.
    pub fn navigate_to_upload(&mut self) -> AppResult<()> {
        self.transition(Phase::Upload, PhaseTrigger::Navigation)
    }

    fn require_chat(&self) -> AppResult<()> {
        if self.phase == Phase::Chat {
            Ok(())
        } else {
            Err(AppError::Other(
                "Chat is available after documents are indexed".to_string(),
            ))
        }
    }

    /// Start an ask for the current namespace without waiting for it.
    pub fn begin_send(&mut self, question: &str) -> AppResult<Option<PendingAsk>> {
        self.require_chat()?;
        Ok(self.chat.begin_send(&self.namespace, question))
    }

    /// Ask and wait; returns the assistant entry, or `None` for a blank question.
    pub async fn send(&mut self, question: &str) -> AppResult<Option<&ExchangeEntry>> {
        self.require_chat()?;
        Ok(self.chat.send(&self.namespace, question).await)
    }
}
