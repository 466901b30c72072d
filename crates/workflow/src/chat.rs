//! Chat workflow: questions in, cited answers out.
//!
//! A send is split in three so several asks can be in flight without sharing
//! the controller across tasks:
//! 1. [`ChatController::begin_send`] appends the user entry and returns a [`PendingAsk`]
//! 2. [`PendingAsk::resolve`] performs the network call and owns everything it needs
//! 3. [`ChatController::complete`] appends the assistant entry
//!
//! Replies are appended in whatever order they are completed.

use docchat_api::{AskRequest, AskResult, RetrievalBackend};
use docchat_core::{config, AppError, AppResult, Namespace};
use std::sync::Arc;

use crate::conversation::{ConversationLog, ExchangeEntry};

/// Render an answer followed by its sources block.
///
/// ```text
/// <answer>
///
/// Sources:
/// - <label 1>
/// - <label 2>
/// ```
///
/// With no citations the block is a single `- (none)` line.
pub fn format_answer(result: &AskResult) -> String {
    let sources = if result.citations.is_empty() {
        "- (none)".to_string()
    } else {
        result
            .citations
            .iter()
            .map(|c| format!("- {}", c.label))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!("{}\n\nSources:\n{}", result.answer, sources)
}

/// Render a failed ask.
pub fn format_error(error: &AppError) -> String {
    format!("Error: {}", error)
}

/// An ask that has been logged on the user side but not yet sent.
pub struct PendingAsk {
    seq: u64,
    backend: Arc<dyn RetrievalBackend>,
    request: AskRequest,
}

impl PendingAsk {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn request(&self) -> &AskRequest {
        &self.request
    }

    /// Send the question. Resolves exactly once; there is no timeout.
    pub async fn resolve(self) -> AskReply {
        tracing::debug!(seq = self.seq, "Resolving ask");
        let outcome = self.backend.ask_question(&self.request).await;

        if let Err(ref e) = outcome {
            tracing::warn!(seq = self.seq, "Ask failed: {}", e);
        }

        AskReply {
            seq: self.seq,
            outcome,
        }
    }
}

/// The resolution of a [`PendingAsk`].
#[derive(Debug)]
pub struct AskReply {
    pub seq: u64,
    pub outcome: AppResult<AskResult>,
}

impl AskReply {
    /// The assistant entry this reply turns into.
    pub fn to_entry(&self) -> ExchangeEntry {
        match &self.outcome {
            Ok(result) => ExchangeEntry::assistant(format_answer(result)),
            Err(error) => ExchangeEntry::assistant(format_error(error)),
        }
    }
}

/// Owns the conversation log and the per-query tuning knobs.
pub struct ChatController {
    backend: Arc<dyn RetrievalBackend>,
    log: ConversationLog,
    input: String,
    alpha: f64,
    top_k: u32,
    next_seq: u64,
}

impl ChatController {
    /// Create a controller with `alpha` 0.6 and `top_k` 4.
    pub fn new(backend: Arc<dyn RetrievalBackend>) -> Self {
        Self {
            backend,
            log: ConversationLog::new(),
            input: String::new(),
            alpha: config::DEFAULT_ALPHA,
            top_k: config::DEFAULT_TOP_K,
            next_seq: 0,
        }
    }

    pub fn with_tuning(mut self, alpha: f64, top_k: u32) -> Self {
        self.alpha = alpha;
        self.top_k = top_k;
        self
    }

    pub fn log(&self) -> &ConversationLog {
        &self.log
    }

    /// Text typed but not yet sent.
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Takes effect from the next send; not range-checked.
    pub fn set_alpha(&mut self, alpha: f64) {
        self.alpha = alpha;
    }

    pub fn top_k(&self) -> u32 {
        self.top_k
    }

    /// Takes effect from the next send; not range-checked.
    pub fn set_top_k(&mut self, top_k: u32) {
        self.top_k = top_k;
    }

    /// Log the question and prepare its ask.
    ///
    /// Returns `None` (and changes nothing) when the trimmed question is empty.
    /// Otherwise the user entry is appended and the pending input cleared
    /// before anything touches the network.
    pub fn begin_send(&mut self, namespace: &Namespace, question: &str) -> Option<PendingAsk> {
        let question = question.trim();
        if question.is_empty() {
            return None;
        }

        self.log.append(ExchangeEntry::user(question));
        self.input.clear();

        let seq = self.next_seq;
        self.next_seq += 1;

        tracing::info!(seq, namespace = %namespace, top_k = self.top_k, alpha = self.alpha, "Asking");

        Some(PendingAsk {
            seq,
            backend: self.backend.clone(),
            request: AskRequest::new(namespace.clone(), question)
                .with_top_k(self.top_k)
                .with_alpha(self.alpha),
        })
    }

    /// Append the assistant entry for a resolved ask.
    pub fn complete(&mut self, reply: &AskReply) -> &ExchangeEntry {
        self.log.append(reply.to_entry());
        &self.log.entries()[self.log.len() - 1]
    }

    /// Ask `question` and wait for the answer.
    ///
    /// Appends exactly one user entry and one assistant entry, or nothing at
    /// all for a blank question. Returns the assistant entry.
    pub async fn send(&mut self, namespace: &Namespace, question: &str) -> Option<&ExchangeEntry> {
        let pending = self.begin_send(namespace, question)?;
        let reply = pending.resolve().await;
        Some(self.complete(&reply))
    }

    /// Send whatever is in the pending input.
    pub async fn send_input(&mut self, namespace: &Namespace) -> Option<&ExchangeEntry> {
        let question = std::mem::take(&mut self.input);
        self.send(namespace, &question).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::Role;
    use crate::testing::{answered, Call, ScriptedBackend};
    use docchat_api::Citation;

    #[test]
    fn test_format_answer_with_citations() {
        let result = answered("Paris.", &["A", "B"]);
        let text = format_answer(&result);
        assert_eq!(text, "Paris.\n\nSources:\n- A\n- B");
        assert!(text.ends_with("Sources:\n- A\n- B"));
    }

    #[test]
    fn test_format_answer_without_citations() {
        let result = answered("Hello there!", &[]);
        assert!(format_answer(&result).ends_with("Sources:\n- (none)"));
    }

    #[test]
    fn test_format_answer_keeps_backend_order() {
        let result = AskResult {
            answer: "x".to_string(),
            citations: vec![
                Citation::new("z.pdf (page 9)"),
                Citation::new("a.md"),
                Citation::new("m.txt"),
            ],
            mode: None,
        };
        assert!(format_answer(&result).ends_with("- z.pdf (page 9)\n- a.md\n- m.txt"));
    }

    #[test]
    fn test_format_error() {
        let err = AppError::transport("Ask", 500);
        assert_eq!(format_error(&err), "Error: Ask failed: 500");
    }

    #[tokio::test]
    async fn test_send_appends_user_then_assistant() {
        let backend =
            Arc::new(ScriptedBackend::new().answer("What is RAG?", Ok(answered("Retrieval.", &["doc.md"]))));
        let mut chat = ChatController::new(backend.clone());

        let reply = chat
            .send(&Namespace::default(), "  What is RAG?  ")
            .await
            .map(|e| e.text().to_string());

        assert_eq!(reply.as_deref(), Some("Retrieval.\n\nSources:\n- doc.md"));
        let entries = chat.log().entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], ExchangeEntry::user("What is RAG?"));
        assert_eq!(entries[1].role(), Role::Assistant);
    }

    #[tokio::test]
    async fn test_blank_question_is_noop() {
        let backend = Arc::new(ScriptedBackend::new());
        let mut chat = ChatController::new(backend.clone());

        for blank in ["", "   ", "\n\t"] {
            assert!(chat.send(&Namespace::default(), blank).await.is_none());
        }

        assert!(chat.log().is_empty());
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_failure_appends_error_entry() {
        let backend =
            Arc::new(ScriptedBackend::new().answer("q", Err(AppError::transport("Ask", 500))));
        let mut chat = ChatController::new(backend);

        chat.send(&Namespace::default(), "q").await;

        let last = chat.log().last().unwrap();
        assert_eq!(last.role(), Role::Assistant);
        assert_eq!(last.text(), "Error: Ask failed: 500");
        assert_eq!(chat.log().len(), 2);
    }

    #[tokio::test]
    async fn test_user_entry_and_cleared_input_before_network() {
        let backend = Arc::new(ScriptedBackend::new());
        let mut chat = ChatController::new(backend.clone());
        chat.set_input("draft question");

        let pending = chat
            .begin_send(&Namespace::default(), "draft question")
            .unwrap();

        assert_eq!(chat.log().entries(), &[ExchangeEntry::user("draft question")]);
        assert_eq!(chat.input(), "");
        assert!(backend.calls().is_empty());
        assert_eq!(pending.request().question, "draft question");
    }

    #[tokio::test]
    async fn test_tuning_is_read_per_send() {
        let backend = Arc::new(
            ScriptedBackend::new()
                .answer("one", Ok(answered("1", &[])))
                .answer("two", Ok(answered("2", &[]))),
        );
        let mut chat = ChatController::new(backend.clone());
        let ns = Namespace::new("docs");

        chat.send(&ns, "one").await;
        chat.set_alpha(0.2);
        chat.set_top_k(7);
        chat.send(&ns, "two").await;

        let asks: Vec<_> = backend
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Ask(request) => Some((request.question, request.top_k, request.alpha)),
                _ => None,
            })
            .collect();
        assert_eq!(
            asks,
            vec![("one".to_string(), 4, 0.6), ("two".to_string(), 7, 0.2)]
        );
    }

    #[tokio::test]
    async fn test_concurrent_sends_append_in_resolution_order() {
        let backend = Arc::new(
            ScriptedBackend::new()
                .answer("slow", Ok(answered("slow answer", &[])))
                .answer("fast", Ok(answered("fast answer", &[]))),
        );
        let mut chat = ChatController::new(backend);
        let ns = Namespace::default();

        let slow = chat.begin_send(&ns, "slow").unwrap();
        let fast = chat.begin_send(&ns, "fast").unwrap();
        assert!(slow.seq() < fast.seq());

        let fast_reply = fast.resolve().await;
        chat.complete(&fast_reply);
        let slow_reply = slow.resolve().await;
        chat.complete(&slow_reply);

        let texts: Vec<_> = chat.log().iter().map(|e| e.text().to_string()).collect();
        assert_eq!(
            texts,
            vec![
                "slow",
                "fast",
                "fast answer\n\nSources:\n- (none)",
                "slow answer\n\nSources:\n- (none)",
            ]
        );
    }

    #[tokio::test]
    async fn test_send_input_uses_pending_text() {
        let backend = Arc::new(ScriptedBackend::new().answer("typed", Ok(answered("ok", &[]))));
        let mut chat = ChatController::new(backend);
        chat.set_input("typed");

        assert!(chat.send_input(&Namespace::default()).await.is_some());
        assert_eq!(chat.input(), "");
        assert_eq!(chat.log().len(), 2);
    }
}
