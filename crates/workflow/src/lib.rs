//! Namespace-scoped workflow for document question answering.
//!
//! The workflow ties three backend phases together:
//! - **upload**: selected documents are sent to the backend under a namespace
//! - **index**: the backend embeds and upserts what was uploaded
//! - **ask**: questions are answered from the index, with cited sources
//!
//! [`WorkflowRoot`] owns the namespace and the top-level [`Phase`] and hands
//! the namespace to [`UploadController`] and [`ChatController`] per call.

pub mod chat;
pub mod conversation;
pub mod root;
pub mod selection;
pub mod status;
pub mod upload;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use chat::{format_answer, format_error, AskReply, ChatController, PendingAsk};
pub use conversation::{ConversationLog, ExchangeEntry, Role};
pub use root::{validate_transition, Phase, PhaseTrigger, WorkflowRoot};
pub use selection::{collect_documents, render_listing, ACCEPTED_EXTENSIONS};
pub use status::{StatusCallback, StatusReporter};
pub use upload::{UploadController, UploadOutcome};
