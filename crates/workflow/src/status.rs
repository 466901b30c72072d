//! Status-line reporting for the upload workflow.
//!
//! Every status change is logged and, when a callback is installed, pushed to
//! the front end as it happens.

use std::sync::Arc;

/// Callback receiving each new status line.
pub type StatusCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// Publishes status-line changes.
#[derive(Clone, Default)]
pub struct StatusReporter {
    callback: Option<StatusCallback>,
}

impl StatusReporter {
    /// Create a reporter with a callback.
    pub fn new(callback: StatusCallback) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    /// Create a reporter that only logs.
    pub fn noop() -> Self {
        Self { callback: None }
    }

    pub fn emit(&self, status: &str) {
        tracing::debug!(status, "Status changed");

        if let Some(callback) = &self.callback {
            callback(status);
        }
    }
}

impl std::fmt::Debug for StatusReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusReporter")
            .field("callback", &self.callback.is_some())
            .finish()
    }
}
