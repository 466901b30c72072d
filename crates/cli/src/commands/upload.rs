//! Upload command handler.
//!
//! Uploads documents to the namespace and indexes them in one go.

use clap::Args;
use docchat_api::create_backend;
use docchat_core::{config::AppConfig, AppResult};
use docchat_workflow::{render_listing, StatusReporter, UploadOutcome, WorkflowRoot};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

/// Upload documents and index them
#[derive(Args, Debug)]
pub struct UploadCommand {
    /// Files or directories to upload (directories contribute .pdf, .txt and .md files)
    pub paths: Vec<PathBuf>,

    /// Output the outcome as JSON
    #[arg(long)]
    pub json: bool,
}

impl UploadCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<ExitCode> {
        tracing::info!("Executing upload command");
        tracing::debug!("Upload options: {:?}", self);

        let backend = create_backend(config)?;

        // Status lines go to stderr when stdout carries JSON.
        let json = self.json;
        let reporter = StatusReporter::new(Arc::new(move |status: &str| {
            if json {
                eprintln!("{}", status);
            } else {
                println!("{}", status);
            }
        }));

        let mut root = WorkflowRoot::from_config(backend, config).with_status_reporter(reporter);
        root.upload_mut().select_paths(&self.paths).await?;

        let listing = render_listing(&root.upload().selected_files());
        if !listing.is_empty() && !self.json {
            println!("{}", listing);
        }

        let outcome = root.submit_upload().await?;

        if self.json {
            let output = outcome_json(root.namespace().as_str(), &outcome);
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Ok(if outcome.is_success() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        })
    }
}

fn outcome_json(namespace: &str, outcome: &UploadOutcome) -> serde_json::Value {
    match outcome {
        UploadOutcome::Indexed { upload, index } => serde_json::json!({
            "namespace": namespace,
            "upload": upload,
            "index": index,
        }),
        UploadOutcome::UploadFailed(error) => serde_json::json!({
            "namespace": namespace,
            "error": error.to_string(),
            "stage": "upload",
        }),
        UploadOutcome::IndexFailed { upload, error } => serde_json::json!({
            "namespace": namespace,
            "upload": upload,
            "error": error.to_string(),
            "stage": "index",
        }),
    }
}
