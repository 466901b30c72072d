//! Ask command handler.
//!
//! Sends one question to the namespace's index and prints the cited answer.

use clap::Args;
use docchat_api::create_backend;
use docchat_core::{config::AppConfig, AppError, AppResult};
use docchat_workflow::ChatController;
use std::process::ExitCode;

/// Ask a single question
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub question: String,

    /// Lexical/semantic blend weight (0.0 - 1.0, passed through unchecked)
    #[arg(long, allow_negative_numbers = true)]
    pub alpha: Option<f64>,

    /// Number of source chunks to retrieve
    #[arg(short = 'k', long)]
    pub top_k: Option<u32>,

    /// Output the raw answer as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<ExitCode> {
        tracing::info!("Executing ask command");
        tracing::debug!("Ask command options: {:?}", self);

        let backend = create_backend(config)?;
        let mut chat = ChatController::new(backend).with_tuning(
            self.alpha.unwrap_or(config.alpha),
            self.top_k.unwrap_or(config.top_k),
        );

        let pending = chat
            .begin_send(&config.namespace, &self.question)
            .ok_or_else(|| AppError::Config("No question provided".to_string()))?;
        let reply = pending.resolve().await;

        if self.json {
            match &reply.outcome {
                Ok(result) => println!("{}", serde_json::to_string_pretty(result)?),
                Err(error) => eprintln!("{}", error),
            }
        } else {
            println!("{}", chat.complete(&reply).text());
        }

        Ok(if reply.outcome.is_ok() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        })
    }
}
