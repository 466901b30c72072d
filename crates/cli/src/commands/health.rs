//! Health command handler.

use clap::Args;
use docchat_api::create_backend;
use docchat_core::{config::AppConfig, AppResult};
use std::process::ExitCode;

/// Check that the backend is reachable
#[derive(Args, Debug)]
pub struct HealthCommand {}

impl HealthCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<ExitCode> {
        let backend = create_backend(config)?;
        let health = backend.health().await?;

        println!("{}: {} ({})", backend.endpoint(), health.status, health.message);

        Ok(if health.status == "ok" {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        })
    }
}
