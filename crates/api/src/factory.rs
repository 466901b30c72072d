//! Backend factory.
//!
//! Builds the retrieval backend from application configuration.

use crate::backend::RetrievalBackend;
use crate::http::HttpBackend;
use docchat_core::{AppConfig, AppResult};
use std::sync::Arc;

/// Create the retrieval backend described by `config`.
///
/// The configuration is validated first; the base URL is fixed for the
/// lifetime of the returned client.
pub fn create_backend(config: &AppConfig) -> AppResult<Arc<dyn RetrievalBackend>> {
    config.validate()?;

    let backend = HttpBackend::new(config.base_url.trim())?;
    tracing::debug!("Using retrieval backend at {}", backend.endpoint());

    Ok(Arc::new(backend))
}
