//! Configuration management for the DocChat client.
//!
//! This module handles loading and merging configuration from multiple sources:
//! - Defaults
//! - Config file (`.docchat/config.yaml`)
//! - Environment variables
//! - Command-line flags
//!
//! The backend address is fixed once resolved; nothing renegotiates it at runtime.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};
use crate::namespace::Namespace;

/// Default backend address.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Default lexical/semantic blend weight.
pub const DEFAULT_ALPHA: f64 = 0.6;

/// Default retrieval breadth.
pub const DEFAULT_TOP_K: u32 = 4;

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the retrieval backend
    pub base_url: String,

    /// Initial namespace for the session
    pub namespace: Namespace,

    /// Initial blend weight for asks
    pub alpha: f64,

    /// Initial retrieval breadth for asks
    pub top_k: u32,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    backend: Option<BackendSection>,
    namespace: Option<String>,
    chat: Option<ChatSection>,
    logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct BackendSection {
    #[serde(rename = "baseUrl")]
    base_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatSection {
    alpha: Option<f64>,
    #[serde(rename = "topK")]
    top_k: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            namespace: Namespace::default(),
            alpha: DEFAULT_ALPHA,
            top_k: DEFAULT_TOP_K,
            config_file: None,
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from the config file, environment variables and defaults.
    ///
    /// Environment variables:
    /// - `DOCCHAT_CONFIG`: Path to config file
    /// - `DOCCHAT_BASE_URL`: Backend base URL
    /// - `DOCCHAT_NAMESPACE`: Initial namespace
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use docchat_core::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load config");
    /// println!("Backend: {}", config.base_url);
    /// ```
    pub fn load() -> AppResult<Self> {
        Self::load_from(None)
    }

    /// Like [`AppConfig::load`], but an explicit `config_file` wins over `DOCCHAT_CONFIG`.
    pub fn load_from(config_file: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self::default();

        config.config_file = config_file.or_else(|| {
            std::env::var("DOCCHAT_CONFIG").ok().map(PathBuf::from)
        });

        let config_path = config
            .config_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(".docchat/config.yaml"));

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        } else if config.config_file.is_some() {
            return Err(AppError::Config(format!(
                "Config file does not exist: {:?}",
                config_path
            )));
        }

        // Environment variables override YAML config
        if let Ok(base_url) = std::env::var("DOCCHAT_BASE_URL") {
            config.base_url = base_url;
        }

        if let Ok(namespace) = std::env::var("DOCCHAT_NAMESPACE") {
            config.namespace = Namespace::new(namespace);
        }

        if let Ok(level) = std::env::var("RUST_LOG") {
            config.log_level = Some(level);
        }

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into this config.
    pub fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();
        result.config_file = Some(path.to_path_buf());

        if let Some(base_url) = config_file.backend.and_then(|b| b.base_url) {
            result.base_url = base_url;
        }

        if let Some(namespace) = config_file.namespace {
            result.namespace = Namespace::new(namespace);
        }

        if let Some(chat) = config_file.chat {
            if let Some(alpha) = chat.alpha {
                result.alpha = alpha;
            }
            if let Some(top_k) = chat.top_k {
                result.top_k = top_k;
            }
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// Command-line flags take precedence over the environment and config file.
    pub fn with_overrides(
        mut self,
        base_url: Option<String>,
        namespace: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(base_url) = base_url {
            self.base_url = base_url;
        }

        if let Some(namespace) = namespace {
            self.namespace = Namespace::new(namespace);
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Validate the resolved configuration.
    ///
    /// `alpha` and `top_k` are pass-through knobs and are not range-checked here.
    pub fn validate(&self) -> AppResult<()> {
        let url = self.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(AppError::Config(format!(
                "Backend URL must start with http:// or https://: {}",
                self.base_url
            )));
        }

        if url.trim_start_matches("https://").trim_start_matches("http://").is_empty() {
            return Err(AppError::Config("Backend URL has no host".to_string()));
        }

        Ok(())
    }
}
