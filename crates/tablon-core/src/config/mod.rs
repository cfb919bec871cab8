//! Configuration management

mod backend;
pub mod file_loader;
mod logging;
mod storage;
mod validation;

pub use backend::{
    format_api_key_status, mask_api_key, ApiKeyInfo, ApiKeySource, BackendConfig, LlmProvider,
    TimeoutConfig, CONNECTION_TIMEOUT_SECS, REQUEST_TIMEOUT_SECS,
};
pub use file_loader::{load_from_file, save_to_file};
pub use logging::{LogFormat, LoggingConfig};
pub use storage::{StorageConfig, StorageKind};
pub use validation::validate_config;

use crate::export::ExportFormat;
use crate::prompt::PromptLanguage;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default configuration file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "tablon.toml";

/// Export section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub format: ExportFormat,
    /// File name of the archive written by the shell
    pub archive_name: String,
    pub output_dir: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: ExportFormat::Xlsx,
            archive_name: "filtered_dataframe.zip".to_string(),
            output_dir: PathBuf::from("."),
        }
    }
}

impl ExportConfig {
    pub fn archive_path(&self) -> PathBuf {
        self.output_dir.join(&self.archive_name)
    }
}

/// Prompt section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    pub language: PromptLanguage,
}

/// Top-level Tablon configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TablonConfig {
    pub backend: BackendConfig,
    pub storage: StorageConfig,
    pub export: ExportConfig,
    pub prompt: PromptConfig,
    pub logging: LoggingConfig,
}

impl TablonConfig {
    /// Load from `path` and validate
    pub fn load(path: &std::path::Path) -> crate::error::TablonResult<Self> {
        let config = load_from_file(path)?;
        validate_config(&config)?;
        Ok(config)
    }
}
