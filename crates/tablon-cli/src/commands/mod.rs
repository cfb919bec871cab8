//! Command implementations

pub mod apply;
pub mod config;
pub mod filter;
pub mod interactive;
pub mod prompt;
pub mod schema;

mod outcome;

use crate::console::CliConsole;
use anyhow::Context;
use std::path::PathBuf;
use std::sync::Arc;
use tablon_core::config::{format_api_key_status, ApiKeySource};
use tablon_core::{ExportFormat, FilterSession, LlmClient, PromptLanguage, TablonConfig};

/// Global flags shared by the session-backed commands
pub struct SessionOptions {
    pub config_file: PathBuf,
    pub verbose: bool,
    pub format: Option<ExportFormat>,
    pub language: Option<PromptLanguage>,
}

impl SessionOptions {
    /// Load and validate the config file, then apply command-line overrides
    pub fn load_config(&self) -> anyhow::Result<TablonConfig> {
        let mut config = TablonConfig::load(&self.config_file)
            .with_context(|| format!("Loading {}", self.config_file.display()))?;
        if let Some(format) = self.format {
            config.export.format = format;
        }
        if let Some(language) = self.language {
            config.prompt.language = language;
        }
        Ok(config)
    }
}

/// Build a session backed by the configured text-generation backend
pub fn build_session(config: &TablonConfig, console: &CliConsole) -> anyhow::Result<FilterSession> {
    let key_info = config.backend.get_api_key_info();
    let status = format_api_key_status(config.backend.provider, &key_info);
    match key_info.source {
        ApiKeySource::NotFound => console.warn(&status),
        _ => console.info(&status),
    }

    tracing::debug!(
        "Backend: provider={}, model={}",
        config.backend.provider,
        config.backend.model
    );
    let client = LlmClient::new(config.backend.clone())?;
    Ok(FilterSession::from_config(config, Arc::new(client))?)
}
