//! Configuration management commands

use crate::console::CliConsole;
use anyhow::bail;
use colored::*;
use dialoguer::{theme::ColorfulTheme, Confirm};
use std::path::Path;
use tablon_core::config::{format_api_key_status, load_from_file, save_to_file, validate_config};
use tablon_core::TablonConfig;

/// Show the effective configuration
pub async fn show(config_file: &Path) -> anyhow::Result<()> {
    let console = CliConsole::new(true);
    console.print_header("Configuration");

    if config_file.exists() {
        console.success(&format!("Loaded configuration from: {}", config_file.display()));
    } else {
        console.warn(&format!("Configuration file not found: {}", config_file.display()));
        console.info("Using default configuration");
    }
    let config = load_from_file(config_file)?;
    print_config(&console, &config);
    Ok(())
}

/// Validate configuration
pub async fn validate(config_file: &Path) -> anyhow::Result<()> {
    let console = CliConsole::new(true);
    console.print_header("Configuration Validation");

    if !config_file.exists() {
        bail!("Configuration file not found: {}", config_file.display());
    }

    let config = match load_from_file(config_file) {
        Ok(config) => config,
        Err(e) => {
            console.error(&format!("Failed to load configuration: {e}"));
            return Err(e.into());
        }
    };
    console.success("Configuration file loaded successfully");

    if let Err(e) = validate_config(&config) {
        console.error(&format!("Configuration validation failed: {e}"));
        return Err(e.into());
    }
    console.success("Configuration is valid");

    let key_info = config.backend.get_api_key_info();
    let status = format_api_key_status(config.backend.provider, &key_info);
    if key_info.is_valid() {
        console.success(&status);
    } else {
        console.warn(&status);
    }
    Ok(())
}

/// Initialize a new configuration file
pub async fn init(config_file: &Path, force: bool) -> anyhow::Result<()> {
    let console = CliConsole::new(true);
    console.print_header("Configuration Initialization");

    if config_file.exists() && !force {
        let overwrite = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("{} exists. Overwrite?", config_file.display()))
            .default(false)
            .interact()
            .unwrap_or(false);
        if !overwrite {
            console.info("Use --force to overwrite");
            bail!("Configuration file already exists: {}", config_file.display());
        }
    }

    save_to_file(&TablonConfig::default(), config_file)?;
    console.success(&format!("Created configuration file: {}", config_file.display()));
    console.info("Set GEMINI_API_KEY (or TABLON_GOOGLE_API_KEY) before running a filter");
    Ok(())
}

fn print_config(console: &CliConsole, config: &TablonConfig) {
    let backend = &config.backend;
    console.print_header("Backend");
    console.field("Provider", &backend.provider.to_string().green().to_string());
    console.field("Model", &backend.model.yellow().to_string());
    console.field("Base URL", &backend.get_base_url());
    let key_info = backend.get_api_key_info();
    console.field(
        "API key",
        &key_info
            .masked_key()
            .map(|k| format!("{} ({})", k, key_info.source))
            .unwrap_or_else(|| "not set".red().to_string()),
    );
    if let Some(temperature) = backend.temperature {
        console.field("Temperature", &temperature.to_string());
    }
    if let Some(max_tokens) = backend.max_output_tokens {
        console.field("Max output tokens", &max_tokens.to_string());
    }
    console.field(
        "Timeouts",
        &format!(
            "connect {}s, request {}s",
            backend.timeouts.connection_timeout_secs, backend.timeouts.request_timeout_secs
        ),
    );

    let storage = &config.storage;
    console.print_header("Storage");
    console.field("Location", &storage.location().cyan().to_string());
    if let Some(key) = &storage.service_account_key {
        console.field("Service account", &key.display().to_string());
    }
    console.field("Dropped columns", &storage.dropped_columns.join(", "));

    console.print_header("Export");
    console.field("Format", &config.export.format.to_string());
    console.field("Archive", &config.export.archive_path().display().to_string());

    console.print_header("Other");
    console.field("Prompt language", &config.prompt.language.to_string());
    console.field("Log level", &config.logging.level);
}
