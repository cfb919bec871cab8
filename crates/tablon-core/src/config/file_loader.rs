//! Configuration file loading and saving

use super::TablonConfig;
use crate::error::{TablonError, TablonResult};
use std::fs;
use std::path::Path;
use tracing::debug;

enum FileKind {
    Toml,
    Yaml,
    Json,
}

fn file_kind(path: &Path) -> FileKind {
    match path.extension().and_then(|s| s.to_str()) {
        Some("toml") => FileKind::Toml,
        Some("yaml") | Some("yml") => FileKind::Yaml,
        _ => FileKind::Json,
    }
}

/// Load configuration from a file; a missing file yields the defaults
pub fn load_from_file(path: &Path) -> TablonResult<TablonConfig> {
    if !path.exists() {
        debug!("Config file {} not found, using defaults", path.display());
        return Ok(TablonConfig::default());
    }

    let content = fs::read_to_string(path).map_err(|e| {
        TablonError::config_with_context(
            format!("Failed to read config file: {}", e),
            format!("Reading configuration from {}", path.display()),
        )
    })?;

    let config = match file_kind(path) {
        FileKind::Toml => toml::from_str(&content).map_err(|e| {
            TablonError::config_with_context(
                format!("Invalid TOML config: {}", e),
                format!("Parsing {}", path.display()),
            )
        })?,
        FileKind::Yaml => serde_yaml::from_str(&content).map_err(|e| {
            TablonError::config_with_context(
                format!("Invalid YAML config: {}", e),
                format!("Parsing {}", path.display()),
            )
        })?,
        FileKind::Json => serde_json::from_str(&content).map_err(|e| {
            TablonError::config_with_context(
                format!("Invalid JSON config: {}", e),
                format!("Parsing {}", path.display()),
            )
        })?,
    };

    Ok(config)
}

/// Write configuration to a file, format chosen by extension
pub fn save_to_file(config: &TablonConfig, path: &Path) -> TablonResult<()> {
    let content = match file_kind(path) {
        FileKind::Toml => toml::to_string_pretty(config)
            .map_err(|e| TablonError::config(format!("Failed to serialize config: {}", e)))?,
        FileKind::Yaml => serde_yaml::to_string(config)
            .map_err(|e| TablonError::config(format!("Failed to serialize config: {}", e)))?,
        FileKind::Json => serde_json::to_string_pretty(config)?,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| TablonError::io_with_path(e.to_string(), parent.display().to_string()))?;
    }
    fs::write(path, content)
        .map_err(|e| TablonError::io_with_path(e.to_string(), path.display().to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LlmProvider, StorageKind};
    use crate::export::ExportFormat;
    use crate::prompt::PromptLanguage;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_from_file(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, TablonConfig::default());
    }

    #[test]
    fn test_load_partial_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tablon.toml");
        fs::write(
            &path,
            r#"
[backend]
provider = "openai"
model = "gpt-4o"

[storage]
kind = "local"
root = "/srv/data"
object = "imports.csv"

[export]
format = "csv"

[prompt]
language = "en"
"#,
        )
        .unwrap();

        let config = load_from_file(&path).unwrap();
        assert_eq!(config.backend.provider, LlmProvider::OpenAI);
        assert_eq!(config.backend.model, "gpt-4o");
        assert_eq!(config.backend.timeouts.request_timeout_secs, 60);
        assert_eq!(config.storage.kind, StorageKind::Local);
        assert_eq!(config.storage.object, "imports.csv");
        assert_eq!(config.storage.dropped_columns, vec!["YEAR", "MES"]);
        assert_eq!(config.export.format, ExportFormat::Csv);
        assert_eq!(config.prompt.language, PromptLanguage::En);
    }

    #[test]
    fn test_load_yaml_and_json() {
        let dir = TempDir::new().unwrap();

        let yaml = dir.path().join("tablon.yaml");
        fs::write(&yaml, "logging:\n  level: debug\n  format: json\n").unwrap();
        let config = load_from_file(&yaml).unwrap();
        assert_eq!(config.logging.level, "debug");

        let json = dir.path().join("tablon.json");
        fs::write(&json, r#"{"backend": {"model": "gemini-1.5-pro"}}"#).unwrap();
        let config = load_from_file(&json).unwrap();
        assert_eq!(config.backend.model, "gemini-1.5-pro");
        assert_eq!(config.backend.provider, LlmProvider::Google);
    }

    #[test]
    fn test_invalid_content_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "[backend\nmodel = ").unwrap();
        let err = load_from_file(&path).unwrap_err();
        assert!(matches!(err, TablonError::Config { .. }));
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("tablon.toml");
        let mut config = TablonConfig::default();
        config.backend.model = "gemini-1.5-pro".to_string();
        save_to_file(&config, &path).unwrap();
        assert_eq!(load_from_file(&path).unwrap(), config);
    }
}
