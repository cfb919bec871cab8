//! Configuration validation

use super::{StorageKind, TablonConfig};
use crate::error::{TablonError, TablonResult};

/// Check a loaded configuration before a session starts
pub fn validate_config(config: &TablonConfig) -> TablonResult<()> {
    let backend = &config.backend;
    if backend.model.trim().is_empty() {
        return Err(TablonError::invalid_input_field(
            "Model name cannot be empty",
            "backend.model",
        ));
    }
    if let Some(temperature) = backend.temperature {
        if !(0.0..=2.0).contains(&temperature) {
            return Err(TablonError::invalid_input_field(
                format!("Temperature must be between 0.0 and 2.0, got {}", temperature),
                "backend.temperature",
            ));
        }
    }
    if backend.max_output_tokens == Some(0) {
        return Err(TablonError::invalid_input_field(
            "max_output_tokens must be greater than 0",
            "backend.max_output_tokens",
        ));
    }
    if backend.timeouts.connection_timeout_secs == 0 || backend.timeouts.request_timeout_secs == 0 {
        return Err(TablonError::invalid_input_field(
            "Timeouts must be greater than 0",
            "backend.timeouts",
        ));
    }
    if let Some(base_url) = &backend.base_url {
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(TablonError::invalid_input_field(
                format!("Base URL must start with http:// or https://: {}", base_url),
                "backend.base_url",
            ));
        }
    }

    let storage = &config.storage;
    if storage.kind == StorageKind::Gcs
        && storage.bucket.as_deref().is_none_or(|b| b.trim().is_empty())
    {
        return Err(TablonError::invalid_input_field(
            "A bucket is required for gcs storage",
            "storage.bucket",
        ));
    }
    if storage.object.trim().is_empty() {
        return Err(TablonError::invalid_input_field(
            "Dataset object cannot be empty",
            "storage.object",
        ));
    }

    if config.export.archive_name.trim().is_empty() {
        return Err(TablonError::invalid_input_field(
            "Archive name cannot be empty",
            "export.archive_name",
        ));
    }

    Ok(())
}
