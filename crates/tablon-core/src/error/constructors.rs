//! Constructor methods for TablonError

use super::types::TablonError;
use crate::predicate::PredicateFault;

impl TablonError {
    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: None,
        }
    }

    /// Create a configuration error with context
    pub fn config_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: Some(context.into()),
        }
    }

    /// Create a dataset-unavailable error
    pub fn dataset_unavailable(message: impl Into<String>) -> Self {
        Self::DatasetUnavailable {
            message: message.into(),
            source_label: None,
            context: None,
        }
    }

    /// Create a dataset-unavailable error naming the object that failed
    pub fn dataset_unavailable_at(message: impl Into<String>, source_label: impl Into<String>) -> Self {
        Self::DatasetUnavailable {
            message: message.into(),
            source_label: Some(source_label.into()),
            context: None,
        }
    }

    /// Create a translation-unavailable error
    pub fn translation_unavailable(message: impl Into<String>) -> Self {
        Self::TranslationUnavailable {
            message: message.into(),
            provider: None,
            context: None,
        }
    }

    /// Create a translation-unavailable error with provider
    pub fn translation_unavailable_with_provider(
        message: impl Into<String>,
        provider: impl Into<String>,
    ) -> Self {
        Self::TranslationUnavailable {
            message: message.into(),
            provider: Some(provider.into()),
            context: None,
        }
    }

    /// Wrap a sandbox fault
    pub fn predicate(fault: PredicateFault) -> Self {
        Self::Predicate(fault)
    }

    /// Create a new export error
    pub fn export(message: impl Into<String>) -> Self {
        Self::Export {
            message: message.into(),
            context: None,
        }
    }

    /// Create a new IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
            path: None,
            context: None,
        }
    }

    /// Create an IO error with path
    pub fn io_with_path(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
            path: Some(path.into()),
            context: None,
        }
    }

    /// Create a new JSON error
    pub fn json(message: impl Into<String>) -> Self {
        Self::Json {
            message: message.into(),
            context: None,
        }
    }

    /// Create a new HTTP error
    pub fn http(message: impl Into<String>) -> Self {
        Self::Http {
            message: message.into(),
            url: None,
            status_code: None,
            context: None,
        }
    }

    /// Create an invalid input error with field
    pub fn invalid_input_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            field: Some(field.into()),
            context: None,
        }
    }

    /// Create a generic error
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
            context: None,
        }
    }

    /// Attach context to an existing error, replacing any previous context.
    pub fn with_context(mut self, new_context: impl Into<String>) -> Self {
        let new_context = Some(new_context.into());
        match &mut self {
            Self::Config { context, .. }
            | Self::DatasetUnavailable { context, .. }
            | Self::TranslationUnavailable { context, .. }
            | Self::Export { context, .. }
            | Self::Io { context, .. }
            | Self::Json { context, .. }
            | Self::Http { context, .. }
            | Self::InvalidInput { context, .. }
            | Self::Other { context, .. } => *context = new_context,
            Self::Predicate(_) => {}
        }
        self
    }
}
