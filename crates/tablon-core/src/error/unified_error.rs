//! UnifiedError trait implementation for TablonError

use super::types::{TablonError, UnifiedError};

impl UnifiedError for TablonError {
    fn error_code(&self) -> &str {
        match self {
            Self::Config { .. } => "TABLON_CONFIG",
            Self::DatasetUnavailable { .. } => "TABLON_DATASET_UNAVAILABLE",
            Self::TranslationUnavailable { .. } => "TABLON_TRANSLATION_UNAVAILABLE",
            Self::Predicate(fault) => fault.code(),
            Self::Export { .. } => "TABLON_EXPORT",
            Self::Io { .. } => "TABLON_IO",
            Self::Json { .. } => "TABLON_JSON",
            Self::Http { .. } => "TABLON_HTTP",
            Self::InvalidInput { .. } => "TABLON_INVALID_INPUT",
            Self::Other { .. } => "TABLON_OTHER",
        }
    }

    fn message(&self) -> &str {
        match self {
            Self::Config { message, .. } => message,
            Self::DatasetUnavailable { message, .. } => message,
            Self::TranslationUnavailable { message, .. } => message,
            Self::Predicate(fault) => fault.detail(),
            Self::Export { message, .. } => message,
            Self::Io { message, .. } => message,
            Self::Json { message, .. } => message,
            Self::Http { message, .. } => message,
            Self::InvalidInput { message, .. } => message,
            Self::Other { message, .. } => message,
        }
    }

    fn context(&self) -> Option<&str> {
        match self {
            Self::Config { context, .. } => context.as_deref(),
            Self::DatasetUnavailable { context, .. } => context.as_deref(),
            Self::TranslationUnavailable { context, .. } => context.as_deref(),
            Self::Predicate(_) => None,
            Self::Export { context, .. } => context.as_deref(),
            Self::Io { context, .. } => context.as_deref(),
            Self::Json { context, .. } => context.as_deref(),
            Self::Http { context, .. } => context.as_deref(),
            Self::InvalidInput { context, .. } => context.as_deref(),
            Self::Other { context, .. } => context.as_deref(),
        }
    }

    fn is_user_retryable(&self) -> bool {
        matches!(
            self,
            Self::TranslationUnavailable { .. } | Self::Predicate(_) | Self::Http { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::PredicateFault;

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(
            TablonError::dataset_unavailable("gone").error_code(),
            "TABLON_DATASET_UNAVAILABLE"
        );
        assert_eq!(
            TablonError::translation_unavailable("timeout").error_code(),
            "TABLON_TRANSLATION_UNAVAILABLE"
        );
        let fault = PredicateFault::reference("FOO", None);
        assert_eq!(TablonError::predicate(fault).error_code(), "TABLON_REFERENCE_FAULT");
    }

    #[test]
    fn test_context_is_exposed() {
        let err = TablonError::config("bad model").with_context("Validating backend section");
        assert_eq!(err.message(), "bad model");
        assert_eq!(err.context(), Some("Validating backend section"));
    }

    #[test]
    fn test_dataset_errors_are_not_user_retryable() {
        assert!(!TablonError::dataset_unavailable("auth").is_user_retryable());
        assert!(TablonError::translation_unavailable("empty").is_user_retryable());
    }
}
