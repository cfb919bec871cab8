use crate::error::TablonResult;
use async_trait::async_trait;

/// Turns a compiled instruction into raw backend text.
///
/// Implementations fail with `TranslationUnavailable` when the backend cannot
/// be reached or returns no text.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, instruction: &str) -> TablonResult<String>;
}
