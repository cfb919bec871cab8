//! Provider implementations

pub mod error_utils;
mod google;
mod openai;

pub use google::GoogleProvider;
pub use openai::OpenAiProvider;

use crate::error::TablonResult;
use crate::llm::parsers::LlmResponse;

/// Unified provider enum that wraps every provider implementation
pub enum ProviderInstance {
    Google(GoogleProvider),
    OpenAI(OpenAiProvider),
}

impl ProviderInstance {
    pub async fn generate(&self, instruction: &str) -> TablonResult<LlmResponse> {
        match self {
            Self::Google(p) => p.generate(instruction).await,
            Self::OpenAI(p) => p.generate(instruction).await,
        }
    }
}
