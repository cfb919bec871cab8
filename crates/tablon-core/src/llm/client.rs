//! HTTP text generator

use super::generator::TextGenerator;
use super::providers::{GoogleProvider, OpenAiProvider, ProviderInstance};
use crate::config::{BackendConfig, LlmProvider};
use crate::error::{TablonError, TablonResult};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};

/// Text generator backed by a remote model
pub struct LlmClient {
    provider: LlmProvider,
    model: String,
    instance: ProviderInstance,
}

impl LlmClient {
    /// Build the HTTP client and the provider handler.
    ///
    /// The API key is resolved per request, so a missing key surfaces as
    /// `TranslationUnavailable` on the first request rather than here.
    pub fn new(config: BackendConfig) -> TablonResult<Self> {
        let timeouts = config.timeouts;
        let http_client = Client::builder()
            .connect_timeout(timeouts.connection_timeout())
            .timeout(timeouts.request_timeout())
            .build()
            .map_err(|e| {
                TablonError::config_with_context(
                    format!("Failed to create HTTP client: {}", e),
                    format!("Initializing HTTP client for provider '{}'", config.provider),
                )
            })?;

        debug!(
            "Created HTTP client for '{}' with timeouts: connect={}s, request={}s",
            config.provider, timeouts.connection_timeout_secs, timeouts.request_timeout_secs
        );

        let provider = config.provider;
        let model = config.model.clone();
        let instance = match provider {
            LlmProvider::Google => ProviderInstance::Google(GoogleProvider::new(config, http_client)),
            LlmProvider::OpenAI => ProviderInstance::OpenAI(OpenAiProvider::new(config, http_client)),
        };

        Ok(Self {
            provider,
            model,
            instance,
        })
    }

    pub fn provider(&self) -> LlmProvider {
        self.provider
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl TextGenerator for LlmClient {
    async fn generate(&self, instruction: &str) -> TablonResult<String> {
        let response = self.instance.generate(instruction).await?;
        info!(
            provider = %self.provider,
            model = response.model.as_deref().unwrap_or(&self.model),
            "Backend returned {} chars",
            response.content.len()
        );
        Ok(response.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_follows_configured_provider() {
        let client = LlmClient::new(BackendConfig::new(LlmProvider::OpenAI).with_model("gpt-4o")).unwrap();
        assert_eq!(client.provider(), LlmProvider::OpenAI);
        assert_eq!(client.model(), "gpt-4o");
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_translation_unavailable() {
        let mut config = BackendConfig::new(LlmProvider::Google)
            .with_api_key("test-key-not-real")
            .with_base_url("http://127.0.0.1:9");
        config.timeouts.connection_timeout_secs = 1;
        config.timeouts.request_timeout_secs = 2;
        let client = LlmClient::new(config).unwrap();

        let err = client.generate("anything").await.unwrap_err();
        assert!(matches!(err, TablonError::TranslationUnavailable { .. }));
        assert!(!err.to_string().contains("test-key-not-real"));
    }
}
