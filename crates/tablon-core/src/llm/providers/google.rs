//! Google (Gemini) provider implementation

use super::error_utils::{handle_http_error, handle_parse_error, handle_request_error};
use crate::config::BackendConfig;
use crate::error::{TablonError, TablonResult};
use crate::llm::parsers::{LlmResponse, ResponseParser};
use reqwest::Client;
use serde_json::{Value, json};
use tracing::{debug, instrument};

/// Google (Gemini) provider handler
pub struct GoogleProvider {
    config: BackendConfig,
    http_client: Client,
}

impl GoogleProvider {
    pub fn new(config: BackendConfig, http_client: Client) -> Self {
        Self {
            config,
            http_client,
        }
    }

    /// Single-turn `generateContent` request body
    pub(crate) fn request_body(&self, instruction: &str) -> Value {
        let mut request_body = json!({
            "contents": [{
                "role": "user",
                "parts": [{"text": instruction}]
            }],
        });

        let mut generation_config = json!({});
        if let Some(max_tokens) = self.config.max_output_tokens {
            generation_config["maxOutputTokens"] = json!(max_tokens);
        }
        if let Some(temperature) = self.config.temperature {
            generation_config["temperature"] = json!(temperature);
        }
        if generation_config
            .as_object()
            .is_some_and(|obj| !obj.is_empty())
        {
            request_body["generationConfig"] = generation_config;
        }

        request_body
    }

    #[instrument(skip(self, instruction), fields(model = %self.config.model), level = "debug")]
    pub async fn generate(&self, instruction: &str) -> TablonResult<LlmResponse> {
        let api_key = self.config.get_api_key().ok_or_else(|| {
            TablonError::translation_unavailable_with_provider(
                "Google API key not provided",
                "google",
            )
        })?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.get_base_url(),
            self.config.model
        );

        let response = self
            .http_client
            .post(&url)
            .query(&[("key", api_key.as_str())])
            .json(&self.request_body(instruction))
            .send()
            .await
            .map_err(|e| handle_request_error(e, "google"))?;

        if !response.status().is_success() {
            return Err(handle_http_error(response, "google").await);
        }

        let response_json: Value = response
            .json()
            .await
            .map_err(|e| handle_parse_error(e, "google"))?;

        let parsed = ResponseParser::parse_google(response_json, &self.config.model)?;
        debug!(
            finish_reason = parsed.finish_reason.as_deref().unwrap_or("unknown"),
            chars = parsed.content.len(),
            "Google response received"
        );
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LlmProvider;

    #[test]
    fn test_request_body_carries_generation_config() {
        let mut config = BackendConfig::new(LlmProvider::Google);
        config.temperature = Some(0.0);
        config.max_output_tokens = Some(256);
        let provider = GoogleProvider::new(config, Client::new());

        let body = provider.request_body("filtra toyota");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "filtra toyota");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 256);
        assert_eq!(body["generationConfig"]["temperature"], 0.0);
    }

    #[test]
    fn test_request_body_without_generation_config() {
        let mut config = BackendConfig::new(LlmProvider::Google);
        config.temperature = None;
        config.max_output_tokens = None;
        let body = GoogleProvider::new(config, Client::new()).request_body("x");
        assert!(body.get("generationConfig").is_none());
    }
}
