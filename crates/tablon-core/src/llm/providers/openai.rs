//! OpenAI-compatible chat completion provider

use super::error_utils::{handle_http_error, handle_parse_error, handle_request_error};
use crate::config::BackendConfig;
use crate::error::{TablonError, TablonResult};
use crate::llm::parsers::{LlmResponse, ResponseParser};
use reqwest::Client;
use serde_json::{Value, json};
use tracing::{debug, instrument};

/// Handler for `/chat/completions` endpoints
pub struct OpenAiProvider {
    config: BackendConfig,
    http_client: Client,
}

impl OpenAiProvider {
    pub fn new(config: BackendConfig, http_client: Client) -> Self {
        Self {
            config,
            http_client,
        }
    }

    pub(crate) fn request_body(&self, instruction: &str) -> Value {
        let mut request_body = json!({
            "model": self.config.model,
            "messages": [{"role": "user", "content": instruction}],
        });
        if let Some(max_tokens) = self.config.max_output_tokens {
            request_body["max_tokens"] = json!(max_tokens);
        }
        if let Some(temperature) = self.config.temperature {
            request_body["temperature"] = json!(temperature);
        }
        request_body
    }

    #[instrument(skip(self, instruction), fields(model = %self.config.model), level = "debug")]
    pub async fn generate(&self, instruction: &str) -> TablonResult<LlmResponse> {
        let api_key = self.config.get_api_key().ok_or_else(|| {
            TablonError::translation_unavailable_with_provider(
                "OpenAI API key not provided",
                "openai",
            )
        })?;

        let url = format!("{}/chat/completions", self.config.get_base_url());

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(api_key)
            .json(&self.request_body(instruction))
            .send()
            .await
            .map_err(|e| handle_request_error(e, "openai"))?;

        if !response.status().is_success() {
            return Err(handle_http_error(response, "openai").await);
        }

        let response_json: Value = response
            .json()
            .await
            .map_err(|e| handle_parse_error(e, "openai"))?;

        let parsed = ResponseParser::parse_openai(response_json)?;
        debug!(
            finish_reason = parsed.finish_reason.as_deref().unwrap_or("unknown"),
            chars = parsed.content.len(),
            "OpenAI response received"
        );
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LlmProvider;

    #[test]
    fn test_request_body() {
        let config = BackendConfig::new(LlmProvider::OpenAI).with_model("gpt-4o");
        let body = OpenAiProvider::new(config, Client::new()).request_body("filter toyota");
        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "filter toyota");
        assert_eq!(body["max_tokens"], 1024);
    }
}
