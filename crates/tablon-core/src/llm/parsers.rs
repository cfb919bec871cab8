//! Response parsing for the supported providers

use crate::error::{TablonError, TablonResult};
use serde_json::Value;

/// Text extracted from a provider response
#[derive(Debug, Clone, PartialEq)]
pub struct LlmResponse {
    pub content: String,
    pub model: Option<String>,
    pub finish_reason: Option<String>,
}

/// Response parser for each provider's wire format
pub struct ResponseParser;

impl ResponseParser {
    /// Parse a Gemini `generateContent` response.
    ///
    /// Text parts of the first candidate are concatenated. A prompt blocked
    /// by the safety filter, or a candidate with no text, is an error.
    pub fn parse_google(response: Value, model: &str) -> TablonResult<LlmResponse> {
        if let Some(reason) = response["promptFeedback"]["blockReason"].as_str() {
            return Err(TablonError::translation_unavailable_with_provider(
                format!("request blocked by the backend: {}", reason),
                "google",
            ));
        }

        let candidate = &response["candidates"][0];
        let content: String = candidate["content"]["parts"]
            .as_array()
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|part| part["text"].as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();
        let finish_reason = candidate["finishReason"].as_str().map(|s| s.to_string());

        if content.trim().is_empty() {
            return Err(TablonError::translation_unavailable_with_provider(
                format!(
                    "empty response (finish reason: {})",
                    finish_reason.as_deref().unwrap_or("unknown")
                ),
                "google",
            ));
        }

        Ok(LlmResponse {
            content,
            model: response["modelVersion"]
                .as_str()
                .map(|s| s.to_string())
                .or_else(|| Some(model.to_string())),
            finish_reason,
        })
    }

    /// Parse an OpenAI-compatible chat completion response
    pub fn parse_openai(response: Value) -> TablonResult<LlmResponse> {
        let choice = &response["choices"][0];
        let content = choice["message"]["content"]
            .as_str()
            .unwrap_or("")
            .to_string();
        let finish_reason = choice["finish_reason"].as_str().map(|s| s.to_string());

        if content.trim().is_empty() {
            return Err(TablonError::translation_unavailable_with_provider(
                format!(
                    "empty response (finish reason: {})",
                    finish_reason.as_deref().unwrap_or("unknown")
                ),
                "openai",
            ));
        }

        Ok(LlmResponse {
            content,
            model: response["model"].as_str().map(|s| s.to_string()),
            finish_reason,
        })
    }
}
