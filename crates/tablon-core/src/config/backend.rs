//! Text-generation backend configuration and API key resolution

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Default connection timeout for backend APIs (30 seconds)
pub const CONNECTION_TIMEOUT_SECS: u64 = 30;

/// Default request timeout for backend APIs (60 seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Supported text-generation backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// Google Gemini (`generateContent`)
    #[default]
    Google,
    /// Any OpenAI-compatible chat completion endpoint
    OpenAI,
}

impl LlmProvider {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::OpenAI => "openai",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::Google => "https://generativelanguage.googleapis.com",
            Self::OpenAI => "https://api.openai.com/v1",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Self::Google => "gemini-1.5-flash",
            Self::OpenAI => "gpt-4o-mini",
        }
    }

    /// Standard environment variables holding this provider's key, in priority order
    pub fn standard_env_vars(&self) -> &'static [&'static str] {
        match self {
            Self::Google => &["GEMINI_API_KEY", "GOOGLE_API_KEY"],
            Self::OpenAI => &["OPENAI_API_KEY"],
        }
    }
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LlmProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "google" | "gemini" => Ok(Self::Google),
            "openai" => Ok(Self::OpenAI),
            _ => Err(format!("Unknown provider: {}", s)),
        }
    }
}

/// Timeouts applied to the HTTP client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    pub connection_timeout_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connection_timeout_secs: CONNECTION_TIMEOUT_SECS,
            request_timeout_secs: REQUEST_TIMEOUT_SECS,
        }
    }
}

impl TimeoutConfig {
    pub fn connection_timeout(&self) -> Duration {
        Duration::from_secs(self.connection_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Source of API key configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKeySource {
    /// From configuration file
    ConfigFile,
    /// From TABLON_<PROVIDER>_API_KEY environment variable
    TablonEnvVar,
    /// From standard environment variable (e.g., GEMINI_API_KEY)
    StandardEnvVar,
    /// No API key found
    NotFound,
}

impl fmt::Display for ApiKeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiKeySource::ConfigFile => write!(f, "config file"),
            ApiKeySource::TablonEnvVar => write!(f, "TABLON_*_API_KEY env"),
            ApiKeySource::StandardEnvVar => write!(f, "env variable"),
            ApiKeySource::NotFound => write!(f, "not found"),
        }
    }
}

/// Result of API key resolution with source information
#[derive(Debug, Clone)]
pub struct ApiKeyInfo {
    pub key: Option<String>,
    pub source: ApiKeySource,
    /// The environment variable that supplied the key, if any
    pub env_var_name: Option<String>,
}

impl ApiKeyInfo {
    pub fn is_valid(&self) -> bool {
        self.key.is_some()
    }

    /// Display-safe version of the key
    pub fn masked_key(&self) -> Option<String> {
        self.key.as_deref().map(mask_api_key)
    }
}

/// Backend section of the configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub provider: LlmProvider,
    pub model: String,
    /// Key from the config file; environment variables take precedence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Overrides the provider's default endpoint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    pub timeouts: TimeoutConfig,
}

impl Default for BackendConfig {
    fn default() -> Self {
        let provider = LlmProvider::default();
        Self {
            provider,
            model: provider.default_model().to_string(),
            api_key: None,
            base_url: None,
            temperature: Some(0.0),
            max_output_tokens: Some(1024),
            timeouts: TimeoutConfig::default(),
        }
    }
}

impl BackendConfig {
    pub fn new(provider: LlmProvider) -> Self {
        Self {
            provider,
            model: provider.default_model().to_string(),
            ..Self::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Base URL without a trailing slash
    pub fn get_base_url(&self) -> String {
        self.base_url
            .as_deref()
            .unwrap_or(self.provider.default_base_url())
            .trim_end_matches('/')
            .to_string()
    }

    pub fn get_api_key(&self) -> Option<String> {
        self.get_api_key_info().key
    }

    /// Resolve the API key from the process environment and the config file.
    ///
    /// Priority order:
    /// 1. `TABLON_<PROVIDER>_API_KEY`
    /// 2. The provider's standard variables (`GEMINI_API_KEY`, `GOOGLE_API_KEY`, `OPENAI_API_KEY`)
    /// 3. `api_key` from the config file
    ///
    /// The environment is only read.
    pub fn get_api_key_info(&self) -> ApiKeyInfo {
        self.resolve_api_key(|name| std::env::var(name).ok())
    }

    /// Same as [`get_api_key_info`](Self::get_api_key_info) with an explicit variable lookup
    pub fn resolve_api_key(&self, lookup: impl Fn(&str) -> Option<String>) -> ApiKeyInfo {
        let tablon_env_var = format!("TABLON_{}_API_KEY", self.provider.name().to_uppercase());
        if let Some(key) = lookup(&tablon_env_var).filter(|k| !k.is_empty()) {
            return ApiKeyInfo {
                key: Some(key),
                source: ApiKeySource::TablonEnvVar,
                env_var_name: Some(tablon_env_var),
            };
        }

        for env_var in self.provider.standard_env_vars() {
            if let Some(key) = lookup(env_var).filter(|k| !k.is_empty()) {
                return ApiKeyInfo {
                    key: Some(key),
                    source: ApiKeySource::StandardEnvVar,
                    env_var_name: Some(env_var.to_string()),
                };
            }
        }

        if let Some(key) = self.api_key.as_ref().filter(|k| !k.is_empty()) {
            return ApiKeyInfo {
                key: Some(key.clone()),
                source: ApiKeySource::ConfigFile,
                env_var_name: None,
            };
        }

        ApiKeyInfo {
            key: None,
            source: ApiKeySource::NotFound,
            env_var_name: None,
        }
    }
}

/// Mask an API key for safe display.
///
/// Shows the first 8 and last 4 characters.
pub fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    let len = chars.len();
    if len <= 12 {
        return "*".repeat(len);
    }

    let prefix: String = chars[..8].iter().collect();
    let suffix: String = chars[len - 4..].iter().collect();
    format!("{}{}...{}", prefix, "*".repeat((len - 12).min(8)), suffix)
}

/// API key status line for the CLI
pub fn format_api_key_status(provider: LlmProvider, info: &ApiKeyInfo) -> String {
    match &info.source {
        ApiKeySource::ConfigFile => format!(
            "✓ {} API key (from config): {}",
            provider,
            info.masked_key().unwrap_or_default()
        ),
        ApiKeySource::TablonEnvVar | ApiKeySource::StandardEnvVar => format!(
            "✓ {} API key (from {}): {}",
            provider,
            info.env_var_name.as_deref().unwrap_or("env"),
            info.masked_key().unwrap_or_default()
        ),
        ApiKeySource::NotFound => format!(
            "✗ {} API key missing. Set {} or add to config",
            provider,
            provider.standard_env_vars().first().copied().unwrap_or_default()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_tablon_env_var_wins() {
        let config = BackendConfig::new(LlmProvider::Google).with_api_key("from-file");
        let info = config.resolve_api_key(env(&[
            ("TABLON_GOOGLE_API_KEY", "from-tablon"),
            ("GEMINI_API_KEY", "from-gemini"),
        ]));
        assert_eq!(info.key.as_deref(), Some("from-tablon"));
        assert_eq!(info.source, ApiKeySource::TablonEnvVar);
        assert_eq!(info.env_var_name.as_deref(), Some("TABLON_GOOGLE_API_KEY"));
    }

    #[test]
    fn test_standard_env_var_before_config_file() {
        let config = BackendConfig::new(LlmProvider::Google).with_api_key("from-file");
        let info = config.resolve_api_key(env(&[("GOOGLE_API_KEY", "from-google")]));
        assert_eq!(info.key.as_deref(), Some("from-google"));
        assert_eq!(info.source, ApiKeySource::StandardEnvVar);
    }

    #[test]
    fn test_config_file_and_missing() {
        let config = BackendConfig::new(LlmProvider::OpenAI).with_api_key("from-file");
        let info = config.resolve_api_key(env(&[("TABLON_OPENAI_API_KEY", "")]));
        assert_eq!(info.key.as_deref(), Some("from-file"));
        assert_eq!(info.source, ApiKeySource::ConfigFile);

        let info = BackendConfig::new(LlmProvider::OpenAI).resolve_api_key(env(&[]));
        assert!(!info.is_valid());
        assert_eq!(
            format_api_key_status(LlmProvider::OpenAI, &info),
            "✗ openai API key missing. Set OPENAI_API_KEY or add to config"
        );
    }

    #[test]
    fn test_mask_api_key() {
        assert_eq!(mask_api_key("short"), "*****");
        assert_eq!(mask_api_key("AIzaSyD-1234567890abcd"), "AIzaSyD-********...abcd");
    }

    #[test]
    fn test_base_url_defaults_and_override() {
        assert_eq!(
            BackendConfig::new(LlmProvider::Google).get_base_url(),
            "https://generativelanguage.googleapis.com"
        );
        assert_eq!(
            BackendConfig::new(LlmProvider::OpenAI)
                .with_base_url("http://localhost:11434/v1/")
                .get_base_url(),
            "http://localhost:11434/v1"
        );
    }

    #[test]
    fn test_provider_parsing() {
        assert_eq!("Gemini".parse::<LlmProvider>().unwrap(), LlmProvider::Google);
        assert_eq!("openai".parse::<LlmProvider>().unwrap(), LlmProvider::OpenAI);
        assert!("anthropic".parse::<LlmProvider>().is_err());
        assert_eq!(serde_json::to_string(&LlmProvider::OpenAI).unwrap(), "\"openai\"");
    }
}
