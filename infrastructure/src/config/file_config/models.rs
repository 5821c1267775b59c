//! Model entries from TOML (`[models."<id>"]` sections)
//!
//! # Example
//!
//! ```toml
//! [models."openai/gpt-4o"]
//! provider = "openai"
//! model = "gpt-4o"
//! api_key = "env:OPENAI_API_KEY"
//! temperature = 0.3
//!
//! [models."local/mistral"]
//! provider = "ollama"
//! model = "mistral"
//! endpoint = "http://gpu-box:11434"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Providers an adapter exists for
pub const KNOWN_PROVIDERS: [&str; 4] = ["openai", "anthropic", "ollama", "gemini"];

/// One configured model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModelConfig {
    /// "openai", "anthropic", "ollama" or "gemini"
    pub provider: String,
    /// Provider-side model name
    pub model: String,
    /// Literal key or `env:VAR_NAME`
    pub api_key: Option<String>,
    /// Override of the provider's base URL
    pub endpoint: Option<String>,
    pub max_tokens: u32,
    pub temperature: f64,
}

impl Default for FileModelConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: String::new(),
            api_key: None,
            endpoint: None,
            max_tokens: 4000,
            temperature: 0.7,
        }
    }
}

impl FileModelConfig {
    pub fn new(provider: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            model: model.into(),
            ..Default::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn is_known_provider(&self) -> bool {
        KNOWN_PROVIDERS.contains(&self.provider.to_lowercase().as_str())
    }
}

/// Entries that are always available unless the file overrides them
pub fn builtin_models() -> BTreeMap<String, FileModelConfig> {
    let mut models = BTreeMap::new();
    models.insert(
        "openai/gpt-4".to_string(),
        FileModelConfig::new("openai", "gpt-4").with_api_key("env:OPENAI_API_KEY"),
    );
    models.insert(
        "anthropic/claude-3-sonnet".to_string(),
        FileModelConfig::new("anthropic", "claude-3-sonnet-20240229")
            .with_api_key("env:ANTHROPIC_API_KEY"),
    );
    models.insert(
        "ollama/llama2".to_string(),
        FileModelConfig::new("ollama", "llama2").with_endpoint("http://localhost:11434"),
    );
    models
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_entry_defaults() {
        let entry: FileModelConfig = toml::from_str(r#"model = "gpt-4o""#).unwrap();
        assert_eq!(entry.provider, "openai");
        assert_eq!(entry.max_tokens, 4000);
        assert!((entry.temperature - 0.7).abs() < f64::EPSILON);
        assert!(entry.api_key.is_none());
    }

    #[test]
    fn test_builtin_models() {
        let models = builtin_models();
        assert_eq!(models.len(), 3);
        assert_eq!(models["ollama/llama2"].provider, "ollama");
        assert!(models.values().all(FileModelConfig::is_known_provider));
    }

    #[test]
    fn test_unknown_provider() {
        assert!(!FileModelConfig::new("bedrock", "x").is_known_provider());
        assert!(FileModelConfig::new("Gemini", "x").is_known_provider());
    }
}
