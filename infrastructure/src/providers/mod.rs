//! Provider adapters
//!
//! One [`ProviderAdapter`] is built per configured model. The
//! [`RoutingInvoker`](routing::RoutingInvoker) owns them and implements the
//! application's `ModelInvoker` port by looking adapters up by model id.

pub mod anthropic;
pub mod openai;
pub mod routing;

use async_trait::async_trait;
use roundtable_application::InvokeError;
use std::str::FromStr;
use std::time::Duration;

pub use anthropic::AnthropicAdapter;
pub use openai::OpenAiCompatibleAdapter;
pub use routing::RoutingInvoker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderKind {
    #[default]
    OpenAi,
    Anthropic,
    Ollama,
    Gemini,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Ollama => "ollama",
            ProviderKind::Gemini => "gemini",
        }
    }

    /// Whether requests must carry an API key
    pub fn requires_api_key(&self) -> bool {
        !matches!(self, ProviderKind::Ollama)
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAi),
            "anthropic" => Ok(ProviderKind::Anthropic),
            "ollama" => Ok(ProviderKind::Ollama),
            "gemini" => Ok(ProviderKind::Gemini),
            other => Err(format!("unknown provider: {}", other)),
        }
    }
}

#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Send one user prompt and return the reply text.
    async fn complete(&self, prompt: &str, timeout: Duration) -> Result<String, InvokeError>;
}

/// Map a reqwest failure onto the port's error type
pub(crate) fn transport_error(err: reqwest::Error) -> InvokeError {
    if err.is_timeout() {
        InvokeError::Timeout
    } else if err.is_connect() {
        InvokeError::Connection(err.to_string())
    } else if err.is_decode() {
        InvokeError::InvalidResponse(err.to_string())
    } else {
        InvokeError::RequestFailed(err.to_string())
    }
}

/// Turn a non-success HTTP response into an error, keeping the body
pub(crate) async fn check_status(
    response: reqwest::Response,
) -> Result<reqwest::Response, InvokeError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<unreadable body>".to_string());
    Err(InvokeError::RequestFailed(format!(
        "HTTP {}: {}",
        status,
        roundtable_domain::core::string::truncate(body.trim(), 500)
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_kind_parse() {
        assert_eq!("OpenAI".parse::<ProviderKind>(), Ok(ProviderKind::OpenAi));
        assert_eq!(" ollama ".parse::<ProviderKind>(), Ok(ProviderKind::Ollama));
        assert!("bedrock".parse::<ProviderKind>().is_err());
        assert!(!ProviderKind::Ollama.requires_api_key());
        assert!(ProviderKind::Gemini.requires_api_key());
    }
}
