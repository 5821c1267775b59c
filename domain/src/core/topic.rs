//! Topic value object

use crate::core::error::ConfigurationError;
use serde::{Deserialize, Serialize};

/// The original prompt of a discussion (Value Object)
///
/// Immutable for the lifetime of a discussion session and rendered into every
/// round through the `{original_prompt}` placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Topic {
    content: String,
}

impl Topic {
    /// Create a new topic, rejecting blank prompts
    pub fn new(content: impl Into<String>) -> Result<Self, ConfigurationError> {
        let content = content.into();
        if content.trim().is_empty() {
            Err(ConfigurationError::EmptyPrompt)
        } else {
            Ok(Self { content })
        }
    }

    /// Get the topic content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Consume and return the inner content
    pub fn into_content(self) -> String {
        self.content
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}
