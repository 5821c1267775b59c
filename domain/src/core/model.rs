//! Model identity and participant descriptors

use crate::role::Role;
use serde::{Deserialize, Serialize};

/// Identifier of a configured model (Value Object)
///
/// Ids are opaque configuration names such as `openai/gpt-4` or
/// `ollama/llama2`. The part before the first `/` is treated as a provider
/// hint; the core never interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelId(String);

impl ModelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the string identifier for this model
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Model name without the provider prefix
    pub fn short_name(&self) -> &str {
        self.0
            .split_once('/')
            .map(|(_, name)| name)
            .unwrap_or(&self.0)
    }
}

impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ModelId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().to_string()))
    }
}

impl From<&str> for ModelId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ModelId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A participant of a round-table discussion.
///
/// `preferred_roles` is the ordered list of roles the model may play. A model
/// without a list (or with an empty one) is eligible for every role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    pub id: ModelId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_roles: Option<Vec<Role>>,
}

impl ModelDescriptor {
    pub fn new(id: impl Into<ModelId>) -> Self {
        Self {
            id: id.into(),
            preferred_roles: None,
        }
    }

    pub fn with_preferred_roles(mut self, roles: Vec<Role>) -> Self {
        self.preferred_roles = Some(roles);
        self
    }

    /// The preference list, treating an empty list as "no preference"
    pub fn preferences(&self) -> Option<&[Role]> {
        self.preferred_roles
            .as_deref()
            .filter(|roles| !roles.is_empty())
    }

    /// Whether this model declared a preference for `role`
    pub fn prefers(&self, role: &Role) -> bool {
        self.preferences().is_some_and(|roles| roles.contains(role))
    }
}

impl From<ModelId> for ModelDescriptor {
    fn from(id: ModelId) -> Self {
        Self::new(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_name() {
        assert_eq!(ModelId::new("openai/gpt-4").short_name(), "gpt-4");
        assert_eq!(ModelId::new("llama2").short_name(), "llama2");
    }

    #[test]
    fn test_model_id_serde_transparent() {
        let id = ModelId::new("anthropic/claude-3-sonnet");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"anthropic/claude-3-sonnet\"");
    }

    #[test]
    fn test_empty_preferences_mean_no_preference() {
        let model = ModelDescriptor::new("a").with_preferred_roles(vec![]);
        assert!(model.preferences().is_none());
        assert!(!model.prefers(&Role::critic()));
    }

    #[test]
    fn test_prefers() {
        let model = ModelDescriptor::new("a").with_preferred_roles(vec![Role::critic()]);
        assert!(model.prefers(&Role::critic()));
        assert!(!model.prefers(&Role::generator()));
    }
}
