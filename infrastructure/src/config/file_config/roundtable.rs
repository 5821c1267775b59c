//! Round-table configuration from TOML (`[roundtable]` section)
//!
//! Example configuration:
//!
//! ```toml
//! [roundtable]
//! enabled_models = ["openai/gpt-4", "anthropic/claude-3-sonnet"]
//! enabled_roles = ["generator", "critic", "refiner"]
//! discussion_rounds = 3
//! parallel_responses = false
//! timeout_seconds = 45
//! use_role_based_prompting = true
//! role_rotation = true
//!
//! [roundtable.role_assignments]
//! "anthropic/claude-3-sonnet" = ["critic", "evaluator"]
//!
//! [roundtable.custom_role_templates]
//! critic = "Find every flaw in: {previous_responses}"
//! ```

use roundtable_domain::discussion::config::{DEFAULT_ROUNDS, DEFAULT_TIMEOUT};
use roundtable_domain::{DiscussionConfig, ModelDescriptor, ModelId, Role};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Raw `[roundtable]` configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRoundtableConfig {
    /// Participants, in speaking order
    pub enabled_models: Vec<String>,
    pub enabled_roles: Vec<String>,
    pub discussion_rounds: usize,
    pub parallel_responses: bool,
    pub timeout_seconds: u64,
    pub use_role_based_prompting: bool,
    pub role_rotation: bool,
    /// Model id → roles the model prefers
    pub role_assignments: BTreeMap<String, Vec<String>>,
    /// Role name → template overriding the built-in one
    pub custom_role_templates: BTreeMap<String, String>,
}

impl Default for FileRoundtableConfig {
    fn default() -> Self {
        Self {
            enabled_models: Vec::new(),
            enabled_roles: Role::builtins().iter().map(|r| r.to_string()).collect(),
            discussion_rounds: DEFAULT_ROUNDS,
            parallel_responses: false,
            timeout_seconds: DEFAULT_TIMEOUT.as_secs(),
            use_role_based_prompting: true,
            role_rotation: false,
            role_assignments: BTreeMap::new(),
            custom_role_templates: BTreeMap::new(),
        }
    }
}

impl FileRoundtableConfig {
    pub fn roles(&self) -> Vec<Role> {
        self.enabled_roles.iter().map(Role::new).collect()
    }

    /// Build the domain configuration. Role names are normalized; duplicate
    /// roles collapse.
    pub fn to_discussion_config(&self) -> DiscussionConfig {
        let mut config = DiscussionConfig::new()
            .with_roles(self.roles())
            .with_rounds(self.discussion_rounds)
            .with_parallel(self.parallel_responses)
            .with_timeout(Duration::from_secs(self.timeout_seconds))
            .with_rotation(self.role_rotation)
            .with_role_based(self.use_role_based_prompting);
        for (role, template) in &self.custom_role_templates {
            config = config.with_custom_template(Role::new(role), template.clone());
        }
        config
    }

    /// Descriptors for `ids`, carrying any configured role preferences
    pub fn describe(&self, ids: &[ModelId]) -> Vec<ModelDescriptor> {
        ids.iter()
            .map(|id| {
                let descriptor = ModelDescriptor::new(id.clone());
                match self.role_assignments.get(id.as_str()) {
                    Some(roles) => {
                        descriptor.with_preferred_roles(roles.iter().map(Role::new).collect())
                    }
                    None => descriptor,
                }
            })
            .collect()
    }

    /// Configured participants as descriptors
    pub fn participants(&self) -> Vec<ModelDescriptor> {
        let ids: Vec<ModelId> = self
            .enabled_models
            .iter()
            .map(|id| ModelId::new(id.trim()))
            .collect();
        self.describe(&ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_domain_defaults() {
        let config = FileRoundtableConfig::default().to_discussion_config();
        assert_eq!(config, DiscussionConfig::default());
    }

    #[test]
    fn test_to_discussion_config() {
        let toml_str = r#"
enabled_models = ["a", "b"]
enabled_roles = ["Critic", "generator", "critic"]
discussion_rounds = 3
parallel_responses = true
timeout_seconds = 10
role_rotation = true

[custom_role_templates]
Critic = "Find flaws: {previous_responses}"
"#;
        let file: FileRoundtableConfig = toml::from_str(toml_str).unwrap();
        let config = file.to_discussion_config();

        assert_eq!(config.enabled_roles, vec![Role::critic(), Role::generator()]);
        assert_eq!(config.rounds, 3);
        assert!(config.parallel);
        assert!(config.rotation);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(
            config.custom_templates.get(&Role::critic()).map(String::as_str),
            Some("Find flaws: {previous_responses}")
        );
    }

    #[test]
    fn test_participants_carry_preferences() {
        let toml_str = r#"
enabled_models = ["a", "b"]

[role_assignments]
b = ["evaluator"]
"#;
        let file: FileRoundtableConfig = toml::from_str(toml_str).unwrap();
        let participants = file.participants();

        assert_eq!(participants.len(), 2);
        assert!(participants[0].preferred_roles.is_none());
        assert_eq!(
            participants[1].preferred_roles,
            Some(vec![Role::evaluator()])
        );
    }
}
