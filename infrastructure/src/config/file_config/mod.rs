//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod models;
mod output;
mod repl;
mod roundtable;

pub use models::{FileModelConfig, KNOWN_PROVIDERS, builtin_models};
pub use output::FileOutputConfig;
pub use repl::FileReplConfig;
pub use roundtable::FileRoundtableConfig;

use roundtable_domain::{ConfigIssue, ConfigIssueCode, Role};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Model used by `--single` and plain REPL input
    pub default_model: String,
    /// Model id → provider settings
    pub models: BTreeMap<String, FileModelConfig>,
    /// Round-table discussion settings
    pub roundtable: FileRoundtableConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// REPL settings
    pub repl: FileReplConfig,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            default_model: "openai/gpt-4".to_string(),
            models: builtin_models(),
            roundtable: FileRoundtableConfig::default(),
            output: FileOutputConfig::default(),
            repl: FileReplConfig::default(),
        }
    }
}

impl FileConfig {
    /// Add the built-in model entries the file does not define.
    pub fn with_builtin_models(mut self) -> Self {
        for (id, entry) in builtin_models() {
            self.models.entry(id).or_insert(entry);
        }
        self
    }

    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Checks model entries, the round-table participant list, numeric
    /// limits, and settings that refer to models or roles outside the
    /// round table.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        let rt = &self.roundtable;

        // 1. Model entries
        for (id, entry) in &self.models {
            if id.trim().is_empty() {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::BlankModelId,
                    "models: model id cannot be empty",
                ));
                continue;
            }
            if entry.model.trim().is_empty() {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::BlankModelId,
                    format!("models.\"{}\".model: provider model name cannot be empty", id),
                ));
            }
            if !entry.is_known_provider() {
                let participates = rt.enabled_models.iter().any(|m| m.trim() == id);
                let message = format!(
                    "models.\"{}\".provider: unknown provider '{}' (expected one of {})",
                    id,
                    entry.provider,
                    KNOWN_PROVIDERS.join(", ")
                );
                issues.push(if participates {
                    ConfigIssue::error(ConfigIssueCode::UnknownProvider, message)
                } else {
                    ConfigIssue::warning(ConfigIssueCode::UnknownProvider, message)
                });
            }
        }

        if !self.models.contains_key(self.default_model.trim()) {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::UndefinedModel,
                format!(
                    "default_model: '{}' is not defined in [models]",
                    self.default_model
                ),
            ));
        }

        // 2. Round-table participants
        for id in &rt.enabled_models {
            if id.trim().is_empty() {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::BlankModelId,
                    "roundtable.enabled_models: model id cannot be empty",
                ));
            } else if !self.models.contains_key(id.trim()) {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::UndefinedModel,
                    format!(
                        "roundtable.enabled_models: '{}' is not defined in [models]",
                        id
                    ),
                ));
            }
        }

        // 3. Numeric limits
        if rt.discussion_rounds == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroRounds,
                "roundtable.discussion_rounds: must be at least 1",
            ));
        }
        if rt.timeout_seconds == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroTimeout,
                "roundtable.timeout_seconds: must be at least 1",
            ));
        }
        if rt.use_role_based_prompting && rt.enabled_roles.is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::NoEnabledRoles,
                "roundtable.enabled_roles: role-based prompting needs at least one role",
            ));
        }
        if rt.enabled_roles.iter().any(|r| r.trim().is_empty()) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::BlankRoleName,
                "roundtable.enabled_roles: role name must not be blank",
            ));
        }
        for (model, roles) in &rt.role_assignments {
            if roles.iter().any(|r| r.trim().is_empty()) {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::BlankRoleName,
                    format!(
                        "roundtable.role_assignments.\"{}\": role name must not be blank",
                        model
                    ),
                ));
            }
        }

        // 4. References outside the round table
        for model in rt.role_assignments.keys() {
            if !rt.enabled_models.iter().any(|m| m.trim() == model) {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::AssignmentForAbsentModel,
                    format!(
                        "roundtable.role_assignments: '{}' is not a round-table model",
                        model
                    ),
                ));
            }
        }
        let enabled = rt.roles();
        for role in rt.custom_role_templates.keys() {
            if !enabled.contains(&Role::new(role)) {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::TemplateForDisabledRole,
                    format!(
                        "roundtable.custom_role_templates: role '{}' is not enabled",
                        role
                    ),
                ));
            }
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roundtable_domain::{OutputFormat, Severity};

    fn codes(config: &FileConfig) -> Vec<(Severity, ConfigIssueCode)> {
        config
            .validate()
            .into_iter()
            .map(|i| (i.severity, i.code))
            .collect()
    }

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
default_model = "anthropic/claude-3-sonnet"

[models."local/mistral"]
provider = "ollama"
model = "mistral"
endpoint = "http://gpu-box:11434"

[roundtable]
enabled_models = ["anthropic/claude-3-sonnet", "local/mistral"]
discussion_rounds = 3
role_rotation = true

[roundtable.role_assignments]
"local/mistral" = ["critic"]

[output]
format = "json"

[repl]
show_progress = false
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let config = config.with_builtin_models();

        assert_eq!(config.default_model, "anthropic/claude-3-sonnet");
        assert_eq!(config.models.len(), 4);
        assert_eq!(config.models["local/mistral"].provider, "ollama");
        assert_eq!(config.roundtable.discussion_rounds, 3);
        assert!(config.roundtable.role_rotation);
        assert_eq!(config.output.format, Some(OutputFormat::Json));
        assert!(!config.repl.show_progress);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_builtin_entry_overridden_by_file() {
        let toml_str = r#"
[models."ollama/llama2"]
provider = "ollama"
model = "llama2:13b"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let config = config.with_builtin_models();
        assert_eq!(config.models["ollama/llama2"].model, "llama2:13b");
        assert!(config.models.contains_key("openai/gpt-4"));
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = FileConfig::default();
        assert_eq!(config.default_model, "openai/gpt-4");
        assert!(config.output.color);
        assert!(config.repl.show_progress);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_undefined_and_blank_models() {
        let mut config = FileConfig::default();
        config.roundtable.enabled_models = vec!["openai/gpt-4".into(), "ghost".into(), " ".into()];

        assert_eq!(
            codes(&config),
            vec![
                (Severity::Error, ConfigIssueCode::UndefinedModel),
                (Severity::Error, ConfigIssueCode::BlankModelId),
            ]
        );
    }

    #[test]
    fn test_validate_unknown_provider_severity() {
        let mut config = FileConfig::default();
        config
            .models
            .insert("x/idle".into(), FileModelConfig::new("bedrock", "m"));
        config
            .models
            .insert("x/used".into(), FileModelConfig::new("azure", "m"));
        config.roundtable.enabled_models = vec!["x/used".into()];

        let issues = codes(&config);
        assert!(issues.contains(&(Severity::Warning, ConfigIssueCode::UnknownProvider)));
        assert!(issues.contains(&(Severity::Error, ConfigIssueCode::UnknownProvider)));
    }

    #[test]
    fn test_validate_limits() {
        let mut config = FileConfig::default();
        config.roundtable.discussion_rounds = 0;
        config.roundtable.timeout_seconds = 0;
        config.roundtable.enabled_roles.clear();

        assert_eq!(
            codes(&config),
            vec![
                (Severity::Error, ConfigIssueCode::ZeroRounds),
                (Severity::Error, ConfigIssueCode::ZeroTimeout),
                (Severity::Error, ConfigIssueCode::NoEnabledRoles),
            ]
        );
    }

    #[test]
    fn test_validate_blank_role_names() {
        let mut config = FileConfig::default();
        config.roundtable.enabled_roles = vec!["critic".into(), "  ".into()];
        config
            .roundtable
            .role_assignments
            .insert("openai/gpt-4".into(), vec!["".into()]);
        config.roundtable.enabled_models = vec!["openai/gpt-4".into()];

        assert_eq!(
            codes(&config),
            vec![
                (Severity::Error, ConfigIssueCode::BlankRoleName),
                (Severity::Error, ConfigIssueCode::BlankRoleName),
            ]
        );
    }

    #[test]
    fn test_validate_dangling_references_are_warnings() {
        let mut config = FileConfig::default();
        config.roundtable.enabled_models = vec!["openai/gpt-4".into()];
        config.roundtable.enabled_roles = vec!["generator".into()];
        config
            .roundtable
            .role_assignments
            .insert("ollama/llama2".into(), vec!["critic".into()]);
        config
            .roundtable
            .custom_role_templates
            .insert("critic".into(), "x".into());

        assert_eq!(
            codes(&config),
            vec![
                (Severity::Warning, ConfigIssueCode::AssignmentForAbsentModel),
                (Severity::Warning, ConfigIssueCode::TemplateForDisabledRole),
            ]
        );
    }
}
