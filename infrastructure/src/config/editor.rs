//! Persistent edits to a configuration file (`roundtable config ...`)
//!
//! [`ConfigStore`] reads one file over the defaults, lets the caller mutate
//! the resulting [`FileConfig`], and writes the whole configuration back as
//! pretty-printed TOML.

use super::file_config::{FileConfig, FileModelConfig};
use super::loader::ConfigLoader;
use roundtable_domain::{ModelId, Role};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Errors raised while editing a configuration file
#[derive(Error, Debug)]
pub enum ConfigEditError {
    #[error("Model '{0}' not found in configuration")]
    UnknownModel(String),

    #[error("Unknown configuration key: {0} (expected default_model or model.<id>.<setting>)")]
    UnknownKey(String),

    #[error(
        "Unknown model setting '{0}' (expected one of {settings})",
        settings = MODEL_SETTINGS.join(", ")
    )]
    UnknownSetting(String),

    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("No configuration directory available on this platform")]
    NoConfigDir,

    #[error("Failed to read {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: Box<figment::Error>,
    },

    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Settings accepted by `model.<id>.<setting>`
pub const MODEL_SETTINGS: [&str; 6] = [
    "provider",
    "model",
    "api_key",
    "endpoint",
    "max_tokens",
    "temperature",
];

/// Optional fields of `config add-model`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelUpdate {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub endpoint: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f64>,
}

impl FileConfig {
    /// Point `default_model` at a defined model
    pub fn set_default_model(&mut self, id: &str) -> Result<(), ConfigEditError> {
        let id = id.trim();
        if !self.models.contains_key(id) {
            return Err(ConfigEditError::UnknownModel(id.to_string()));
        }
        self.default_model = id.to_string();
        Ok(())
    }

    /// Apply `config set <key> <value>`.
    ///
    /// Keys are `default_model` or `model.<id>.<setting>`. The setting is the
    /// part after the last dot, so model ids may contain dots themselves.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ConfigEditError> {
        if key == "default_model" {
            return self.set_default_model(value);
        }

        let (id, setting) = key
            .strip_prefix("model.")
            .and_then(|rest| rest.rsplit_once('.'))
            .filter(|(id, setting)| !id.is_empty() && !setting.is_empty())
            .ok_or_else(|| ConfigEditError::UnknownKey(key.to_string()))?;

        let invalid = |reason: String| ConfigEditError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason,
        };

        let mut update = ModelUpdate::default();
        match setting {
            "provider" => update.provider = Some(value.to_string()),
            "model" => update.model = Some(value.to_string()),
            "api_key" => update.api_key = Some(value.to_string()),
            "endpoint" => update.endpoint = Some(value.to_string()),
            "max_tokens" => {
                let max_tokens: u32 = value
                    .trim()
                    .parse()
                    .map_err(|e| invalid(format!("{}", e)))?;
                update.max_tokens = Some(max_tokens);
            }
            "temperature" => {
                let temperature: f64 = value
                    .trim()
                    .parse()
                    .map_err(|e| invalid(format!("{}", e)))?;
                if !(0.0..=2.0).contains(&temperature) {
                    return Err(invalid("must be between 0.0 and 2.0".to_string()));
                }
                update.temperature = Some(temperature);
            }
            other => return Err(ConfigEditError::UnknownSetting(other.to_string())),
        }

        self.upsert_model(id, update);
        Ok(())
    }

    /// Create or update a `[models]` entry.
    ///
    /// A new entry starts from the defaults with the provider model name
    /// taken from the id (`gpt-4o` for `openai/gpt-4o`).
    pub fn upsert_model(&mut self, id: &str, update: ModelUpdate) {
        let id = id.trim();
        let entry = self.models.entry(id.to_string()).or_insert_with(|| {
            debug!("Creating model entry {}", id);
            FileModelConfig {
                model: ModelId::new(id).short_name().to_string(),
                ..Default::default()
            }
        });

        if let Some(provider) = update.provider {
            entry.provider = provider.to_lowercase();
        }
        if let Some(model) = update.model {
            entry.model = model;
        }
        if let Some(api_key) = update.api_key {
            entry.api_key = Some(api_key);
        }
        if let Some(endpoint) = update.endpoint {
            entry.endpoint = Some(endpoint);
        }
        if let Some(max_tokens) = update.max_tokens {
            entry.max_tokens = max_tokens;
        }
        if let Some(temperature) = update.temperature {
            entry.temperature = temperature;
        }
    }

    /// Append a defined model to the round table; already present is a no-op
    pub fn add_roundtable_model(&mut self, id: &str) -> Result<bool, ConfigEditError> {
        let id = id.trim();
        if !self.models.contains_key(id) {
            return Err(ConfigEditError::UnknownModel(id.to_string()));
        }
        let enabled = &mut self.roundtable.enabled_models;
        if enabled.iter().any(|m| m.trim() == id) {
            return Ok(false);
        }
        enabled.push(id.to_string());
        Ok(true)
    }

    /// Returns `false` if the model was not on the round table
    pub fn remove_roundtable_model(&mut self, id: &str) -> bool {
        let id = id.trim();
        let enabled = &mut self.roundtable.enabled_models;
        let before = enabled.len();
        enabled.retain(|m| m.trim() != id);
        enabled.len() != before
    }

    /// Replace the preferred roles of a defined model.
    ///
    /// Names are normalized like any other role; duplicates collapse.
    pub fn assign_roles(
        &mut self,
        id: &str,
        roles: &[String],
    ) -> Result<Vec<Role>, ConfigEditError> {
        let id = id.trim();
        if !self.models.contains_key(id) {
            return Err(ConfigEditError::UnknownModel(id.to_string()));
        }

        let mut normalized: Vec<Role> = Vec::new();
        for name in roles {
            if name.trim().is_empty() {
                return Err(ConfigEditError::InvalidValue {
                    key: format!("roundtable.role_assignments.\"{}\"", id),
                    value: roles.join(","),
                    reason: "role name must not be blank".to_string(),
                });
            }
            let role = Role::new(name);
            if !normalized.contains(&role) {
                normalized.push(role);
            }
        }

        self.roundtable.role_assignments.insert(
            id.to_string(),
            normalized.iter().map(|r| r.to_string()).collect(),
        );
        Ok(normalized)
    }

    /// Returns `false` if the model had no assignment
    pub fn clear_roles(&mut self, id: &str) -> bool {
        self.roundtable.role_assignments.remove(id.trim()).is_some()
    }
}

/// A configuration file that `roundtable config` reads and rewrites
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The global config file
    pub fn global() -> Result<Self, ConfigEditError> {
        ConfigLoader::global_config_path()
            .map(Self::new)
            .ok_or(ConfigEditError::NoConfigDir)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Defaults overlaid with the file, or plain defaults if it does not exist
    pub fn load(&self) -> Result<FileConfig, ConfigEditError> {
        if !self.path.exists() {
            debug!("{} does not exist, starting from defaults", self.path.display());
            return Ok(FileConfig::default());
        }
        ConfigLoader::load_file(&self.path).map_err(|source| ConfigEditError::Load {
            path: self.path.clone(),
            source,
        })
    }

    /// Write `config` as pretty TOML, creating parent directories
    pub fn save(&self, config: &FileConfig) -> Result<(), ConfigEditError> {
        let content = toml::to_string_pretty(config)?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|source| ConfigEditError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(&self.path, content).map_err(|source| ConfigEditError::Write {
            path: self.path.clone(),
            source,
        })?;

        info!("Configuration written to {}", self.path.display());
        Ok(())
    }

    /// Load, apply `edit`, and save. Nothing is written if `edit` fails.
    pub fn update<T>(
        &self,
        edit: impl FnOnce(&mut FileConfig) -> Result<T, ConfigEditError>,
    ) -> Result<T, ConfigEditError> {
        let mut config = self.load()?;
        let result = edit(&mut config)?;
        self.save(&config)?;
        Ok(result)
    }
}
