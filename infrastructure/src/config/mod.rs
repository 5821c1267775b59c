//! Configuration file loading for ai-roundtable
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `ROUNDTABLE_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./roundtable.toml` or `./.roundtable.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/ai-roundtable/config.toml`
//! 5. Default values
//!
//! `.env` files are loaded into the process environment before any of these,
//! and `roundtable config ...` rewrites a single file through [`ConfigStore`].

mod editor;
mod env_files;
mod file_config;
mod loader;
mod secret;

pub use editor::{ConfigEditError, ConfigStore, MODEL_SETTINGS, ModelUpdate};
pub use env_files::{
    API_KEY_VARS, EnvFileError, create_example_env_file, default_env_file_path,
    env_file_candidates, load_env_files, mask_secret,
};
pub use file_config::{
    FileConfig, FileModelConfig, FileOutputConfig, FileReplConfig, FileRoundtableConfig,
    KNOWN_PROVIDERS, builtin_models,
};
pub use loader::ConfigLoader;
pub use secret::{SecretError, resolve_api_key};
