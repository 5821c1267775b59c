//! `.env` files holding provider API keys
//!
//! Files are loaded before any provider adapter is built so `env:VAR`
//! references in `[models]` can resolve against them. Variables already set in
//! the process environment are never overridden, and an earlier candidate wins
//! over a later one.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

const APP_DIR: &str = "ai-roundtable";
const ENV_FILE: &str = ".env";

/// Keys reported by `config env --show`
pub const API_KEY_VARS: [&str; 3] = ["OPENAI_API_KEY", "ANTHROPIC_API_KEY", "GOOGLE_API_KEY"];

const EXAMPLE_ENV: &str = r#"# API keys for ai-roundtable
#
# Model entries reference these with api_key = "env:VAR_NAME".
# Variables already set in the environment take precedence.

OPENAI_API_KEY=
ANTHROPIC_API_KEY=
GOOGLE_API_KEY=

# Configuration overrides use the ROUNDTABLE_ prefix, e.g.
# ROUNDTABLE_ROUNDTABLE__DISCUSSION_ROUNDS=3
"#;

#[derive(Error, Debug)]
pub enum EnvFileError {
    #[error("{} already exists", .0.display())]
    AlreadyExists(PathBuf),

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Candidate files in load order: working directory, home, app config dir
pub fn env_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        candidates.push(cwd.join(ENV_FILE));
    }
    if let Some(home) = dirs::home_dir() {
        candidates.push(home.join(ENV_FILE));
    }
    if let Some(app_dir) = app_env_dir() {
        candidates.push(app_dir.join(ENV_FILE));
    }
    candidates
}

/// Load every existing candidate; returns the files that were loaded
pub fn load_env_files() -> Vec<PathBuf> {
    load_env_files_from(&env_file_candidates())
}

/// Load the existing files among `candidates`, in order.
///
/// A file that cannot be parsed is skipped with a warning.
pub fn load_env_files_from(candidates: &[PathBuf]) -> Vec<PathBuf> {
    let mut loaded = Vec::new();
    for path in candidates.iter().filter(|p| p.is_file()) {
        match dotenv::from_path(path) {
            Ok(()) => {
                debug!("Loaded environment from {}", path.display());
                loaded.push(path.clone());
            }
            Err(e) => warn!("Skipping {}: {}", path.display(), e),
        }
    }
    loaded
}

/// Default target of `config env --init`
pub fn default_env_file_path() -> Option<PathBuf> {
    app_env_dir().map(|dir| dir.join(ENV_FILE))
}

/// Write an example `.env` to `path`. An existing file is left untouched.
pub fn create_example_env_file(path: &Path) -> Result<PathBuf, EnvFileError> {
    if path.exists() {
        return Err(EnvFileError::AlreadyExists(path.to_path_buf()));
    }
    let write_err = |source| EnvFileError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }
    std::fs::write(path, EXAMPLE_ENV).map_err(write_err)?;
    Ok(path.to_path_buf())
}

/// First eight characters followed by `...`; short values are fully hidden
pub fn mask_secret(value: &str) -> String {
    if value.chars().count() > 8 {
        let prefix: String = value.chars().take(8).collect();
        format!("{}...", prefix)
    } else {
        "***".to_string()
    }
}

fn app_env_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR))
}
