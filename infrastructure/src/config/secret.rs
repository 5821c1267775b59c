//! API key resolution
//!
//! A key in the config is either the literal secret or `env:VAR_NAME`,
//! which is read from the environment when the adapter is built.

use thiserror::Error;

const ENV_PREFIX: &str = "env:";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SecretError {
    #[error("environment variable {0} is not set")]
    MissingEnv(String),

    #[error("api key is empty")]
    Empty,
}

/// Resolve a configured key. `None` stays `None`.
pub fn resolve_api_key(raw: Option<&str>) -> Result<Option<String>, SecretError> {
    resolve_with(raw, |name| std::env::var(name).ok())
}

fn resolve_with(
    raw: Option<&str>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Option<String>, SecretError> {
    let Some(raw) = raw.map(str::trim) else {
        return Ok(None);
    };

    let value = match raw.strip_prefix(ENV_PREFIX) {
        Some(name) => {
            let name = name.trim();
            lookup(name).ok_or_else(|| SecretError::MissingEnv(name.to_string()))?
        }
        None => raw.to_string(),
    };

    if value.trim().is_empty() {
        return Err(SecretError::Empty);
    }
    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(name: &str) -> Option<String> {
        match name {
            "SET_KEY" => Some("sk-123".to_string()),
            "BLANK_KEY" => Some(String::new()),
            _ => None,
        }
    }

    #[test]
    fn test_literal_and_absent() {
        assert_eq!(resolve_with(None, lookup), Ok(None));
        assert_eq!(
            resolve_with(Some("sk-literal"), lookup),
            Ok(Some("sk-literal".to_string()))
        );
    }

    #[test]
    fn test_env_reference() {
        assert_eq!(
            resolve_with(Some("env:SET_KEY"), lookup),
            Ok(Some("sk-123".to_string()))
        );
        assert_eq!(
            resolve_with(Some("env:NOPE"), lookup),
            Err(SecretError::MissingEnv("NOPE".to_string()))
        );
        assert_eq!(resolve_with(Some("env:BLANK_KEY"), lookup), Err(SecretError::Empty));
    }
}
