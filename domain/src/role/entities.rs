//! Discourse roles

use serde::{Deserialize, Deserializer, Serialize};

const GENERATOR: &str = "generator";
const CRITIC: &str = "critic";
const REFINER: &str = "refiner";
const EVALUATOR: &str = "evaluator";

/// A discourse role a model plays during a round (Value Object)
///
/// Role names are opaque, case-insensitive identifiers stored in lowercase.
/// The four built-ins (`generator`, `critic`, `refiner`, `evaluator`) always
/// have a default prompt template; any other name is a custom role that falls
/// back to a generic template unless the configuration supplies one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    /// Create a role from an arbitrary name (trimmed, lowercased)
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(name.as_ref().trim().to_lowercase())
    }

    pub fn generator() -> Self {
        Self(GENERATOR.to_string())
    }

    pub fn critic() -> Self {
        Self(CRITIC.to_string())
    }

    pub fn refiner() -> Self {
        Self(REFINER.to_string())
    }

    pub fn evaluator() -> Self {
        Self(EVALUATOR.to_string())
    }

    /// The built-in roles in their canonical order
    pub fn builtins() -> Vec<Role> {
        vec![
            Self::generator(),
            Self::critic(),
            Self::refiner(),
            Self::evaluator(),
        ]
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self.0.as_str(), GENERATOR | CRITIC | REFINER | EVALUATOR)
    }

    /// Capitalized name for display ("Critic")
    pub fn display_name(&self) -> String {
        let mut chars = self.0.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Short description of what the role does
    pub fn description(&self) -> &'static str {
        match self.0.as_str() {
            GENERATOR => "Creates initial ideas, suggestions, or solutions",
            CRITIC => "Analyzes and critiques previous responses",
            REFINER => "Improves and builds upon existing ideas",
            EVALUATOR => "Evaluates final outcomes and provides summaries",
            _ => "Custom role",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Role {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Role::new(s))
    }
}

impl From<&str> for Role {
    fn from(s: &str) -> Self {
        Role::new(s)
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Role::new(s))
    }
}
