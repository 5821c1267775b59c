//! Discussion configuration (Entity)

use crate::core::error::ConfigurationError;
use crate::core::model::ModelDescriptor;
use crate::role::{Role, RoleAssignmentPlanner};
use std::collections::HashMap;
use std::time::Duration;

/// Default number of rounds
pub const DEFAULT_ROUNDS: usize = 2;
/// Default per-call timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings for one round-table discussion.
///
/// An explicit value handed to the orchestrator; nothing is read from
/// globals. Enabled roles are an ordered set: duplicates are dropped when
/// set through [`with_roles`](Self::with_roles).
#[derive(Debug, Clone, PartialEq)]
pub struct DiscussionConfig {
    pub enabled_roles: Vec<Role>,
    pub rounds: usize,
    pub parallel: bool,
    /// Upper bound for a single model call
    pub timeout: Duration,
    pub rotation: bool,
    pub role_based: bool,
    pub custom_templates: HashMap<Role, String>,
}

impl Default for DiscussionConfig {
    fn default() -> Self {
        Self {
            enabled_roles: Role::builtins(),
            rounds: DEFAULT_ROUNDS,
            parallel: false,
            timeout: DEFAULT_TIMEOUT,
            rotation: false,
            role_based: true,
            custom_templates: HashMap::new(),
        }
    }
}

impl DiscussionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        let mut ordered: Vec<Role> = Vec::new();
        for role in roles {
            if !ordered.contains(&role) {
                ordered.push(role);
            }
        }
        self.enabled_roles = ordered;
        self
    }

    pub fn with_rounds(mut self, rounds: usize) -> Self {
        self.rounds = rounds;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_rotation(mut self, rotation: bool) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_role_based(mut self, role_based: bool) -> Self {
        self.role_based = role_based;
        self
    }

    pub fn with_custom_template(mut self, role: Role, template: impl Into<String>) -> Self {
        self.custom_templates.insert(role, template.into());
        self
    }

    /// Check that a discussion over `models` can start.
    ///
    /// Runs before any model call. The prompt is checked separately when the
    /// [`Topic`](crate::core::topic::Topic) is built.
    pub fn validate(&self, models: &[ModelDescriptor]) -> Result<(), ConfigurationError> {
        if models.is_empty() {
            return Err(ConfigurationError::NoModels);
        }
        RoleAssignmentPlanner::validate_models(models)?;
        if self.rounds == 0 {
            return Err(ConfigurationError::ZeroRounds);
        }
        if self.role_based && self.enabled_roles.is_empty() {
            return Err(ConfigurationError::NoEnabledRoles);
        }
        Ok(())
    }
}
