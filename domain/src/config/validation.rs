//! Configuration issues reported by file-config validation.
//!
//! Validation never fails outright; it returns every issue it finds so the
//! caller can print warnings and abort only on errors.

use std::fmt;

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// A `[models]` entry or round-table model id is blank.
    BlankModelId,
    /// `roundtable.enabled_models` names a model missing from `[models]`.
    UndefinedModel,
    /// A model entry names a provider no adapter exists for.
    UnknownProvider,
    /// `discussion_rounds` is zero.
    ZeroRounds,
    /// `timeout_seconds` is zero.
    ZeroTimeout,
    /// `role_assignments` names a model outside the round table.
    AssignmentForAbsentModel,
    /// `custom_role_templates` names a role that is not enabled.
    TemplateForDisabledRole,
    /// Role-based prompting is on but `enabled_roles` is empty.
    NoEnabledRoles,
    /// A role name in `enabled_roles` or `role_assignments` is blank.
    BlankRoleName,
}

/// A detected issue in the configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {}", label, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_severity() {
        let issue = ConfigIssue::warning(
            ConfigIssueCode::TemplateForDisabledRole,
            "template for 'historian' is never used",
        );
        assert!(!issue.is_error());
        assert_eq!(
            issue.to_string(),
            "warning: template for 'historian' is never used"
        );
    }
}
