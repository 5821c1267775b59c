//! Domain error types

use thiserror::Error;

/// Fatal configuration errors.
///
/// Raised before any model is invoked; a discussion never starts when one of
/// these is detected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("No models configured for the round table")]
    NoModels,

    #[error("Role-based prompting is enabled but no roles are enabled")]
    NoEnabledRoles,

    #[error("Duplicate model id in configuration: {0}")]
    DuplicateModelId(String),

    #[error("Discussion must run at least one round")]
    ZeroRounds,

    #[error("Discussion prompt cannot be empty")]
    EmptyPrompt,
}
