//! Domain layer for ai-roundtable
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Round-table discussion
//!
//! Several models discuss one topic over a fixed number of rounds. Each
//! round every model answers once; answers accumulate in a transcript that
//! later prompts see through the `{previous_responses}` placeholder.
//!
//! ## Roles
//!
//! Models may be assigned a discourse [`Role`] per round (generator, critic,
//! refiner, evaluator, or custom). The [`RoleAssignmentPlanner`] computes the
//! mapping, optionally rotating it across rounds, and the
//! [`TemplateResolver`] picks the prompt template each role answers with.

pub mod config;
pub mod core;
pub mod discussion;
pub mod prompt;
pub mod role;

// Re-export commonly used types
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use core::{
    error::ConfigurationError,
    model::{ModelDescriptor, ModelId},
    topic::Topic,
};
pub use discussion::{
    DiscussionConfig, DiscussionPhase, DiscussionState, FailureKind, InvocationResult,
    NO_PREVIOUS_RESPONSES, TranscriptEntry, format_previous_responses,
};
pub use prompt::{RenderContext, RoleTemplate, TemplateResolver, TemplateSource, render};
pub use role::{Role, RoleAssignment, RoleAssignmentMap, RoleAssignmentPlanner};
