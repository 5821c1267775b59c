//! Role prompt templates
//!
//! Templates may use these placeholders, substituted by [`render`](super::render):
//!
//! | Placeholder | Value |
//! |-------------|-------|
//! | `{original_prompt}` | the discussion topic |
//! | `{previous_responses}` | labeled responses from earlier turns |
//! | `{current_round}` | 1-based round number |
//! | `{total_rounds}` | configured round count |
//! | `{role}` | name of the role being played |

use crate::role::Role;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const GENERATOR_TEMPLATE: &str = r#"You are the GENERATOR in a round-table discussion between several AI models (round {current_round} of {total_rounds}).
Your task is to propose original ideas, suggestions, or solutions for the topic below.
Be concrete and well-reasoned. Where earlier responses exist, build on them instead of repeating them.

Topic:
{original_prompt}

Discussion so far:
{previous_responses}"#;

const CRITIC_TEMPLATE: &str = r#"You are the CRITIC in a round-table discussion between several AI models (round {current_round} of {total_rounds}).
Your task is to analyze the responses so far and point out weaknesses, errors, missing considerations, and risks.
Be specific and constructive. Name which response each point refers to.

Topic:
{original_prompt}

Responses to critique:
{previous_responses}"#;

const REFINER_TEMPLATE: &str = r#"You are the REFINER in a round-table discussion between several AI models (round {current_round} of {total_rounds}).
Your task is to improve the strongest ideas from the discussion, addressing the criticism raised so far.
Produce a revised, more complete answer rather than a commentary.

Topic:
{original_prompt}

Discussion so far:
{previous_responses}"#;

const EVALUATOR_TEMPLATE: &str = r#"You are the EVALUATOR in a round-table discussion between several AI models (round {current_round} of {total_rounds}).
Your task is to assess the discussion as a whole: summarize where the participants agree, where they disagree,
and which answer is best supported. Finish with a short overall verdict.

Topic:
{original_prompt}

Discussion to evaluate:
{previous_responses}"#;

const GENERIC_TEMPLATE: &str = r#"You are playing the role of {role} in a round-table discussion between several AI models (round {current_round} of {total_rounds}).
Contribute to the discussion from the perspective of that role.

Topic:
{original_prompt}

Discussion so far:
{previous_responses}"#;

/// Used when role-based prompting is disabled: the prompt plus everything said so far.
const AUGMENTATION_TEMPLATE: &str = r#"{original_prompt}

Previous responses from other participants:
{previous_responses}"#;

/// Where a resolved template came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateSource {
    /// Supplied by configuration
    Custom,
    /// Built-in default for a recognized role
    Builtin,
    /// Generic scaffold for an unrecognized role
    Generic,
}

/// The effective template for a role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleTemplate {
    pub role: Role,
    pub body: String,
    pub source: TemplateSource,
}

impl RoleTemplate {
    pub fn new(role: Role, body: impl Into<String>, source: TemplateSource) -> Self {
        Self {
            role,
            body: body.into(),
            source,
        }
    }
}

/// Resolves roles to templates with default fallback
pub struct TemplateResolver;

impl TemplateResolver {
    /// Resolve the effective template for `role`.
    ///
    /// A custom template is returned verbatim. Otherwise recognized roles get
    /// their built-in default and any other name gets a generic scaffold whose
    /// `{role}` is filled in at render time. Never fails.
    pub fn resolve(role: &Role, custom_templates: &HashMap<Role, String>) -> RoleTemplate {
        if let Some(custom) = custom_templates.get(role) {
            return RoleTemplate::new(role.clone(), custom.clone(), TemplateSource::Custom);
        }

        match Self::builtin(role) {
            Some(body) => RoleTemplate::new(role.clone(), body, TemplateSource::Builtin),
            None => RoleTemplate::new(role.clone(), GENERIC_TEMPLATE, TemplateSource::Generic),
        }
    }

    /// Resolve every role in `roles`, keyed by role.
    pub fn resolve_all(
        roles: &[Role],
        custom_templates: &HashMap<Role, String>,
    ) -> HashMap<Role, RoleTemplate> {
        roles
            .iter()
            .map(|role| (role.clone(), Self::resolve(role, custom_templates)))
            .collect()
    }

    /// Built-in default template for a recognized role
    pub fn builtin(role: &Role) -> Option<&'static str> {
        match role.as_str() {
            "generator" => Some(GENERATOR_TEMPLATE),
            "critic" => Some(CRITIC_TEMPLATE),
            "refiner" => Some(REFINER_TEMPLATE),
            "evaluator" => Some(EVALUATOR_TEMPLATE),
            _ => None,
        }
    }

    /// Fixed template used when role-based prompting is disabled
    pub fn augmentation() -> &'static str {
        AUGMENTATION_TEMPLATE
    }
}
