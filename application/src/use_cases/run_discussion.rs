//! Run Discussion use case
//!
//! Orchestrates the full round-table flow: validate, then for every round
//! plan roles, resolve templates, execute the round and append it to the
//! transcript. The discussion always runs the configured number of rounds;
//! the only early exit is cancellation, which is honored between rounds.

use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger, events,
};
use crate::ports::model_invoker::ModelInvoker;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::use_cases::run_round::{RoundCall, RoundExecutor};
use crate::use_cases::shared::check_cancelled;
use roundtable_domain::{
    ConfigurationError, DiscussionConfig, DiscussionPhase, DiscussionState, ModelDescriptor,
    Role, RoleAssignmentMap, RoleAssignmentPlanner, RoleTemplate, TemplateResolver, Topic,
};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Errors that can occur during a discussion
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RunDiscussionError {
    #[error("Invalid configuration: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Discussion cancelled after {completed_rounds} round(s)")]
    Cancelled { completed_rounds: usize },
}

impl RunDiscussionError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RunDiscussionError::Cancelled { .. })
    }
}

/// Input for the RunDiscussion use case
#[derive(Debug, Clone)]
pub struct RunDiscussionInput {
    /// The original prompt
    pub prompt: String,
    /// Participants, in declaration order
    pub models: Vec<ModelDescriptor>,
    pub config: DiscussionConfig,
}

impl RunDiscussionInput {
    pub fn new(
        prompt: impl Into<String>,
        models: Vec<ModelDescriptor>,
        config: DiscussionConfig,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            models,
            config,
        }
    }
}

/// Use case for running a round-table discussion
pub struct RunDiscussionUseCase {
    invoker: Arc<dyn ModelInvoker>,
    conversation_logger: Arc<dyn ConversationLogger>,
    cancellation_token: Option<CancellationToken>,
}

impl RunDiscussionUseCase {
    pub fn new(invoker: Arc<dyn ModelInvoker>) -> Self {
        Self {
            invoker,
            conversation_logger: Arc::new(NoConversationLogger),
            cancellation_token: None,
        }
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    /// Set a cancellation token for graceful interruption between rounds
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(
        &self,
        input: RunDiscussionInput,
    ) -> Result<DiscussionState, RunDiscussionError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunDiscussionInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<DiscussionState, RunDiscussionError> {
        let RunDiscussionInput {
            prompt,
            models,
            config,
        } = input;

        config.validate(&models)?;
        let topic = Topic::new(prompt)?;

        info!(
            "Starting discussion with {} model(s), {} round(s), {}",
            models.len(),
            config.rounds,
            if config.role_based {
                "role-based"
            } else {
                "without roles"
            }
        );
        self.conversation_logger.log(ConversationEvent::new(
            events::DISCUSSION_STARTED,
            json!({
                "prompt": topic.content(),
                "models": models.iter().map(|m| m.id.as_str()).collect::<Vec<_>>(),
                "roles": config.enabled_roles.iter().map(Role::as_str).collect::<Vec<_>>(),
                "rounds": config.rounds,
                "parallel": config.parallel,
                "rotation": config.rotation,
                "role_based": config.role_based,
            }),
        ));

        let mut state = DiscussionState::new(topic, config.rounds);
        progress.on_discussion_start(state.topic(), config.rounds, models.len());

        let templates = if config.role_based {
            TemplateResolver::resolve_all(&config.enabled_roles, &config.custom_templates)
        } else {
            HashMap::new()
        };
        // Without rotation the plan never changes, so compute it once
        let fixed_plan = (config.role_based && !config.rotation).then(|| {
            RoleAssignmentPlanner::plan_round(0, &config.enabled_roles, &models, false)
        });

        let executor = RoundExecutor::new(Arc::clone(&self.invoker))
            .with_conversation_logger(Arc::clone(&self.conversation_logger));

        state.start();
        while let DiscussionPhase::Running { round } = state.phase() {
            check_cancelled(&self.cancellation_token, state.completed_rounds())?;

            let calls = Self::plan_calls(round, &models, &config, &templates, fixed_plan.as_ref());
            progress.on_round_start(round, calls.len());

            let entries = executor
                .run_round(&calls, &state, config.timeout, config.parallel, progress)
                .await;
            progress.on_round_complete(round, &entries);

            let successes = entries.iter().filter(|e| e.is_success()).count();
            debug!(
                "Round {} complete: {} succeeded, {} failed",
                round + 1,
                successes,
                entries.len() - successes
            );
            self.conversation_logger.log(ConversationEvent::new(
                events::ROUND_COMPLETED,
                json!({
                    "round": round + 1,
                    "succeeded": successes,
                    "failed": entries.len() - successes,
                }),
            ));

            state.complete_round(entries);
        }

        info!(
            "Discussion complete: {} response(s), {} failure(s)",
            state.success_count(),
            state.failure_count()
        );
        self.conversation_logger.log(ConversationEvent::new(
            events::DISCUSSION_COMPLETED,
            json!({
                "rounds": state.completed_rounds(),
                "responses": state.success_count(),
                "failures": state.failure_count(),
            }),
        ));
        progress.on_discussion_complete(&state);

        Ok(state)
    }

    /// Build the calls of one round.
    ///
    /// Role-based: one call per planned assignment with its role template.
    /// Otherwise: every model in declaration order with the augmentation
    /// template and no role.
    fn plan_calls(
        round: usize,
        models: &[ModelDescriptor],
        config: &DiscussionConfig,
        templates: &HashMap<Role, RoleTemplate>,
        fixed_plan: Option<&RoleAssignmentMap>,
    ) -> Vec<RoundCall> {
        if !config.role_based {
            return models
                .iter()
                .map(|m| RoundCall::new(m.id.clone(), None, TemplateResolver::augmentation()))
                .collect();
        }

        let rotated;
        let plan = match fixed_plan {
            Some(plan) => plan,
            None => {
                rotated = RoleAssignmentPlanner::plan_round(
                    round,
                    &config.enabled_roles,
                    models,
                    config.rotation,
                );
                &rotated
            }
        };

        plan.iter()
            .map(|assignment| {
                let template = match templates.get(&assignment.role) {
                    Some(template) => template.body.clone(),
                    None => TemplateResolver::resolve(&assignment.role, &config.custom_templates).body,
                };
                RoundCall::new(
                    assignment.model.clone(),
                    Some(assignment.role.clone()),
                    template,
                )
            })
            .collect()
    }
}
