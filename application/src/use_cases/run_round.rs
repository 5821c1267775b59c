//! Round execution
//!
//! Runs the planned calls of one round against the [`ModelInvoker`] and
//! turns every call into exactly one [`TranscriptEntry`].
//!
//! - **Sequential**: calls run one at a time in plan order; each prompt sees
//!   the earlier rounds plus the entries already produced in this round.
//!   Each call still runs on its own task so a panic stays contained.
//! - **Parallel**: every prompt is rendered against the earlier rounds only,
//!   the calls run concurrently on a [`JoinSet`], and the entries are put
//!   back into plan order once all of them have finished.

use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger, events,
};
use crate::ports::model_invoker::ModelInvoker;
use crate::ports::progress::ProgressNotifier;
use crate::use_cases::shared::invoke_bounded;
use roundtable_domain::{
    DiscussionState, FailureKind, InvocationResult, ModelId, RenderContext, Role,
    TranscriptEntry, render,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// One planned model call of a round
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundCall {
    pub model: ModelId,
    /// Absent when role-based prompting is disabled
    pub role: Option<Role>,
    /// Unrendered template
    pub template: String,
}

impl RoundCall {
    pub fn new(model: ModelId, role: Option<Role>, template: impl Into<String>) -> Self {
        Self {
            model,
            role,
            template: template.into(),
        }
    }
}

/// Executes the calls of a single round
pub struct RoundExecutor {
    invoker: Arc<dyn ModelInvoker>,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl RoundExecutor {
    pub fn new(invoker: Arc<dyn ModelInvoker>) -> Self {
        Self {
            invoker,
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    /// Run `calls` for the current round of `state`.
    ///
    /// Returns one entry per call, in the order of `calls`. The state is only
    /// read; appending the entries is the caller's job.
    pub async fn run_round(
        &self,
        calls: &[RoundCall],
        state: &DiscussionState,
        timeout: Duration,
        parallel: bool,
        progress: &dyn ProgressNotifier,
    ) -> Vec<TranscriptEntry> {
        info!(
            "Round {}/{}: {} call(s), {}",
            state.current_round() + 1,
            state.total_rounds(),
            calls.len(),
            if parallel { "parallel" } else { "sequential" }
        );

        if parallel {
            self.run_parallel(calls, state, timeout, progress).await
        } else {
            self.run_sequential(calls, state, timeout, progress).await
        }
    }

    async fn run_sequential(
        &self,
        calls: &[RoundCall],
        state: &DiscussionState,
        timeout: Duration,
        progress: &dyn ProgressNotifier,
    ) -> Vec<TranscriptEntry> {
        let round = state.current_round();
        let mut entries: Vec<TranscriptEntry> = Vec::with_capacity(calls.len());

        for call in calls {
            let prompt = self.render_call(call, state, &entries);
            let invoker = Arc::clone(&self.invoker);
            let model = call.model.clone();

            // Spawned so a panicking adapter is contained to this call
            let handle = tokio::spawn(async move {
                invoke_bounded(invoker.as_ref(), &model, &prompt, timeout).await
            });
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!("Task join error: {}", e);
                    panicked_call()
                }
            };
            progress.on_model_complete(round, &call.model, outcome.is_success());

            let entry =
                TranscriptEntry::new(round, call.model.clone(), call.role.clone(), outcome);
            self.log_outcome(&entry);
            progress.on_entry(&entry);
            entries.push(entry);
        }

        entries
    }

    async fn run_parallel(
        &self,
        calls: &[RoundCall],
        state: &DiscussionState,
        timeout: Duration,
        progress: &dyn ProgressNotifier,
    ) -> Vec<TranscriptEntry> {
        let round = state.current_round();
        let mut join_set = JoinSet::new();

        for (idx, call) in calls.iter().enumerate() {
            let prompt = self.render_call(call, state, &[]);
            let invoker = Arc::clone(&self.invoker);
            let model = call.model.clone();

            join_set.spawn(async move {
                let outcome = invoke_bounded(invoker.as_ref(), &model, &prompt, timeout).await;
                (idx, outcome)
            });
        }

        let mut outcomes: Vec<Option<InvocationResult>> = vec![None; calls.len()];

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((idx, outcome)) => {
                    progress.on_model_complete(round, &calls[idx].model, outcome.is_success());
                    outcomes[idx] = Some(outcome);
                }
                Err(e) => {
                    warn!("Task join error: {}", e);
                }
            }
        }

        calls
            .iter()
            .zip(outcomes)
            .map(|(call, outcome)| {
                let outcome = outcome.unwrap_or_else(|| {
                    progress.on_model_complete(round, &call.model, false);
                    panicked_call()
                });
                let entry =
                    TranscriptEntry::new(round, call.model.clone(), call.role.clone(), outcome);
                self.log_outcome(&entry);
                progress.on_entry(&entry);
                entry
            })
            .collect()
    }

    /// Render the call's template against the transcript plus `in_round`.
    fn render_call(
        &self,
        call: &RoundCall,
        state: &DiscussionState,
        in_round: &[TranscriptEntry],
    ) -> String {
        let mut context = RenderContext::for_round(
            state.current_round(),
            state.total_rounds(),
            state.topic().content(),
            state.previous_responses(in_round),
        );
        if let Some(role) = &call.role {
            context = context.with_role(role.as_str());
        }
        let prompt = render(&call.template, &context);

        debug!(
            "Rendered prompt for {} ({} bytes)",
            call.model,
            prompt.len()
        );
        self.conversation_logger.log(ConversationEvent::new(
            events::PROMPT_RENDERED,
            json!({
                "round": context.current_round,
                "model": call.model.as_str(),
                "role": call.role.as_ref().map(Role::as_str),
                "prompt": prompt,
            }),
        ));

        prompt
    }

    fn log_outcome(&self, entry: &TranscriptEntry) {
        let role = entry.role.as_ref().map(Role::as_str);
        match &entry.outcome {
            InvocationResult::Success { text } => {
                info!("Model {} responded ({} bytes)", entry.model, text.len());
                self.conversation_logger.log(ConversationEvent::new(
                    events::MODEL_RESPONSE,
                    json!({
                        "round": entry.round_number(),
                        "model": entry.model.as_str(),
                        "role": role,
                        "response": text,
                    }),
                ));
            }
            InvocationResult::Failure { kind, message } => {
                warn!("Model {} failed ({}): {}", entry.model, kind, message);
                self.conversation_logger.log(ConversationEvent::new(
                    events::MODEL_FAILED,
                    json!({
                        "round": entry.round_number(),
                        "model": entry.model.as_str(),
                        "role": role,
                        "kind": kind.as_str(),
                        "error": message,
                    }),
                ));
            }
        }
    }
}

fn panicked_call() -> InvocationResult {
    InvocationResult::failure(FailureKind::Transport, "model call task panicked")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::model_invoker::InvokeError;
    use crate::ports::progress::NoProgress;
    use async_trait::async_trait;
    use roundtable_domain::Topic;
    use std::sync::Mutex;

    // ==================== Test Mocks ====================

    /// Echoes the prompt back so tests can inspect what each model saw.
    struct EchoInvoker {
        panic_on: Option<&'static str>,
        calls: Mutex<Vec<String>>,
    }

    impl EchoInvoker {
        fn new() -> Self {
            Self {
                panic_on: None,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn panicking_on(model: &'static str) -> Self {
            Self {
                panic_on: Some(model),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ModelInvoker for EchoInvoker {
        async fn invoke(
            &self,
            model: &ModelId,
            prompt: &str,
            _timeout: Duration,
        ) -> Result<String, InvokeError> {
            self.calls.lock().unwrap().push(model.to_string());
            if self.panic_on == Some(model.as_str()) {
                panic!("adapter bug");
            }
            Ok(format!("{} saw: {}", model, prompt))
        }
    }

    fn running_state() -> DiscussionState {
        let mut state = DiscussionState::new(Topic::new("topic").unwrap(), 1);
        state.start();
        state
    }

    fn calls() -> Vec<RoundCall> {
        vec![
            RoundCall::new(ModelId::new("a"), Some(Role::generator()), "{previous_responses}"),
            RoundCall::new(ModelId::new("b"), Some(Role::critic()), "{previous_responses}"),
        ]
    }

    #[tokio::test]
    async fn test_sequential_sees_same_round_entries() {
        let executor = RoundExecutor::new(Arc::new(EchoInvoker::new()));
        let entries = executor
            .run_round(&calls(), &running_state(), Duration::from_secs(5), false, &NoProgress)
            .await;

        assert_eq!(entries.len(), 2);
        let second = entries[1].outcome.text().unwrap();
        assert!(second.contains("[Round 1] a (generator):"));
    }

    #[tokio::test]
    async fn test_parallel_sees_only_prior_rounds() {
        let executor = RoundExecutor::new(Arc::new(EchoInvoker::new()));
        let entries = executor
            .run_round(&calls(), &running_state(), Duration::from_secs(5), true, &NoProgress)
            .await;

        let models: Vec<_> = entries.iter().map(|e| e.model.as_str()).collect();
        assert_eq!(models, vec!["a", "b"]);
        for entry in &entries {
            assert_eq!(
                entry.outcome.text().unwrap(),
                format!("{} saw: No previous responses yet.", entry.model)
            );
        }
    }

    #[tokio::test]
    async fn test_panicked_task_becomes_transport_failure() {
        let executor = RoundExecutor::new(Arc::new(EchoInvoker::panicking_on("a")));
        let entries = executor
            .run_round(&calls(), &running_state(), Duration::from_secs(5), true, &NoProgress)
            .await;

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].model.as_str(), "a");
        assert_eq!(entries[0].outcome.failure_kind(), Some(FailureKind::Transport));
        assert!(entries[1].is_success());
    }

    #[tokio::test]
    async fn test_sequential_panic_becomes_transport_failure() {
        let executor = RoundExecutor::new(Arc::new(EchoInvoker::panicking_on("a")));
        let entries = executor
            .run_round(&calls(), &running_state(), Duration::from_secs(5), false, &NoProgress)
            .await;

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].model.as_str(), "a");
        assert_eq!(entries[0].outcome.failure_kind(), Some(FailureKind::Transport));

        // The failed call contributes nothing to the next prompt
        let second = entries[1].outcome.text().unwrap();
        assert_eq!(second, "b saw: No previous responses yet.");
    }

    #[tokio::test]
    async fn test_role_name_rendered_into_prompt() {
        let executor = RoundExecutor::new(Arc::new(EchoInvoker::new()));
        let calls = vec![
            RoundCall::new(ModelId::new("a"), Some(Role::new("historian")), "as {role}"),
            RoundCall::new(ModelId::new("b"), None, "as {role}"),
        ];
        let entries = executor
            .run_round(&calls, &running_state(), Duration::from_secs(5), false, &NoProgress)
            .await;

        assert_eq!(entries[0].outcome.text().unwrap(), "a saw: as historian");
        assert_eq!(entries[1].outcome.text().unwrap(), "b saw: as {role}");
    }

    #[tokio::test]
    async fn test_empty_calls_yield_no_entries() {
        let invoker = Arc::new(EchoInvoker::new());
        let executor = RoundExecutor::new(invoker.clone());
        let entries = executor
            .run_round(&[], &running_state(), Duration::from_secs(5), true, &NoProgress)
            .await;
        assert!(entries.is_empty());
        assert!(invoker.calls.lock().unwrap().is_empty());
    }
}
