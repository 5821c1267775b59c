//! Run Single use case
//!
//! Asks one model one prompt, bounded by the call timeout. Backs `--single`
//! and plain input in the interactive session, where earlier exchanges of
//! the session are sent along as context.

use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger, events,
};
use crate::ports::model_invoker::ModelInvoker;
use crate::use_cases::shared::invoke_bounded;
use roundtable_domain::core::string::truncate;
use roundtable_domain::{ConfigurationError, InvocationResult, ModelId, Topic};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// One completed exchange of an interactive chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub user: String,
    pub assistant: String,
}

impl ChatTurn {
    pub fn new(user: impl Into<String>, assistant: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            assistant: assistant.into(),
        }
    }
}

/// Input for the RunSingle use case
#[derive(Debug, Clone)]
pub struct RunSingleInput {
    pub model: ModelId,
    pub prompt: String,
    pub timeout: Duration,
    /// Earlier exchanges, oldest first
    pub history: Vec<ChatTurn>,
}

impl RunSingleInput {
    pub fn new(model: ModelId, prompt: impl Into<String>, timeout: Duration) -> Self {
        Self {
            model,
            prompt: prompt.into(),
            timeout,
            history: Vec::new(),
        }
    }

    pub fn with_history(mut self, history: Vec<ChatTurn>) -> Self {
        self.history = history;
        self
    }

    /// The text actually sent to the model
    fn compose(&self, topic: &Topic) -> String {
        if self.history.is_empty() {
            return topic.content().to_string();
        }

        let mut prompt = String::from("Conversation so far:\n\n");
        for turn in &self.history {
            prompt.push_str(&format!("User: {}\n\nAssistant: {}\n\n", turn.user, turn.assistant));
        }
        prompt.push_str(&format!("User: {}", topic.content()));
        prompt
    }
}

/// Use case for asking a single model
pub struct RunSingleUseCase {
    invoker: Arc<dyn ModelInvoker>,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl RunSingleUseCase {
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

    /// Ask the model. Only a blank prompt is an error; call failures come
    /// back as a failed [`InvocationResult`].
    pub async fn execute(
        &self,
        input: RunSingleInput,
    ) -> Result<InvocationResult, ConfigurationError> {
        let topic = Topic::new(input.prompt.clone())?;
        let prompt = input.compose(&topic);

        info!("Asking {}: {}", input.model, truncate(topic.content(), 80));
        self.conversation_logger.log(ConversationEvent::new(
            events::PROMPT_RENDERED,
            json!({ "model": input.model.as_str(), "prompt": prompt }),
        ));

        let outcome =
            invoke_bounded(self.invoker.as_ref(), &input.model, &prompt, input.timeout).await;

        let event = match &outcome {
            InvocationResult::Success { text } => ConversationEvent::new(
                events::MODEL_RESPONSE,
                json!({ "model": input.model.as_str(), "response": text }),
            ),
            InvocationResult::Failure { kind, message } => ConversationEvent::new(
                events::MODEL_FAILED,
                json!({ "model": input.model.as_str(), "kind": kind.as_str(), "error": message }),
            ),
        };
        self.conversation_logger.log(event);

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::model_invoker::InvokeError;
    use async_trait::async_trait;
    use roundtable_domain::FailureKind;
    use std::sync::Mutex;

    struct MockInvoker {
        response: Result<String, InvokeError>,
        last_prompt: Mutex<Option<String>>,
    }

    impl MockInvoker {
        fn new(response: Result<String, InvokeError>) -> Self {
            Self {
                response,
                last_prompt: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl ModelInvoker for MockInvoker {
        async fn invoke(
            &self,
            _model: &ModelId,
            prompt: &str,
            _timeout: Duration,
        ) -> Result<String, InvokeError> {
            *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
            self.response.clone()
        }
    }

    fn input(prompt: &str) -> RunSingleInput {
        RunSingleInput::new(ModelId::new("openai/gpt-4"), prompt, Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_success_returns_text() {
        let invoker = Arc::new(MockInvoker::new(Ok("42".to_string())));
        let use_case = RunSingleUseCase::new(invoker.clone());

        let result = use_case.execute(input("meaning of life?")).await.unwrap();
        assert_eq!(result.text(), Some("42"));
        assert_eq!(
            invoker.last_prompt.lock().unwrap().as_deref(),
            Some("meaning of life?")
        );
    }

    #[tokio::test]
    async fn test_invoker_error_becomes_failure() {
        let use_case = RunSingleUseCase::new(Arc::new(MockInvoker::new(Err(
            InvokeError::ModelNotAvailable("openai/gpt-4".to_string()),
        ))));

        let result = use_case.execute(input("hi")).await.unwrap();
        assert_eq!(result.failure_kind(), Some(FailureKind::Transport));
    }

    #[tokio::test]
    async fn test_blank_prompt_rejected() {
        let use_case = RunSingleUseCase::new(Arc::new(MockInvoker::new(Ok("x".to_string()))));
        assert_eq!(
            use_case.execute(input(" ")).await.unwrap_err(),
            ConfigurationError::EmptyPrompt
        );
    }

    #[tokio::test]
    async fn test_history_sent_as_context() {
        let invoker = Arc::new(MockInvoker::new(Ok("sure".to_string())));
        let use_case = RunSingleUseCase::new(invoker.clone());

        use_case
            .execute(input("and in Go?").with_history(vec![ChatTurn::new(
                "How do I sort in Rust?",
                "Use slice::sort.",
            )]))
            .await
            .unwrap();

        let prompt = invoker.last_prompt.lock().unwrap().clone().unwrap();
        assert_eq!(
            prompt,
            "Conversation so far:\n\nUser: How do I sort in Rust?\n\nAssistant: Use slice::sort.\n\nUser: and in Go?"
        );
    }
}
