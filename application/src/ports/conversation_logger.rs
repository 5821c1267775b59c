//! Port for structured conversation logging.
//!
//! Defines the [`ConversationLogger`] trait for recording discussion events
//! (rendered prompts, model responses and failures, round boundaries) to a
//! structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures the full
//! discussion in a machine-readable format (JSONL). The log is write-only;
//! nothing reads it back.

use serde_json::Value;

/// Event type identifiers emitted by the use cases
pub mod events {
    pub const DISCUSSION_STARTED: &str = "discussion_started";
    pub const PROMPT_RENDERED: &str = "prompt_rendered";
    pub const MODEL_RESPONSE: &str = "model_response";
    pub const MODEL_FAILED: &str = "model_failed";
    pub const ROUND_COMPLETED: &str = "round_completed";
    pub const DISCUSSION_COMPLETED: &str = "discussion_completed";
}

/// A structured conversation event for logging.
///
/// The adapter adds the timestamp when it writes the record.
pub struct ConversationEvent {
    /// Event type identifier (see [`events`]).
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging conversation events to a structured log.
///
/// `log` is synchronous and infallible; adapters swallow write errors so the
/// discussion is never interrupted by logging.
pub trait ConversationLogger: Send + Sync {
    /// Record a conversation event.
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
