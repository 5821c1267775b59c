//! Application layer for ai-roundtable
//!
//! This crate contains use cases and port definitions.
//! It depends only on the domain layer.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    model_invoker::{InvokeError, ModelInvoker},
    progress::{NoProgress, ProgressNotifier},
};
pub use use_cases::run_discussion::{RunDiscussionError, RunDiscussionInput, RunDiscussionUseCase};
pub use use_cases::run_round::{RoundCall, RoundExecutor};
pub use use_cases::run_single::{ChatTurn, RunSingleInput, RunSingleUseCase};
