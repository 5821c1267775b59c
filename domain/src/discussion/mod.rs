//! Round-table discussion domain
//!
//! A discussion runs a fixed number of rounds over one [`Topic`](crate::core::topic::Topic).
//! Each round every participating model answers once, optionally under an
//! assigned role, and the answers accumulate in an append-only transcript
//! that feeds the `{previous_responses}` placeholder of later prompts.

pub mod config;
pub mod entities;
pub mod history;
pub mod value_objects;

pub use config::DiscussionConfig;
pub use entities::{DiscussionPhase, DiscussionState};
pub use history::{NO_PREVIOUS_RESPONSES, format_previous_responses};
pub use value_objects::{FailureKind, InvocationResult, TranscriptEntry};
