//! Interactive chat module
//!
//! Provides a readline-based interactive session: plain input goes to the
//! current model, `/roundtable` starts a discussion.

mod repl;

pub use repl::{ChatHistory, ChatRepl, MAX_HISTORY_TURNS, ReplCommand};
