//! Presentation layer for ai-roundtable
//!
//! This crate contains CLI definitions, output formatters,
//! progress reporters, and the interactive chat interface.

pub mod chat;
pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use chat::{ChatRepl, ReplCommand};
pub use cli::commands::{
    AddModelArgs, Cli, Command, ConfigCommand, EnvArgs, RolesArgs, RoundtableArgs,
};
pub use output::console::{ConsoleFormatter, ModelListing};
pub use output::formatter::OutputFormatter;
pub use progress::reporter::{ProgressReporter, SimpleProgress};
