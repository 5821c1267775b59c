//! Output formatter trait

use roundtable_domain::{DiscussionState, OutputFormat};

/// Trait for formatting a finished discussion
pub trait OutputFormatter {
    /// Every round, every entry
    fn format(&self, state: &DiscussionState) -> String;

    /// Serialized discussion state
    fn format_json(&self, state: &DiscussionState) -> String;

    /// Last round only (concise output)
    fn format_final(&self, state: &DiscussionState) -> String;

    /// Dispatch on the configured output format
    fn render(&self, state: &DiscussionState, format: OutputFormat) -> String {
        match format {
            OutputFormat::Full => self.format(state),
            OutputFormat::Final => self.format_final(state),
            OutputFormat::Json => self.format_json(state),
        }
    }
}
