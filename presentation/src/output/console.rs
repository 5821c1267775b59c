//! Console output formatter for round-table discussions

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use roundtable_application::ChatTurn;
use roundtable_domain::core::string::preview;
use roundtable_domain::{
    DiscussionConfig, DiscussionState, InvocationResult, RoleTemplate, TemplateSource,
    TranscriptEntry,
};

/// Characters of a chat message shown by `/history`
const HISTORY_PREVIEW_LEN: usize = 100;

/// One row of `--list-models`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelListing {
    pub id: String,
    pub provider: String,
    pub model: String,
    /// Listed in `roundtable.enabled_models`
    pub participant: bool,
    /// Why calls would fail (missing key, unknown provider)
    pub unavailable: Option<String>,
}

/// Formats discussions for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Force colors on or off for the whole process (`[output] color`)
    pub fn set_color(enabled: bool) {
        colored::control::set_override(enabled);
    }

    /// Format the complete discussion, round by round
    pub fn format(state: &DiscussionState) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Round-Table Discussion"));
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n",
            "Topic:".cyan().bold(),
            state.topic().content()
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Rounds:".cyan().bold(),
            state.completed_rounds()
        ));

        for round in 0..state.completed_rounds() {
            output.push_str(&Self::section_header(&format!("Round {}", round + 1)));
            for entry in state.round_entries(round) {
                output.push_str(&Self::entry(entry));
            }
        }

        output.push_str(&format!(
            "\n{} {} response(s), {} failure(s)\n",
            "Summary:".cyan().bold(),
            state.success_count(),
            state.failure_count()
        ));
        output.push_str(&Self::footer());

        output
    }

    /// Format as JSON
    pub fn format_json(state: &DiscussionState) -> String {
        serde_json::to_string_pretty(state).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format the final round only
    pub fn format_final(state: &DiscussionState) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{}\n\n",
            "=== Round-Table Conclusion ===".cyan().bold()
        ));
        output.push_str(&format!("{} {}\n", "Q:".bold(), state.topic().content()));

        let mut any = false;
        for entry in state.final_round_entries() {
            output.push_str(&Self::entry(entry));
            any = true;
        }
        if !any {
            output.push_str(&format!("\n{}\n", "No responses recorded.".dimmed()));
        }

        output
    }

    /// Single-model answer (`--single` and the interactive session)
    pub fn format_single(model: &str, outcome: &InvocationResult) -> String {
        match outcome {
            InvocationResult::Success { text } => {
                format!("{}\n{}\n", format!("── {} ──", model).yellow().bold(), text.trim())
            }
            InvocationResult::Failure { kind, message } => format!(
                "{}\n{} ({}): {}\n",
                format!("── {} ──", model).red().bold(),
                "Error".red(),
                kind,
                message
            ),
        }
    }

    /// `--list-roles` / `/roles`
    pub fn format_roles(templates: &[RoleTemplate], role_based: bool) -> String {
        let mut output = String::new();
        output.push_str(&format!("{}\n", "Enabled roles:".cyan().bold()));

        for template in templates {
            let source = match template.source {
                TemplateSource::Custom => "custom template",
                TemplateSource::Builtin => "built-in template",
                TemplateSource::Generic => "generic template",
            };
            output.push_str(&format!(
                "  {:<12} {} {}\n",
                template.role.display_name().bold(),
                template.role.description(),
                format!("[{}]", source).dimmed()
            ));
        }

        if !role_based {
            output.push_str(&format!(
                "\n{}\n",
                "Role-based prompting is disabled; roles are not used.".yellow()
            ));
        }
        output
    }

    /// `--list-models` / `/models`
    pub fn format_models(models: &[ModelListing], current: Option<&str>) -> String {
        let mut output = String::new();
        output.push_str(&format!("{}\n", "Configured models:".cyan().bold()));

        for listing in models {
            let marker = if current == Some(listing.id.as_str()) {
                "*"
            } else if listing.participant {
                "+"
            } else {
                " "
            };
            let mut line = format!(
                "  {} {:<28} {} / {}",
                marker, listing.id, listing.provider, listing.model
            );
            if let Some(reason) = &listing.unavailable {
                line.push_str(&format!("  {}", format!("(unavailable: {})", reason).red()));
            }
            output.push_str(&line);
            output.push('\n');
        }

        output.push_str(&format!(
            "\n{}\n",
            "+ round-table participant   * current model".dimmed()
        ));
        output
    }

    /// `/history`: the kept chat turns, oldest first, one line per message
    pub fn format_history(turns: &[ChatTurn]) -> String {
        if turns.is_empty() {
            return format!("{}\n", "No conversation history".dimmed());
        }

        let mut output = String::new();
        output.push_str(&format!("{}\n", "Conversation history:".cyan().bold()));
        for turn in turns {
            output.push_str(&format!(
                "  {} {}\n",
                "[user]".green(),
                preview(&turn.user, HISTORY_PREVIEW_LEN)
            ));
            output.push_str(&format!(
                "  {} {}\n",
                "[assistant]".yellow(),
                preview(&turn.assistant, HISTORY_PREVIEW_LEN)
            ));
        }
        output
    }

    /// `/config`: the settings the session runs with
    pub fn format_session(
        current_model: &str,
        participants: usize,
        config: &DiscussionConfig,
    ) -> String {
        let mut output = String::new();
        output.push_str(&format!("{}\n", "Configuration:".cyan().bold()));
        output.push_str(&format!("  Current model:      {}\n", current_model));
        output.push_str(&format!("  Round-table models: {} configured\n", participants));
        output.push_str(&format!("  Discussion rounds:  {}\n", config.rounds));
        output.push_str(&format!("  Parallel mode:      {}\n", config.parallel));
        output.push_str(&format!(
            "  Timeout:            {}s\n",
            config.timeout.as_secs()
        ));
        output.push_str(&format!(
            "\n{}\n",
            "Use `roundtable config list` for the full configuration.".dimmed()
        ));
        output
    }

    fn entry(entry: &TranscriptEntry) -> String {
        let label = match &entry.role {
            Some(role) => format!("── {} ({}) ──", entry.model, role),
            None => format!("── {} ──", entry.model),
        };
        match &entry.outcome {
            InvocationResult::Success { text } => {
                format!("\n{}\n{}\n", label.yellow().bold(), text.trim())
            }
            InvocationResult::Failure { kind, message } => format!(
                "\n{}\n{} ({}): {}\n",
                label.red().bold(),
                "Error".red(),
                kind,
                message
            ),
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("{}\n", "=".repeat(60).cyan())
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, state: &DiscussionState) -> String {
        Self::format(state)
    }

    fn format_json(&self, state: &DiscussionState) -> String {
        Self::format_json(state)
    }

    fn format_final(&self, state: &DiscussionState) -> String {
        Self::format_final(state)
    }
}
