//! `{previous_responses}` serialization

use super::value_objects::TranscriptEntry;

/// Rendered in place of an empty history
pub const NO_PREVIOUS_RESPONSES: &str = "No previous responses yet.";

/// Format successful entries as labeled blocks, in the given order.
///
/// ```text
/// [Round 1] openai/gpt-4 (generator):
/// <response>
///
/// [Round 1] anthropic/claude-3-sonnet (critic):
/// <response>
/// ```
///
/// Failed entries are skipped. Without any successful entry the result is
/// [`NO_PREVIOUS_RESPONSES`].
pub fn format_previous_responses<'a>(
    entries: impl IntoIterator<Item = &'a TranscriptEntry>,
) -> String {
    let blocks: Vec<String> = entries
        .into_iter()
        .filter_map(|entry| {
            let text = entry.outcome.text()?;
            let header = match &entry.role {
                Some(role) => format!(
                    "[Round {}] {} ({}):",
                    entry.round_number(),
                    entry.model,
                    role
                ),
                None => format!("[Round {}] {}:", entry.round_number(), entry.model),
            };
            Some(format!("{}\n{}", header, text.trim()))
        })
        .collect();

    if blocks.is_empty() {
        NO_PREVIOUS_RESPONSES.to_string()
    } else {
        blocks.join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discussion::value_objects::{FailureKind, InvocationResult};
    use crate::role::Role;

    fn ok(round: usize, model: &str, role: Option<Role>, text: &str) -> TranscriptEntry {
        TranscriptEntry::new(round, model, role, InvocationResult::from_response(text))
    }

    #[test]
    fn test_empty_history() {
        let entries: Vec<TranscriptEntry> = Vec::new();
        assert_eq!(format_previous_responses(&entries), NO_PREVIOUS_RESPONSES);
    }

    #[test]
    fn test_block_format() {
        let entries = vec![
            ok(0, "a", Some(Role::generator()), "Idea one.\n"),
            ok(0, "b", Some(Role::critic()), "Flaw found."),
        ];
        assert_eq!(
            format_previous_responses(&entries),
            "[Round 1] a (generator):\nIdea one.\n\n[Round 1] b (critic):\nFlaw found."
        );
    }

    #[test]
    fn test_block_without_role() {
        let entries = vec![ok(1, "a", None, "hello")];
        assert_eq!(format_previous_responses(&entries), "[Round 2] a:\nhello");
    }

    #[test]
    fn test_failures_omitted() {
        let entries = vec![
            TranscriptEntry::new(
                0,
                "a",
                Some(Role::generator()),
                InvocationResult::failure(FailureKind::Timeout, "timed out"),
            ),
            ok(0, "b", Some(Role::critic()), "still here"),
        ];
        assert_eq!(
            format_previous_responses(&entries),
            "[Round 1] b (critic):\nstill here"
        );
    }

    #[test]
    fn test_only_failures_renders_placeholder() {
        let entries = vec![TranscriptEntry::new(
            0,
            "a",
            None,
            InvocationResult::failure(FailureKind::Transport, "refused"),
        )];
        assert_eq!(format_previous_responses(&entries), NO_PREVIOUS_RESPONSES);
    }
}
