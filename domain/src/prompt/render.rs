//! Placeholder substitution for prompt templates

use serde::{Deserialize, Serialize};

const PLACEHOLDERS: [&str; 5] = [
    "original_prompt",
    "previous_responses",
    "current_round",
    "total_rounds",
    "role",
];

/// Values substituted into a template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderContext {
    pub original_prompt: String,
    pub previous_responses: String,
    /// 1-based
    pub current_round: usize,
    pub total_rounds: usize,
    /// Role the model plays; `{role}` stays verbatim without one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl RenderContext {
    /// Build a context from a 0-based round index.
    pub fn for_round(
        round_index: usize,
        total_rounds: usize,
        original_prompt: impl Into<String>,
        previous_responses: impl Into<String>,
    ) -> Self {
        Self {
            original_prompt: original_prompt.into(),
            previous_responses: previous_responses.into(),
            current_round: round_index + 1,
            total_rounds,
            role: None,
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    fn value(&self, name: &str) -> Option<String> {
        match name {
            "original_prompt" => Some(self.original_prompt.clone()),
            "previous_responses" => Some(self.previous_responses.clone()),
            "current_round" => Some(self.current_round.to_string()),
            "total_rounds" => Some(self.total_rounds.to_string()),
            "role" => self.role.clone(),
            _ => None,
        }
    }
}

/// Substitute every placeholder occurrence in `template`.
///
/// Substitution is a single left-to-right pass: text coming from a value is
/// never re-scanned, so a prompt that itself contains `{previous_responses}`
/// is inserted literally. Unknown `{...}` sequences and unbalanced braces are
/// copied through unchanged.
pub fn render(template: &str, context: &RenderContext) -> String {
    let mut output = String::with_capacity(template.len() + context.previous_responses.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        output.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let substituted = after.find('}').and_then(|close| {
            let name = &after[..close];
            if PLACEHOLDERS.contains(&name) {
                context.value(name).map(|value| (value, close))
            } else {
                None
            }
        });

        match substituted {
            Some((value, close)) => {
                output.push_str(&value);
                rest = &after[close + 1..];
            }
            None => {
                output.push('{');
                rest = after;
            }
        }
    }
    output.push_str(rest);
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> RenderContext {
        RenderContext::for_round(0, 3, "Is Rust fast?", "[Round 1] a: yes")
    }

    #[test]
    fn test_render_all_placeholders() {
        let out = render(
            "Q: {original_prompt}\nR{current_round}/{total_rounds}\n{previous_responses}",
            &context(),
        );
        assert_eq!(out, "Q: Is Rust fast?\nR1/3\n[Round 1] a: yes");
    }

    #[test]
    fn test_round_numbers_are_one_based() {
        let ctx = RenderContext::for_round(2, 3, "p", "");
        assert_eq!(render("{current_round} of {total_rounds}", &ctx), "3 of 3");
    }

    #[test]
    fn test_repeated_placeholder() {
        assert_eq!(
            render("{original_prompt} / {original_prompt}", &context()),
            "Is Rust fast? / Is Rust fast?"
        );
    }

    #[test]
    fn test_unknown_placeholder_left_verbatim() {
        assert_eq!(
            render("{role} said {nothing} about {original_prompt}", &context()),
            "{role} said {nothing} about Is Rust fast?"
        );
    }

    #[test]
    fn test_role_substituted_when_known() {
        let ctx = context().with_role("historian");
        assert_eq!(
            render("As {role}: {original_prompt}", &ctx),
            "As historian: Is Rust fast?"
        );
    }

    #[test]
    fn test_role_name_is_not_rescanned() {
        let ctx = context().with_role("{original_prompt}");
        assert_eq!(render("role={role}", &ctx), "role={original_prompt}");
    }

    #[test]
    fn test_unbalanced_braces() {
        assert_eq!(render("{ {original_prompt", &context()), "{ {original_prompt");
        assert_eq!(render("}{{current_round}}", &context()), "}{1}");
    }

    #[test]
    fn test_values_are_not_rescanned() {
        let ctx = RenderContext::for_round(0, 1, "echo {previous_responses}", "secret");
        assert_eq!(render("{original_prompt}", &ctx), "echo {previous_responses}");
    }

    #[test]
    fn test_render_is_pure() {
        let ctx = context();
        let template = "{original_prompt}:{previous_responses}";
        assert_eq!(render(template, &ctx), render(template, &ctx));
    }

    #[test]
    fn test_no_placeholders() {
        assert_eq!(render("plain text", &context()), "plain text");
        assert_eq!(render("", &context()), "");
    }
}
