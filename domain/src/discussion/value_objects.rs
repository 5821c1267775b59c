//! Discussion value objects - per-call outcomes and transcript entries.

use crate::core::model::ModelId;
use crate::role::Role;
use serde::{Deserialize, Serialize};

/// Why a model call produced no usable response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The call exceeded the per-call timeout
    Timeout,
    /// The invoker reported an error (network, provider, unavailable model)
    Transport,
    /// The model answered with blank text
    EmptyResponse,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Timeout => "timeout",
            FailureKind::Transport => "transport",
            FailureKind::EmptyResponse => "empty_response",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of one planned model call. Every planned call yields exactly one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InvocationResult {
    Success { text: String },
    Failure { kind: FailureKind, message: String },
}

impl InvocationResult {
    /// Classify raw response text: blank text becomes an `EmptyResponse` failure.
    pub fn from_response(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.trim().is_empty() {
            Self::failure(FailureKind::EmptyResponse, "model returned an empty response")
        } else {
            Self::Success { text }
        }
    }

    pub fn failure(kind: FailureKind, message: impl Into<String>) -> Self {
        Self::Failure {
            kind,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Response text when successful
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Success { text } => Some(text),
            Self::Failure { .. } => None,
        }
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { kind, .. } => Some(*kind),
        }
    }
}

/// One call's record in the discussion transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    /// 0-based round index
    pub round: usize,
    pub model: ModelId,
    /// Absent when role-based prompting is disabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    pub outcome: InvocationResult,
}

impl TranscriptEntry {
    pub fn new(
        round: usize,
        model: impl Into<ModelId>,
        role: Option<Role>,
        outcome: InvocationResult,
    ) -> Self {
        Self {
            round,
            model: model.into(),
            role,
            outcome,
        }
    }

    /// 1-based round number for display
    pub fn round_number(&self) -> usize {
        self.round + 1
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_response_is_empty_failure() {
        let result = InvocationResult::from_response("  \n\t");
        assert_eq!(result.failure_kind(), Some(FailureKind::EmptyResponse));
        assert!(result.text().is_none());
    }

    #[test]
    fn test_response_text_kept_as_is() {
        let result = InvocationResult::from_response(" idea ");
        assert_eq!(result.text(), Some(" idea "));
        assert!(result.is_success());
    }

    #[test]
    fn test_serialize_outcome_tagged() {
        let json = serde_json::to_value(InvocationResult::failure(
            FailureKind::Timeout,
            "timed out after 30s",
        ))
        .unwrap();
        assert_eq!(json["status"], "failure");
        assert_eq!(json["kind"], "timeout");
    }

    #[test]
    fn test_entry_without_role_omits_field() {
        let entry = TranscriptEntry::new(0, "a", None, InvocationResult::from_response("x"));
        let json = serde_json::to_value(&entry).unwrap();
        assert!(json.get("role").is_none());
        assert_eq!(entry.round_number(), 1);
    }
}
