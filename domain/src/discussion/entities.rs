//! Discussion state machine

use super::history::format_previous_responses;
use super::value_objects::TranscriptEntry;
use crate::core::topic::Topic;
use serde::{Deserialize, Serialize};

/// Lifecycle of a discussion: `Idle → Running(round) → Complete`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum DiscussionPhase {
    Idle,
    /// 0-based round currently executing
    Running { round: usize },
    Complete,
}

impl DiscussionPhase {
    pub fn as_str(&self) -> &str {
        match self {
            DiscussionPhase::Idle => "idle",
            DiscussionPhase::Running { .. } => "running",
            DiscussionPhase::Complete => "complete",
        }
    }
}

impl std::fmt::Display for DiscussionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiscussionPhase::Running { round } => write!(f, "running (round {})", round + 1),
            other => write!(f, "{}", other.as_str()),
        }
    }
}

/// A single round-table discussion (Entity)
///
/// The transcript is append-only and grows one whole round at a time; the
/// topic never changes after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscussionState {
    topic: Topic,
    total_rounds: usize,
    current_round: usize,
    phase: DiscussionPhase,
    transcript: Vec<TranscriptEntry>,
}

impl DiscussionState {
    pub fn new(topic: Topic, total_rounds: usize) -> Self {
        Self {
            topic,
            total_rounds,
            current_round: 0,
            phase: DiscussionPhase::Idle,
            transcript: Vec::new(),
        }
    }

    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    pub fn total_rounds(&self) -> usize {
        self.total_rounds
    }

    /// 0-based index of the round in progress (or next to run)
    pub fn current_round(&self) -> usize {
        self.current_round
    }

    pub fn phase(&self) -> DiscussionPhase {
        self.phase
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }

    pub fn is_complete(&self) -> bool {
        self.phase == DiscussionPhase::Complete
    }

    /// Number of rounds whose entries are in the transcript
    pub fn completed_rounds(&self) -> usize {
        match self.phase {
            DiscussionPhase::Complete => self.total_rounds,
            _ => self.current_round,
        }
    }

    /// Move from `Idle` to the first round. No effect in any other phase.
    pub fn start(&mut self) {
        if self.phase == DiscussionPhase::Idle {
            self.phase = if self.total_rounds == 0 {
                DiscussionPhase::Complete
            } else {
                DiscussionPhase::Running { round: 0 }
            };
        }
    }

    /// Append the entries of the current round and advance.
    ///
    /// After the last round the phase becomes `Complete`. Calls outside the
    /// `Running` phase are ignored.
    pub fn complete_round(&mut self, entries: Vec<TranscriptEntry>) {
        let DiscussionPhase::Running { round } = self.phase else {
            return;
        };
        self.transcript.extend(entries);
        let next = round + 1;
        if next >= self.total_rounds {
            self.current_round = self.total_rounds;
            self.phase = DiscussionPhase::Complete;
        } else {
            self.current_round = next;
            self.phase = DiscussionPhase::Running { round: next };
        }
    }

    /// Entries recorded for a 0-based round
    pub fn round_entries(&self, round: usize) -> impl Iterator<Item = &TranscriptEntry> {
        self.transcript.iter().filter(move |e| e.round == round)
    }

    /// Entries of the last round present in the transcript
    pub fn final_round_entries(&self) -> impl Iterator<Item = &TranscriptEntry> {
        let last = self.transcript.last().map(|e| e.round);
        self.transcript
            .iter()
            .filter(move |e| Some(e.round) == last)
    }

    /// `{previous_responses}` for a call: the transcript so far followed by
    /// `in_round` (entries already produced earlier in the same round).
    pub fn previous_responses(&self, in_round: &[TranscriptEntry]) -> String {
        format_previous_responses(self.transcript.iter().chain(in_round.iter()))
    }

    pub fn success_count(&self) -> usize {
        self.transcript.iter().filter(|e| e.is_success()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.transcript.len() - self.success_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discussion::history::NO_PREVIOUS_RESPONSES;
    use crate::discussion::value_objects::{FailureKind, InvocationResult};
    use crate::role::Role;

    fn state(rounds: usize) -> DiscussionState {
        DiscussionState::new(Topic::new("Is Rust fast?").unwrap(), rounds)
    }

    fn entry(round: usize, model: &str, text: &str) -> TranscriptEntry {
        TranscriptEntry::new(
            round,
            model,
            Some(Role::generator()),
            InvocationResult::from_response(text),
        )
    }

    #[test]
    fn test_lifecycle() {
        let mut state = state(2);
        assert_eq!(state.phase(), DiscussionPhase::Idle);

        state.start();
        assert_eq!(state.phase(), DiscussionPhase::Running { round: 0 });

        state.complete_round(vec![entry(0, "a", "one")]);
        assert_eq!(state.phase(), DiscussionPhase::Running { round: 1 });
        assert_eq!(state.current_round(), 1);
        assert_eq!(state.completed_rounds(), 1);

        state.complete_round(vec![entry(1, "a", "two")]);
        assert!(state.is_complete());
        assert_eq!(state.completed_rounds(), 2);
        assert_eq!(state.transcript().len(), 2);
    }

    #[test]
    fn test_complete_round_ignored_when_not_running() {
        let mut state = state(1);
        state.complete_round(vec![entry(0, "a", "early")]);
        assert!(state.transcript().is_empty());

        state.start();
        state.complete_round(vec![entry(0, "a", "ok")]);
        state.complete_round(vec![entry(1, "a", "late")]);
        assert_eq!(state.transcript().len(), 1);
    }

    #[test]
    fn test_previous_responses_includes_in_round_entries() {
        let mut state = state(2);
        state.start();
        assert_eq!(state.previous_responses(&[]), NO_PREVIOUS_RESPONSES);

        state.complete_round(vec![entry(0, "a", "first")]);
        let in_round = vec![entry(1, "b", "second")];
        assert_eq!(
            state.previous_responses(&in_round),
            "[Round 1] a (generator):\nfirst\n\n[Round 2] b (generator):\nsecond"
        );
    }

    #[test]
    fn test_final_round_entries_and_counts() {
        let mut state = state(2);
        state.start();
        state.complete_round(vec![entry(0, "a", "x"), entry(0, "b", "y")]);
        state.complete_round(vec![
            entry(1, "a", "z"),
            TranscriptEntry::new(
                1,
                "b",
                None,
                InvocationResult::failure(FailureKind::Timeout, "slow"),
            ),
        ]);
        assert_eq!(state.final_round_entries().count(), 2);
        assert_eq!(state.round_entries(0).count(), 2);
        assert_eq!(state.success_count(), 3);
        assert_eq!(state.failure_count(), 1);
    }

    #[test]
    fn test_phase_serializes_with_round() {
        let json = serde_json::to_value(DiscussionPhase::Running { round: 1 }).unwrap();
        assert_eq!(json["phase"], "running");
        assert_eq!(json["round"], 1);
    }
}
