//! Progress notification port
//!
//! Defines the interface for reporting progress during a discussion.

use roundtable_domain::{DiscussionState, ModelId, Topic, TranscriptEntry};

/// Callback for progress updates during a round-table discussion
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (progress bars, live transcript, etc.).
/// Rounds are reported 0-based.
pub trait ProgressNotifier: Send + Sync {
    /// Called once before the first round
    fn on_discussion_start(&self, topic: &Topic, total_rounds: usize, participants: usize);

    /// Called when a round starts with the number of planned calls
    fn on_round_start(&self, round: usize, total_calls: usize);

    /// Called as soon as a model call finishes
    fn on_model_complete(&self, round: usize, model: &ModelId, success: bool);

    /// Called for each transcript entry, in transcript order
    fn on_entry(&self, _entry: &TranscriptEntry) {}

    /// Called when all calls of a round have finished
    fn on_round_complete(&self, round: usize, entries: &[TranscriptEntry]);

    /// Called once after the last round
    fn on_discussion_complete(&self, _state: &DiscussionState) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_discussion_start(&self, _topic: &Topic, _total_rounds: usize, _participants: usize) {}
    fn on_round_start(&self, _round: usize, _total_calls: usize) {}
    fn on_model_complete(&self, _round: usize, _model: &ModelId, _success: bool) {}
    fn on_round_complete(&self, _round: usize, _entries: &[TranscriptEntry]) {}
}
