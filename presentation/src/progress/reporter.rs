//! Progress reporting for round-table discussions

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use roundtable_application::ProgressNotifier;
use roundtable_domain::{DiscussionState, InvocationResult, ModelId, Topic, TranscriptEntry};
use std::sync::Mutex;

/// Reports progress with one indicatif bar per round
pub struct ProgressReporter {
    multi: MultiProgress,
    total_rounds: Mutex<usize>,
    round_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            total_rounds: Mutex::new(0),
            round_bar: Mutex::new(None),
        }
    }

    fn round_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn round_name(round: usize, total_rounds: usize) -> String {
        format!("Round {}/{}", round + 1, total_rounds)
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_discussion_start(&self, _topic: &Topic, total_rounds: usize, _participants: usize) {
        if let Ok(mut total) = self.total_rounds.lock() {
            *total = total_rounds;
        }
    }

    fn on_round_start(&self, round: usize, total_calls: usize) {
        let total_rounds = self.total_rounds.lock().map(|t| *t).unwrap_or(0);

        let pb = self.multi.add(ProgressBar::new(total_calls as u64));
        pb.set_style(Self::round_style());
        pb.set_prefix(Self::round_name(round, total_rounds));
        pb.set_message("Starting...");

        if let Ok(mut slot) = self.round_bar.lock() {
            *slot = Some(pb);
        }
    }

    fn on_model_complete(&self, _round: usize, model: &ModelId, success: bool) {
        if let Ok(slot) = self.round_bar.lock()
            && let Some(pb) = slot.as_ref()
        {
            let status = if success {
                format!("{} {}", "v".green(), model)
            } else {
                format!("{} {}", "x".red(), model)
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_round_complete(&self, round: usize, entries: &[TranscriptEntry]) {
        if let Ok(mut slot) = self.round_bar.lock()
            && let Some(pb) = slot.take()
        {
            let failed = entries.iter().filter(|e| !e.is_success()).count();
            let message = if failed == 0 {
                format!("Round {} complete!", round + 1).green().to_string()
            } else {
                format!("Round {} complete ({} failed)", round + 1, failed)
                    .yellow()
                    .to_string()
            };
            pb.finish_with_message(message);
        }
    }
}

/// Line-based progress that prints each answer as soon as it is recorded
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_discussion_start(&self, topic: &Topic, total_rounds: usize, participants: usize) {
        println!(
            "{} {} ({} rounds, {} participants)",
            "->".cyan(),
            topic.content().bold(),
            total_rounds,
            participants
        );
    }

    fn on_round_start(&self, round: usize, total_calls: usize) {
        println!(
            "\n{} {} ({} calls)",
            "->".cyan(),
            format!("Round {}", round + 1).bold(),
            total_calls
        );
    }

    fn on_model_complete(&self, _round: usize, _model: &ModelId, _success: bool) {}

    fn on_entry(&self, entry: &TranscriptEntry) {
        let label = match &entry.role {
            Some(role) => format!("{} ({})", entry.model, role),
            None => entry.model.to_string(),
        };
        match &entry.outcome {
            InvocationResult::Success { text } => {
                println!("  {} {}", "v".green(), label.bold());
                for line in text.trim().lines() {
                    println!("    {}", line);
                }
            }
            InvocationResult::Failure { kind, message } => {
                println!("  {} {} ({}: {})", "x".red(), label, kind, message);
            }
        }
    }

    fn on_round_complete(&self, _round: usize, _entries: &[TranscriptEntry]) {}

    fn on_discussion_complete(&self, state: &DiscussionState) {
        println!(
            "\n{} {} response(s), {} failure(s)",
            "Done:".cyan().bold(),
            state.success_count(),
            state.failure_count()
        );
    }
}
