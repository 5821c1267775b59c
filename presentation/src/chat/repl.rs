//! REPL (Read-Eval-Print Loop) for interactive chat

use crate::output::console::{ConsoleFormatter, ModelListing};
use crate::output::formatter::OutputFormatter;
use crate::progress::reporter::ProgressReporter;
use roundtable_application::{
    ChatTurn, ConversationLogger, ModelInvoker, NoProgress, RunDiscussionInput,
    RunDiscussionUseCase, RunSingleInput, RunSingleUseCase,
};
use roundtable_domain::{
    DiscussionConfig, InvocationResult, ModelDescriptor, ModelId, OutputFormat, RoleTemplate,
    TemplateResolver,
};
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;

/// Chat turns kept as context for the next message
pub const MAX_HISTORY_TURNS: usize = 10;

/// A parsed slash command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Help,
    Quit,
    Models,
    /// `/model` alone shows the current model
    Model(Option<String>),
    Roundtable(String),
    Roles,
    Clear,
    History,
    Config,
    Unknown(String),
}

impl ReplCommand {
    /// Parse a line starting with `/`
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let (name, arg) = match line.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (line, ""),
        };
        let arg = (!arg.is_empty()).then(|| arg.to_string());

        match name {
            "/help" | "/h" | "/?" => ReplCommand::Help,
            "/quit" | "/exit" | "/q" => ReplCommand::Quit,
            "/models" => ReplCommand::Models,
            "/model" => ReplCommand::Model(arg),
            "/roundtable" | "/rt" => ReplCommand::Roundtable(arg.unwrap_or_default()),
            "/roles" => ReplCommand::Roles,
            "/clear" => ReplCommand::Clear,
            "/history" => ReplCommand::History,
            "/config" => ReplCommand::Config,
            other => ReplCommand::Unknown(other.to_string()),
        }
    }
}

/// The most recent chat turns, oldest first
#[derive(Debug, Clone)]
pub struct ChatHistory {
    turns: VecDeque<ChatTurn>,
    capacity: usize,
}

impl ChatHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            turns: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a turn, dropping the oldest once over capacity
    pub fn push(&mut self, turn: ChatTurn) {
        self.turns.push_back(turn);
        while self.turns.len() > self.capacity {
            self.turns.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn to_vec(&self) -> Vec<ChatTurn> {
        self.turns.iter().cloned().collect()
    }
}

impl Default for ChatHistory {
    fn default() -> Self {
        Self::new(MAX_HISTORY_TURNS)
    }
}

/// Interactive chat REPL
pub struct ChatRepl {
    single: RunSingleUseCase,
    discussion: RunDiscussionUseCase,
    current_model: ModelId,
    participants: Vec<ModelDescriptor>,
    config: DiscussionConfig,
    models: Vec<ModelListing>,
    output_format: OutputFormat,
    show_progress: bool,
    history_file: Option<PathBuf>,
    history: ChatHistory,
}

impl ChatRepl {
    /// Create a new ChatRepl
    pub fn new(
        invoker: Arc<dyn ModelInvoker>,
        current_model: ModelId,
        participants: Vec<ModelDescriptor>,
        config: DiscussionConfig,
    ) -> Self {
        Self {
            single: RunSingleUseCase::new(Arc::clone(&invoker)),
            discussion: RunDiscussionUseCase::new(invoker),
            current_model,
            participants,
            config,
            models: Vec::new(),
            output_format: OutputFormat::Final,
            show_progress: true,
            history_file: None,
            history: ChatHistory::default(),
        }
    }

    /// Set whether to show progress
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Known models, for `/models` and `/model <id>`
    pub fn with_models(mut self, models: Vec<ModelListing>) -> Self {
        self.models = models;
        self
    }

    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Override the default readline history location
    pub fn with_history_file(mut self, path: Option<PathBuf>) -> Self {
        self.history_file = path;
        self
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.single = self.single.with_conversation_logger(Arc::clone(&logger));
        self.discussion = self.discussion.with_conversation_logger(logger);
        self
    }

    fn history_path(&self) -> Option<PathBuf> {
        self.history_file.clone().or_else(|| {
            dirs::data_dir().map(|p| p.join("ai-roundtable").join("history.txt"))
        })
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        // Try to load history
        let history_path = self.history_path();
        if let Some(ref path) = history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        self.print_welcome();

        loop {
            let prompt = format!("{}> ", self.current_model.short_name());
            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(line);

                    if line.starts_with('/') {
                        if self.handle_command(ReplCommand::parse(line)).await {
                            break;
                        }
                        continue;
                    }

                    self.process_chat(line).await;
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        // Save history
        if let Some(ref path) = history_path {
            let _ = rl.save_history(path);
        }

        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│        AI Round-Table - Interactive         │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!("Current model: {}", self.current_model);
        println!(
            "Round-table:   {}",
            self.participants
                .iter()
                .map(|m| m.id.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
        println!();
        Self::print_help();
    }

    fn print_help() {
        println!("Commands:");
        println!("  /help, /h, /?          - Show this help");
        println!("  /models                - List configured models");
        println!("  /model [id]            - Show or switch the current model");
        println!("  /roundtable <prompt>   - Run a round-table discussion");
        println!("  /roles                 - Show enabled roles");
        println!("  /history               - Show recent chat turns");
        println!("  /config                - Show session settings");
        println!("  /clear                 - Forget the chat history");
        println!("  /quit, /exit, /q       - Exit");
        println!();
    }

    /// Handle slash commands. Returns true if should exit.
    async fn handle_command(&mut self, command: ReplCommand) -> bool {
        match command {
            ReplCommand::Quit => {
                println!("Bye!");
                return true;
            }
            ReplCommand::Help => {
                println!();
                Self::print_help();
            }
            ReplCommand::Models => {
                println!();
                println!(
                    "{}",
                    ConsoleFormatter::format_models(&self.models, Some(self.current_model.as_str()))
                );
            }
            ReplCommand::Model(None) => {
                println!("Current model: {}", self.current_model);
            }
            ReplCommand::Model(Some(id)) => self.switch_model(&id),
            ReplCommand::Roundtable(prompt) if prompt.is_empty() => {
                println!("Usage: /roundtable <prompt>");
            }
            ReplCommand::Roundtable(prompt) => self.process_roundtable(&prompt).await,
            ReplCommand::Roles => {
                println!();
                println!(
                    "{}",
                    ConsoleFormatter::format_roles(&self.role_templates(), self.config.role_based)
                );
            }
            ReplCommand::Clear => {
                self.history.clear();
                println!("Chat history cleared.");
            }
            ReplCommand::History => {
                println!();
                println!("{}", ConsoleFormatter::format_history(&self.history.to_vec()));
            }
            ReplCommand::Config => {
                println!();
                println!(
                    "{}",
                    ConsoleFormatter::format_session(
                        self.current_model.as_str(),
                        self.participants.len(),
                        &self.config
                    )
                );
            }
            ReplCommand::Unknown(cmd) => {
                println!("Unknown command: {}", cmd);
                println!("Type /help for available commands");
            }
        }
        false
    }

    fn switch_model(&mut self, id: &str) {
        let known = self.models.is_empty() || self.models.iter().any(|m| m.id == id);
        if !known {
            println!("Unknown model: {} (see /models)", id);
            return;
        }
        self.current_model = ModelId::new(id);
        self.history.clear();
        println!("Switched to {} (chat history cleared)", self.current_model);
    }

    fn role_templates(&self) -> Vec<RoleTemplate> {
        self.config
            .enabled_roles
            .iter()
            .map(|role| TemplateResolver::resolve(role, &self.config.custom_templates))
            .collect()
    }

    async fn process_chat(&mut self, line: &str) {
        println!();
        let input = RunSingleInput::new(self.current_model.clone(), line, self.config.timeout)
            .with_history(self.history.to_vec());

        match self.single.execute(input).await {
            Ok(outcome) => {
                println!(
                    "{}",
                    ConsoleFormatter::format_single(self.current_model.as_str(), &outcome)
                );
                if let InvocationResult::Success { text } = outcome {
                    self.history.push(ChatTurn::new(line, text));
                }
            }
            Err(e) => eprintln!("Error: {}", e),
        }
    }

    async fn process_roundtable(&self, prompt: &str) {
        println!();
        let input =
            RunDiscussionInput::new(prompt, self.participants.clone(), self.config.clone());

        let result = if self.show_progress {
            let progress = ProgressReporter::new();
            self.discussion.execute_with_progress(input, &progress).await
        } else {
            self.discussion.execute_with_progress(input, &NoProgress).await
        };

        match result {
            Ok(state) => println!("{}", ConsoleFormatter.render(&state, self.output_format)),
            Err(e) => eprintln!("Error: {}", e),
        }
        println!();
    }
}
