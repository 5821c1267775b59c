//! CLI command definitions

use clap::{Args, Parser, Subcommand};
use roundtable_domain::OutputFormat;
use std::path::PathBuf;

/// CLI arguments for ai-roundtable
#[derive(Parser, Debug)]
#[command(name = "roundtable")]
#[command(author, version, about = "AI Round-Table - several models discuss a prompt over multiple rounds")]
#[command(long_about = r#"
AI Round-Table runs a multi-round discussion between several models.

Each round every participating model answers once. With role-based prompting
(the default) each model plays a role - generator, critic, refiner or
evaluator - and sees the answers of the earlier turns.

Configuration files are loaded from (in priority order):
1. ROUNDTABLE_* environment variables
2. --config <path>       Explicit config file
3. ./roundtable.toml     Project-level config
4. ~/.config/ai-roundtable/config.toml   Global config

API keys may also come from .env files in the working directory, the home
directory, or ~/.config/ai-roundtable/.

Example:
  roundtable "What's the best way to handle errors in Rust?"
  roundtable -m openai/gpt-4 -m ollama/llama2 -r 3 "Compare async runtimes"
  roundtable --single -m anthropic/claude-3-sonnet "Explain lifetimes"
  roundtable -i
  roundtable config roundtable --add ollama/llama2
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// The prompt to discuss (not required in interactive mode)
    pub prompt: Option<String>,

    /// Participating models (can be specified multiple times)
    #[arg(short, long, value_name = "MODEL")]
    pub model: Vec<String>,

    /// Ask a single model instead of running a discussion
    #[arg(long)]
    pub single: bool,

    /// Number of discussion rounds
    #[arg(short, long, value_name = "N")]
    pub rounds: Option<usize>,

    /// Run the calls of a round concurrently
    #[arg(short, long)]
    pub parallel: bool,

    /// Disable role-based prompting
    #[arg(long)]
    pub no_roles: bool,

    /// Rotate roles between rounds
    #[arg(long, conflicts_with = "no_rotate")]
    pub rotate: bool,

    /// Keep the same roles in every round
    #[arg(long)]
    pub no_rotate: bool,

    /// Enabled roles, in order (can be specified multiple times)
    #[arg(long = "role", value_name = "ROLE")]
    pub roles: Vec<String>,

    /// Per-call timeout in seconds
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Output format: full, final or json
    #[arg(short, long, value_name = "FORMAT")]
    pub output: Option<OutputFormat>,

    /// Start an interactive session
    #[arg(short, long)]
    pub interactive: bool,

    /// List the enabled roles and their templates, then exit
    #[arg(long)]
    pub list_roles: bool,

    /// List the configured models, then exit
    #[arg(long)]
    pub list_models: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Write operational logs to a file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Append discussion events to a JSONL transcript
    #[arg(long, value_name = "PATH")]
    pub transcript_log: Option<PathBuf>,
}

/// Subcommands besides the default discussion
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Inspect and edit the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
    /// Show version information
    Version,
}

/// `roundtable config ...`
///
/// Edits go to `--config <PATH>` when given, otherwise to the global file.
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum ConfigCommand {
    /// List the configured models
    List,
    /// Set a value: `default_model` or `model.<id>.<setting>`
    Set {
        /// e.g. default_model, model.openai/gpt-4.temperature
        key: String,
        value: String,
    },
    /// Add or update a model entry
    AddModel(AddModelArgs),
    /// Manage the round-table participants and settings
    Roundtable(RoundtableArgs),
    /// Manage per-model role assignments
    Roles(RolesArgs),
    /// Manage .env files with API keys
    Env(EnvArgs),
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct AddModelArgs {
    /// Model id, e.g. my-custom/gpt-4
    pub name: String,

    /// Provider: openai, anthropic, ollama or gemini
    #[arg(short, long)]
    pub provider: String,

    /// Provider-side model name (defaults to the part after '/')
    #[arg(short, long)]
    pub model: Option<String>,

    /// API key or env:VAR_NAME
    #[arg(short = 'k', long)]
    pub api_key: Option<String>,

    /// Custom endpoint URL
    #[arg(short, long)]
    pub endpoint: Option<String>,

    /// Sampling temperature (0.0-2.0)
    #[arg(short, long)]
    pub temperature: Option<f64>,

    /// Maximum tokens per response
    #[arg(long)]
    pub max_tokens: Option<u32>,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
#[group(required = true, multiple = false)]
pub struct RoundtableArgs {
    /// Add a model to the round table
    #[arg(short, long, value_name = "MODEL")]
    pub add: Option<String>,

    /// Remove a model from the round table
    #[arg(short, long, value_name = "MODEL")]
    pub remove: Option<String>,

    /// Show the round-table configuration
    #[arg(short, long)]
    pub list: bool,

    /// Enable role-based prompting
    #[arg(long)]
    pub enable_roles: bool,

    /// Disable role-based prompting
    #[arg(long)]
    pub disable_roles: bool,

    /// Rotate roles between rounds
    #[arg(long)]
    pub enable_rotation: bool,

    /// Keep roles fixed across rounds
    #[arg(long)]
    pub disable_rotation: bool,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct RolesArgs {
    /// Model to assign roles to (with --assign)
    #[arg(short, long, requires = "assign")]
    pub model: Option<String>,

    /// Comma-separated roles, e.g. generator,critic
    #[arg(short, long, requires = "model", value_delimiter = ',')]
    pub assign: Vec<String>,

    /// Clear the role assignments of a model
    #[arg(short, long, value_name = "MODEL", conflicts_with = "model")]
    pub clear: Option<String>,

    /// List the role assignments
    #[arg(short, long)]
    pub list: bool,

    /// List the built-in roles
    #[arg(long)]
    pub list_roles: bool,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct EnvArgs {
    /// Create an example .env file
    #[arg(long, conflicts_with = "show")]
    pub init: bool,

    /// Show loaded .env files and API key status
    #[arg(long)]
    pub show: bool,

    /// Target of --init (defaults to ~/.config/ai-roundtable/.env)
    #[arg(long, value_name = "PATH", requires = "init")]
    pub path: Option<PathBuf>,
}

impl Cli {
    /// `Some` when `--rotate` or `--no-rotate` was given
    pub fn rotation(&self) -> Option<bool> {
        match (self.rotate, self.no_rotate) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }

    /// Whether the invocation only prints information and exits
    pub fn is_listing(&self) -> bool {
        self.list_roles || self.list_models || self.show_config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_discussion_flags() {
        let cli = Cli::try_parse_from([
            "roundtable",
            "-m",
            "openai/gpt-4",
            "-m",
            "ollama/llama2",
            "-r",
            "3",
            "--parallel",
            "--role",
            "critic",
            "--timeout",
            "10",
            "-o",
            "final",
            "Is Rust fast?",
        ])
        .unwrap();

        assert_eq!(cli.prompt.as_deref(), Some("Is Rust fast?"));
        assert_eq!(cli.model, vec!["openai/gpt-4", "ollama/llama2"]);
        assert_eq!(cli.rounds, Some(3));
        assert!(cli.parallel);
        assert_eq!(cli.roles, vec!["critic"]);
        assert_eq!(cli.timeout, Some(10));
        assert_eq!(cli.output, Some(OutputFormat::Final));
        assert_eq!(cli.rotation(), None);
    }

    #[test]
    fn test_rotation_flags() {
        let cli = Cli::try_parse_from(["roundtable", "--rotate", "x"]).unwrap();
        assert_eq!(cli.rotation(), Some(true));

        let cli = Cli::try_parse_from(["roundtable", "--no-rotate", "x"]).unwrap();
        assert_eq!(cli.rotation(), Some(false));

        assert!(Cli::try_parse_from(["roundtable", "--rotate", "--no-rotate", "x"]).is_err());
    }

    #[test]
    fn test_invalid_output_format_rejected() {
        assert!(Cli::try_parse_from(["roundtable", "-o", "yaml", "x"]).is_err());
    }

    #[test]
    fn test_config_subcommands() {
        let cli = Cli::try_parse_from([
            "roundtable",
            "config",
            "set",
            "model.openai/gpt-4.temperature",
            "0.2",
        ])
        .unwrap();
        assert_eq!(
            cli.command,
            Some(Command::Config {
                action: ConfigCommand::Set {
                    key: "model.openai/gpt-4.temperature".to_string(),
                    value: "0.2".to_string(),
                }
            })
        );
        assert!(cli.prompt.is_none());

        let cli = Cli::try_parse_from(["roundtable", "version"]).unwrap();
        assert_eq!(cli.command, Some(Command::Version));

        // A plain prompt is not mistaken for a subcommand
        let cli = Cli::try_parse_from(["roundtable", "configure the cache"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.prompt.as_deref(), Some("configure the cache"));
    }

    #[test]
    fn test_add_model_args() {
        let cli = Cli::try_parse_from([
            "roundtable",
            "config",
            "add-model",
            "local/mistral",
            "-p",
            "ollama",
            "--endpoint",
            "http://gpu-box:11434",
            "--max-tokens",
            "2048",
        ])
        .unwrap();
        let Some(Command::Config {
            action: ConfigCommand::AddModel(args),
        }) = cli.command
        else {
            panic!("expected add-model");
        };
        assert_eq!(args.name, "local/mistral");
        assert_eq!(args.provider, "ollama");
        assert_eq!(args.model, None);
        assert_eq!(args.endpoint.as_deref(), Some("http://gpu-box:11434"));
        assert_eq!(args.max_tokens, Some(2048));

        assert!(Cli::try_parse_from(["roundtable", "config", "add-model", "x"]).is_err());
    }

    #[test]
    fn test_roundtable_and_roles_options() {
        let cli = Cli::try_parse_from([
            "roundtable",
            "config",
            "roundtable",
            "--disable-rotation",
        ])
        .unwrap();
        let Some(Command::Config {
            action: ConfigCommand::Roundtable(args),
        }) = cli.command
        else {
            panic!("expected roundtable");
        };
        assert!(args.disable_rotation);
        assert!(!args.list);

        // Exactly one action per invocation
        assert!(Cli::try_parse_from(["roundtable", "config", "roundtable"]).is_err());
        assert!(
            Cli::try_parse_from(["roundtable", "config", "roundtable", "-l", "--enable-roles"])
                .is_err()
        );

        let cli = Cli::try_parse_from([
            "roundtable",
            "config",
            "roles",
            "--model",
            "openai/gpt-4",
            "--assign",
            "generator,critic",
        ])
        .unwrap();
        let Some(Command::Config {
            action: ConfigCommand::Roles(args),
        }) = cli.command
        else {
            panic!("expected roles");
        };
        assert_eq!(args.model.as_deref(), Some("openai/gpt-4"));
        assert_eq!(args.assign, vec!["generator", "critic"]);

        assert!(
            Cli::try_parse_from(["roundtable", "config", "roles", "--assign", "critic"]).is_err()
        );
    }

    #[test]
    fn test_env_options() {
        let cli =
            Cli::try_parse_from(["roundtable", "config", "env", "--init", "--path", "./.env"])
                .unwrap();
        let Some(Command::Config {
            action: ConfigCommand::Env(args),
        }) = cli.command
        else {
            panic!("expected env");
        };
        assert!(args.init);
        assert_eq!(args.path, Some(PathBuf::from("./.env")));

        assert!(Cli::try_parse_from(["roundtable", "config", "env", "--path", "x"]).is_err());
        assert!(Cli::try_parse_from(["roundtable", "config", "env", "--init", "--show"]).is_err());
    }

    #[test]
    fn test_verbosity_count() {
        let cli = Cli::try_parse_from(["roundtable", "-vv", "--list-roles"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.is_listing());
        assert!(cli.prompt.is_none());
    }
}
