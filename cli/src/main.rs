//! CLI entrypoint for ai-roundtable
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod config_command;

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use roundtable_application::{
    ConversationLogger, NoProgress, ProgressNotifier, RunDiscussionError, RunDiscussionInput,
    RunDiscussionUseCase, RunSingleInput, RunSingleUseCase,
};
use roundtable_domain::{DiscussionConfig, ModelId, OutputFormat, RoleTemplate, TemplateResolver};
use roundtable_infrastructure::{
    ConfigLoader, FileConfig, JsonlConversationLogger, RoutingInvoker, load_env_files,
};
use roundtable_presentation::{
    ChatRepl, Cli, ConsoleFormatter, ModelListing, OutputFormatter, ProgressReporter,
    SimpleProgress,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Held until exit so buffered log lines reach the file
    let _log_guard = init_logging(&cli)?;

    info!("Starting ai-roundtable");

    // API keys from .env files must be visible before adapters are built
    for path in load_env_files() {
        debug!("Environment loaded from {}", path.display());
    }

    if let Some(command) = &cli.command {
        return config_command::run_command(command, cli.config.as_ref());
    }

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };
    apply_overrides(&mut config, &cli);
    report_issues(&config)?;

    if !config.output.color {
        ConsoleFormatter::set_color(false);
    }

    // === Dependency Injection ===
    let invoker = Arc::new(RoutingInvoker::from_config(&config.models));
    let transcript_logger: Option<Arc<dyn ConversationLogger>> = cli
        .transcript_log
        .as_ref()
        .and_then(JsonlConversationLogger::new)
        .map(|logger| Arc::new(logger) as Arc<dyn ConversationLogger>);

    if cli.list_models {
        let listings = model_listings(&config, &invoker);
        println!(
            "{}",
            ConsoleFormatter::format_models(&listings, Some(config.default_model.as_str()))
        );
        return Ok(());
    }

    let discussion_config = config.roundtable.to_discussion_config();

    if cli.list_roles {
        println!(
            "{}",
            ConsoleFormatter::format_roles(
                &role_templates(&discussion_config),
                discussion_config.role_based
            )
        );
        return Ok(());
    }

    let output_format = cli
        .output
        .or(config.output.format)
        .unwrap_or_default();

    // Interactive mode
    if cli.interactive {
        let mut repl = ChatRepl::new(
            invoker.clone(),
            ModelId::new(config.default_model.trim()),
            config.roundtable.participants(),
            discussion_config,
        )
        .with_models(model_listings(&config, &invoker))
        .with_output_format(cli.output.or(config.output.format).unwrap_or(OutputFormat::Final))
        .with_progress(!cli.quiet && config.repl.show_progress)
        .with_history_file(config.repl.history_path());
        if let Some(logger) = transcript_logger {
            repl = repl.with_conversation_logger(logger);
        }

        repl.run().await?;
        return Ok(());
    }

    let prompt = match cli.prompt.as_deref() {
        Some(p) => p.to_string(),
        None => bail!("A prompt is required. Use --interactive for interactive mode."),
    };

    // Single-model mode
    if cli.single {
        let model = cli
            .model
            .first()
            .cloned()
            .unwrap_or_else(|| config.default_model.clone());
        let model = ModelId::new(model.trim());

        let mut use_case = RunSingleUseCase::new(invoker);
        if let Some(logger) = transcript_logger {
            use_case = use_case.with_conversation_logger(logger);
        }

        let input = RunSingleInput::new(model.clone(), prompt, discussion_config.timeout);
        let outcome = use_case.execute(input).await?;

        println!("{}", ConsoleFormatter::format_single(model.as_str(), &outcome));
        if !outcome.is_success() {
            bail!("{} did not answer", model);
        }
        return Ok(());
    }

    // Round-table mode
    let participants = config.roundtable.participants();
    if participants.is_empty() {
        bail!(
            "No round-table models configured. Pass -m <MODEL> or set roundtable.enabled_models."
        );
    }

    let cancellation = CancellationToken::new();
    spawn_ctrl_c_handler(cancellation.clone());

    let mut use_case = RunDiscussionUseCase::new(invoker).with_cancellation(cancellation);
    if let Some(logger) = transcript_logger {
        use_case = use_case.with_conversation_logger(logger);
    }

    if !cli.quiet && output_format != OutputFormat::Json {
        print_header(&prompt, &participants_label(&config), &discussion_config);
    }

    let input = RunDiscussionInput::new(prompt, participants, discussion_config);
    let progress = progress_for(&cli, output_format);
    let state = match use_case
        .execute_with_progress(input, progress.as_ref())
        .await
    {
        Ok(state) => state,
        Err(RunDiscussionError::Cancelled { completed_rounds }) => {
            bail!("Interrupted after {} completed round(s)", completed_rounds)
        }
        Err(e) => return Err(e.into()),
    };

    println!("{}", ConsoleFormatter.render(&state, output_format));

    Ok(())
}

/// Initialize tracing; `-v` raises the level and `RUST_LOG` wins when set.
fn init_logging(cli: &Cli) -> Result<Option<WorkerGuard>> {
    let level = match (cli.verbose, cli.quiet) {
        (0, true) => "error",
        (0, false) => "warn",
        (1, _) => "info",
        (2, _) => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let Some(path) = &cli.log_file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    };

    let directory = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| std::path::Path::new("."));
    let file_name = path
        .file_name()
        .with_context(|| format!("Invalid log file path: {}", path.display()))?;
    std::fs::create_dir_all(directory)
        .with_context(|| format!("Failed to create log directory {}", directory.display()))?;

    let appender = tracing_appender::rolling::never(directory, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer)
        .init();
    Ok(Some(guard))
}

/// Apply command-line flags on top of the loaded configuration
fn apply_overrides(config: &mut FileConfig, cli: &Cli) {
    let rt = &mut config.roundtable;

    if !cli.single && !cli.model.is_empty() {
        rt.enabled_models = cli.model.clone();
    }
    if let Some(rounds) = cli.rounds {
        rt.discussion_rounds = rounds;
    }
    if cli.parallel {
        rt.parallel_responses = true;
    }
    if cli.no_roles {
        rt.use_role_based_prompting = false;
    }
    if let Some(rotation) = cli.rotation() {
        rt.role_rotation = rotation;
    }
    if !cli.roles.is_empty() {
        rt.enabled_roles = cli.roles.clone();
    }
    if let Some(timeout) = cli.timeout {
        rt.timeout_seconds = timeout;
    }
}

/// Print warnings; fail on errors
fn report_issues(config: &FileConfig) -> Result<()> {
    let issues = config.validate();
    for issue in issues.iter().filter(|i| !i.is_error()) {
        warn!("{}", issue.message);
        eprintln!("{}", issue);
    }

    let errors: Vec<String> = issues
        .iter()
        .filter(|i| i.is_error())
        .map(|i| i.to_string())
        .collect();
    if !errors.is_empty() {
        bail!("Invalid configuration:\n  {}", errors.join("\n  "));
    }
    Ok(())
}

fn spawn_ctrl_c_handler(token: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\nInterrupted - stopping after the current round...");
            token.cancel();
        }
    });
}

fn progress_for(cli: &Cli, format: OutputFormat) -> Box<dyn ProgressNotifier> {
    if cli.quiet {
        Box::new(NoProgress)
    } else if cli.verbose > 0 && format != OutputFormat::Json {
        // Bars and log lines would interleave
        Box::new(SimpleProgress)
    } else {
        Box::new(ProgressReporter::new())
    }
}

fn model_listings(config: &FileConfig, invoker: &RoutingInvoker) -> Vec<ModelListing> {
    config
        .models
        .iter()
        .map(|(id, entry)| ModelListing {
            id: id.clone(),
            provider: entry.provider.clone(),
            model: entry.model.clone(),
            participant: config.roundtable.enabled_models.iter().any(|m| m.trim() == id),
            unavailable: invoker
                .unavailable_reason(&ModelId::new(id.as_str()))
                .map(str::to_string),
        })
        .collect()
}

fn role_templates(config: &DiscussionConfig) -> Vec<RoleTemplate> {
    config
        .enabled_roles
        .iter()
        .map(|role| TemplateResolver::resolve(role, &config.custom_templates))
        .collect()
}

fn participants_label(config: &FileConfig) -> String {
    config.roundtable.enabled_models.join(", ")
}

fn print_header(prompt: &str, participants: &str, config: &DiscussionConfig) {
    println!();
    println!("+============================================================+");
    println!("|              AI Round-Table Discussion                     |");
    println!("+============================================================+");
    println!();
    println!("Prompt: {}", prompt);
    println!("Models: {}", participants);
    println!(
        "Rounds: {} ({}, {}, timeout {}s)",
        config.rounds,
        if config.parallel { "parallel" } else { "sequential" },
        if config.role_based { "role-based" } else { "no roles" },
        config.timeout.as_secs()
    );
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["roundtable"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_overrides_replace_config_values() {
        let mut config = FileConfig::default();
        let cli = parse(&[
            "-m",
            "openai/gpt-4",
            "-r",
            "5",
            "--parallel",
            "--no-roles",
            "--rotate",
            "--timeout",
            "9",
            "prompt",
        ]);

        apply_overrides(&mut config, &cli);

        let rt = &config.roundtable;
        assert_eq!(rt.enabled_models, vec!["openai/gpt-4"]);
        assert_eq!(rt.discussion_rounds, 5);
        assert!(rt.parallel_responses);
        assert!(!rt.use_role_based_prompting);
        assert!(rt.role_rotation);
        assert_eq!(rt.to_discussion_config().timeout, Duration::from_secs(9));
    }

    #[test]
    fn test_single_mode_keeps_participants() {
        let mut config = FileConfig::default();
        config.roundtable.enabled_models = vec!["ollama/llama2".to_string()];
        let cli = parse(&["--single", "-m", "openai/gpt-4", "prompt"]);

        apply_overrides(&mut config, &cli);
        assert_eq!(config.roundtable.enabled_models, vec!["ollama/llama2"]);
    }

    #[test]
    fn test_report_issues_fails_on_errors_only() {
        let mut config = FileConfig::default();
        config.roundtable.enabled_models = vec!["openai/gpt-4".to_string()];
        config
            .roundtable
            .custom_role_templates
            .insert("jester".to_string(), "x".to_string());
        assert!(report_issues(&config).is_ok());

        config.roundtable.discussion_rounds = 0;
        let err = report_issues(&config).unwrap_err().to_string();
        assert!(err.contains("discussion_rounds"));
    }

    #[test]
    fn test_blank_role_flag_is_rejected() {
        let mut config = FileConfig::default();
        config.roundtable.enabled_models = vec!["openai/gpt-4".to_string()];
        let cli = parse(&["--role", "critic", "--role", "", "prompt"]);

        apply_overrides(&mut config, &cli);
        let err = report_issues(&config).unwrap_err().to_string();
        assert!(err.contains("roundtable.enabled_roles"));
    }
}
