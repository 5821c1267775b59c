//! `roundtable config ...` and `roundtable version`

use anyhow::{Context, Result};
use roundtable_domain::core::string::preview;
use roundtable_domain::{ConfigIssue, Role};
use roundtable_infrastructure::config::{
    API_KEY_VARS, ConfigStore, ModelUpdate, create_example_env_file, default_env_file_path,
    env_file_candidates, load_env_files, mask_secret,
};
use roundtable_infrastructure::{FileConfig, RoutingInvoker};
use roundtable_presentation::{
    AddModelArgs, Command, ConfigCommand, ConsoleFormatter, EnvArgs, RolesArgs, RoundtableArgs,
};
use std::path::PathBuf;
use tracing::info;

/// Characters of a custom template shown by `config roundtable --list`
const TEMPLATE_PREVIEW_LEN: usize = 50;

pub fn run_command(command: &Command, config_path: Option<&PathBuf>) -> Result<()> {
    match command {
        Command::Version => {
            println!("roundtable {}", env!("CARGO_PKG_VERSION"));
            println!("Round-table discussions between multiple AI models");
            Ok(())
        }
        Command::Config { action } => {
            let store = match config_path {
                Some(path) => ConfigStore::new(path),
                None => ConfigStore::global()?,
            };
            info!("Editing configuration at {}", store.path().display());
            run_config(action, &store)
        }
    }
}

fn run_config(action: &ConfigCommand, store: &ConfigStore) -> Result<()> {
    match action {
        ConfigCommand::List => {
            let config = store.load()?;
            let invoker = RoutingInvoker::from_config(&config.models);
            println!();
            println!(
                "{}",
                ConsoleFormatter::format_models(
                    &crate::model_listings(&config, &invoker),
                    Some(config.default_model.as_str())
                )
            );
            println!("Config file: {}", store.path().display());
        }
        ConfigCommand::Set { key, value } => {
            let issues = store.update(|config| {
                config.set_value(key, value)?;
                Ok(config.validate())
            })?;
            println!("Updated {} = {}", key, value);
            print_issues(&issues);
        }
        ConfigCommand::AddModel(args) => add_model(args, store)?,
        ConfigCommand::Roundtable(args) => roundtable(args, store)?,
        ConfigCommand::Roles(args) => roles(args, store)?,
        ConfigCommand::Env(args) => env(args)?,
    }
    Ok(())
}

fn add_model(args: &AddModelArgs, store: &ConfigStore) -> Result<()> {
    let update = ModelUpdate {
        provider: Some(args.provider.clone()),
        model: args.model.clone(),
        api_key: args.api_key.clone(),
        endpoint: args.endpoint.clone(),
        max_tokens: args.max_tokens,
        temperature: args.temperature,
    };
    let issues = store.update(|config| {
        config.upsert_model(&args.name, update);
        Ok(config.validate())
    })?;
    println!("Saved model configuration: {}", args.name);
    print_issues(&issues);
    Ok(())
}

fn roundtable(args: &RoundtableArgs, store: &ConfigStore) -> Result<()> {
    if let Some(model) = &args.add {
        if store.update(|config| config.add_roundtable_model(model))? {
            println!("Added {} to the round table", model);
        } else {
            println!("{} is already on the round table", model);
        }
    } else if let Some(model) = &args.remove {
        if store.update(|config| Ok(config.remove_roundtable_model(model)))? {
            println!("Removed {} from the round table", model);
        } else {
            println!("{} was not on the round table", model);
        }
    } else if args.enable_roles || args.disable_roles {
        let enabled = args.enable_roles;
        store.update(|config| {
            config.roundtable.use_role_based_prompting = enabled;
            Ok(())
        })?;
        println!(
            "Role-based prompting {}",
            if enabled { "enabled" } else { "disabled" }
        );
    } else if args.enable_rotation || args.disable_rotation {
        let enabled = args.enable_rotation;
        store.update(|config| {
            config.roundtable.role_rotation = enabled;
            Ok(())
        })?;
        println!("Role rotation {}", if enabled { "enabled" } else { "disabled" });
    } else {
        print!("{}", format_roundtable(&store.load()?));
    }
    Ok(())
}

fn format_roundtable(config: &FileConfig) -> String {
    let rt = &config.roundtable;
    let mut output = String::from("\nRound-table configuration\n\nModels:\n");
    if rt.enabled_models.is_empty() {
        output.push_str("  (none)\n");
    }
    for model in &rt.enabled_models {
        output.push_str(&format!("  - {}\n", model));
    }

    output.push_str("\nSettings:\n");
    output.push_str(&format!("  Discussion rounds:    {}\n", rt.discussion_rounds));
    output.push_str(&format!("  Parallel mode:        {}\n", rt.parallel_responses));
    output.push_str(&format!("  Timeout:              {}s\n", rt.timeout_seconds));
    output.push_str(&format!(
        "  Role-based prompting: {}\n",
        rt.use_role_based_prompting
    ));
    output.push_str(&format!("  Role rotation:        {}\n", rt.role_rotation));
    output.push_str(&format!("  Enabled roles:        {}\n", rt.enabled_roles.join(", ")));

    if !rt.role_assignments.is_empty() {
        output.push_str("\nRole assignments:\n");
        for (model, roles) in &rt.role_assignments {
            output.push_str(&format!("  {}: {}\n", model, roles.join(", ")));
        }
    }
    if !rt.custom_role_templates.is_empty() {
        output.push_str("\nCustom role templates:\n");
        for (role, template) in &rt.custom_role_templates {
            output.push_str(&format!(
                "  {}: {}\n",
                role,
                preview(template, TEMPLATE_PREVIEW_LEN)
            ));
        }
    }
    output.push('\n');
    output
}

fn roles(args: &RolesArgs, store: &ConfigStore) -> Result<()> {
    if args.list_roles {
        println!("\nBuilt-in roles:\n");
        for role in Role::builtins() {
            println!("  {:<10} {}", role.as_str(), role.description());
        }
        println!("\nAny other name is a custom role with a generic template.\n");
    } else if args.list {
        let config = store.load()?;
        let assignments = &config.roundtable.role_assignments;
        if assignments.is_empty() {
            println!("No role assignments configured; every model can play every role.");
        } else {
            println!("\nRole assignments:\n");
            for (model, roles) in assignments {
                println!("  {}: {}", model, roles.join(", "));
            }
            println!("\nModels without assignments can play every role.\n");
        }
    } else if let Some(model) = &args.model {
        let assigned = store.update(|config| config.assign_roles(model, &args.assign))?;
        let names: Vec<&str> = assigned.iter().map(Role::as_str).collect();
        println!("Assigned roles to {}: {}", model, names.join(", "));
        for role in assigned.iter().filter(|r| !r.is_builtin()) {
            println!(
                "  note: '{}' is a custom role; it uses the generic template unless \
                 roundtable.custom_role_templates defines one",
                role
            );
        }
    } else if let Some(model) = &args.clear {
        if store.update(|config| Ok(config.clear_roles(model)))? {
            println!("Cleared role assignments for {}", model);
        } else {
            println!("{} had no role assignments", model);
        }
    } else {
        println!("Specify --list, --list-roles, --model with --assign, or --clear");
        println!("Examples:");
        println!("  roundtable config roles --list-roles");
        println!("  roundtable config roles --model openai/gpt-4 --assign generator,critic");
        println!("  roundtable config roles --clear openai/gpt-4");
    }
    Ok(())
}

fn env(args: &EnvArgs) -> Result<()> {
    if args.init {
        let path = args
            .path
            .clone()
            .or_else(default_env_file_path)
            .context("No configuration directory available; pass --path")?;
        let created = create_example_env_file(&path)?;
        println!("Created example .env file: {}", created.display());
        println!("Edit the file and add your API keys.");
    } else if args.show {
        let loaded = load_env_files();
        if loaded.is_empty() {
            println!("No .env files found (use --init to create one)");
        } else {
            println!("Loaded .env files:");
            for path in &loaded {
                println!("  - {}", path.display());
            }
        }

        println!("\nAPI keys:");
        for name in API_KEY_VARS {
            match std::env::var(name) {
                Ok(value) if !value.trim().is_empty() => {
                    println!("  [set]     {}: {}", name, mask_secret(&value))
                }
                _ => println!("  [missing] {}", name),
            }
        }

        println!("\nChecked locations:");
        for path in env_file_candidates() {
            println!("  - {}", path.display());
        }
    } else {
        println!("Specify --init or --show (see roundtable config env --help)");
    }
    Ok(())
}

/// Edits are saved even when they leave the configuration invalid
fn print_issues(issues: &[ConfigIssue]) {
    for issue in issues {
        eprintln!("{}", issue);
    }
}
