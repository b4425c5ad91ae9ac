//! # Lifecycle Gate Configuration Validator
//!
//! Command-line tool for validating lifecycle gate configuration files across
//! environments. Catches undeclared states and broken transition tables before
//! a service loads them.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lifecycle_gate::config::ConfigManager;
use lifecycle_gate::logging::log_error;
use lifecycle_gate::state_machine::TransitionTable;
use std::path::PathBuf;
use std::process;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "gate-config-validator")]
#[command(about = "Validate lifecycle gate configuration files")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Environment to validate (development, test, production)
    #[arg(short, long, default_value = "development")]
    environment: String,

    /// Configuration directory path (default: config)
    #[arg(short, long)]
    config_dir: Option<PathBuf>,

    /// Verbose output level (use multiple times for more verbosity)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Subcommands
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate the whole configuration
    All,

    /// Show the transition table of one workflow
    Workflow {
        /// Workflow id (project_lifecycle, feedback_lifecycle, ...)
        id: String,
    },

    /// Show the dependent access policy
    Access,
}

fn main() {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let _subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .try_init();

    let result = match &cli.command {
        Some(Commands::All) | None => validate_all_config(&cli),
        Some(Commands::Workflow { id }) => show_workflow(&cli, id),
        Some(Commands::Access) => show_access(&cli),
    };

    match result {
        Ok(()) => {
            info!("Configuration validation completed successfully");
            process::exit(0);
        }
        Err(e) => {
            log_error(
                "gate-config-validator",
                "validate",
                &format!("{e:#}"),
                Some(&cli.environment),
            );
            eprintln!("❌ {e:#}");
            process::exit(1);
        }
    }
}

fn load(cli: &Cli) -> Result<std::sync::Arc<ConfigManager>> {
    ConfigManager::load_from_directory_with_env(cli.config_dir.clone(), &cli.environment)
        .with_context(|| format!("failed to load configuration for '{}'", cli.environment))
}

fn validate_all_config(cli: &Cli) -> Result<()> {
    println!("🔧 Validating Lifecycle Gate Configuration");
    println!("Environment: {}", cli.environment);

    if let Some(config_dir) = &cli.config_dir {
        println!("Config Directory: {}", config_dir.display());
    }

    println!();

    let manager = load(cli)?;
    println!("✅ Configuration loaded and validated");

    for workflow in manager.registry().workflow_ids() {
        let table = manager.registry().get(workflow.as_str())?;
        println!(
            "✅ Workflow '{}': {} states, {} transitions",
            workflow,
            table.states().count(),
            table.transitions().count()
        );
    }

    println!(
        "✅ Access policy: max chain depth {}, completed states {:?}",
        manager.max_chain_depth(),
        manager
            .config()
            .access
            .completed_states
            .iter()
            .map(|state| state.as_str())
            .collect::<Vec<_>>()
    );

    println!("\n🎉 All configuration validation checks passed!");
    Ok(())
}

fn show_workflow(cli: &Cli, id: &str) -> Result<()> {
    let manager = load(cli)?;
    let table = manager.registry().get(id)?;
    print_table(&table);
    Ok(())
}

fn print_table(table: &TransitionTable) {
    println!("📋 Workflow: {} ({})", table.workflow(), table.label());
    println!("\nStates:");
    for state in table.states() {
        let mut flags = Vec::new();
        if state.is_initial() {
            flags.push("initial");
        }
        if state.is_terminal() {
            flags.push("terminal");
        }
        if flags.is_empty() {
            println!("  • {}", state.name());
        } else {
            println!("  • {} [{}]", state.name(), flags.join(", "));
        }
    }

    println!("\nTransitions:");
    for transition in table.transitions() {
        let from: Vec<&str> = transition.from_states().iter().map(|s| s.as_str()).collect();
        println!(
            "  • {}: {{{}}} -> {}",
            transition.name(),
            from.join(", "),
            transition.to_state()
        );
    }
}

fn show_access(cli: &Cli) -> Result<()> {
    let manager = load(cli)?;
    let access = &manager.config().access;

    println!("🔐 Dependent Access Policy");
    println!("  manage permission: {}", access.manage_permission);
    println!("  max chain depth:   {}", access.max_chain_depth);
    for state in &access.completed_states {
        println!("  completed state:   {}", state);
    }
    Ok(())
}
