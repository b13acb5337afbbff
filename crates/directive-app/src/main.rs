//! # directives - Rules, Skills and Workflows with versioned content
//!
//! This is the main entry point that wires everything together.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  main.rs (this file) - Dependency Injection & Wiring            │
//! │    │                                                            │
//! │    ├── Loads:   AppConfig (directives.yaml)                     │
//! │    ├── Creates: JsonFileDirectiveRepository (adapter)           │
//! │    ├── Creates: SystemClock, UuidGenerator, TracingEventSink    │
//! │    ├── Creates: DirectiveService (use case)                     │
//! │    └── Runs:    One CLI command, prints the result as JSON      │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Usage:
//!   directives draft my-rule --kind rule --name "Prefer ?"
//!   directives update my-rule --expected-version 1 --content "..."
//!   directives step create review "Read the diff" --after <step-id>
//!   directives list --kind skill --state published

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use directive_adapter::{
    InMemoryChangeLog, JsonFileDirectiveRepository, SystemClock, TracingEventSink, UuidGenerator,
};
use directive_app::{AppConfig, Command, DEFAULT_CONFIG_PATH};
use directive_usecase::DirectiveService;

#[derive(Parser)]
#[command(name = "directives")]
#[command(about = "Directives - Rules, Skills and Workflows with versioned content")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Configuration file (YAML)
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Store file, overrides `storePath` from the configuration
    #[arg(long, global = true)]
    store: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(&cli.config)?;
    if let Some(store) = cli.store {
        config = config.with_store_path(store);
    }

    // Initialize logging; RUST_LOG wins over the configured filter
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .context("Invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // ========================================
    // Dependency Injection - Wire up the system
    // ========================================

    let repository = JsonFileDirectiveRepository::open(&config.store_path)
        .with_context(|| format!("Failed to open store: {}", config.store_path.display()))?;
    let change_log = InMemoryChangeLog::new(config.change_log_capacity);

    let mut service = DirectiveService::new(
        repository,
        Box::new(SystemClock),
        Box::new(UuidGenerator),
        Box::new(TracingEventSink),
        Box::new(change_log.clone()),
    );

    let output = cli.command.run(&mut service)?;
    println!("{}", serde_json::to_string_pretty(&output)?);

    for change in change_log.get_recent(config.change_log_capacity) {
        info!(
            directive_id = %change.directive_id(),
            from = change.previous_version(),
            to = change.new_version,
            fields = ?change.changed_fields,
            "directive changed"
        );
    }
    Ok(())
}
