use clap::Parser;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;

mod cli;
mod commands;
mod config;
mod geometry;
mod migrate;
mod store;
mod tracker;
mod trail;

use cli::{Cli, Commands};
use config::{Config, LogLevel};
use store::TrailStore;

fn setup_logging(log_level: &LogLevel) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pathtrail")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("pathtrail.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    // RUST_LOG env var takes precedence, otherwise use config log_level
    let mut builder = env_logger::Builder::new();

    if std::env::var("RUST_LOG").is_ok() {
        builder.parse_default_env();
    } else {
        builder.filter_level(log_level.as_filter());
    }

    builder.target(env_logger::Target::Pipe(target)).init();

    info!("Logging initialized, writing to: {}", log_file.display());
    info!(
        "Log level: {} (from {})",
        log_level.as_filter(),
        if std::env::var("RUST_LOG").is_ok() { "RUST_LOG env" } else { "config" }
    );
    Ok(())
}

fn storage_root(root: Option<PathBuf>, config: &Config) -> PathBuf {
    root.map(|r| Config::expand_path(&r)).unwrap_or_else(|| config.storage_root())
}

fn open_store(root: Option<PathBuf>, config: &Config) -> TrailStore {
    TrailStore::open(storage_root(root, config))
}

fn run(cli: Cli, config: Config) -> Result<()> {
    let root = cli.root;
    match cli.command {
        Commands::Session { action } => commands::session::run(action, &mut open_store(root, &config)),
        Commands::Settings { action } => commands::settings::run(action, &mut open_store(root, &config)),
        Commands::Record { map, domain, input } => {
            commands::record::run(&map, domain, input.as_deref(), open_store(root, &config))
        }
        Commands::Show {
            map,
            domain,
            session,
            format,
        } => commands::show::run(
            &map,
            domain,
            session.as_deref(),
            cli::OutputFormat::resolve(format),
            &open_store(root, &config),
        ),
        Commands::Render {
            map,
            domain,
            camera,
            look,
            depth_override,
            format,
        } => commands::render::run(
            &map,
            domain,
            &camera,
            &look,
            depth_override,
            cli::OutputFormat::resolve(format),
            open_store(root, &config),
        ),
        Commands::Migrate { dry_run } => commands::migrate::run(dry_run, &storage_root(root, &config)),
        Commands::Status { format } => {
            commands::status::run(cli::OutputFormat::resolve(format), &open_store(root, &config))
        }
        Commands::Completions { shell } => commands::completions::run(shell),
    }
}

fn main() -> Result<()> {
    // Parse CLI arguments first
    let cli = Cli::parse();

    // Load configuration (before logging, so log messages in Config::load are silent)
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    // A missing log file should not stop trail commands from working
    if let Err(e) = setup_logging(&config.log_level) {
        eprintln!("warning: logging disabled: {:#}", e);
    }

    info!("Starting pathtrail with config from: {:?}", cli.config);

    // Run the command
    run(cli, config).context("Command failed")?;

    Ok(())
}
