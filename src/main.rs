use anyhow::Context;
use clap::{Parser, Subcommand};
use configuration::{Config, LogFormat, load_config};
use database::{DbRepository, connect, run_migrations};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// The main entry point for the to-do web application.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; it only supplies optional overrides.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let mut config = load_config(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(format) = cli.log_format {
        config.log.format = format;
    }

    // The guard flushes buffered log lines on drop, so it lives until main returns.
    let _guard = init_tracing(&config);
    tracing::debug!(path = %cli.config.display(), "Configuration loaded");

    // Execute the appropriate command
    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => handle_serve(config).await,
        Commands::Migrate => handle_migrate(config).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// A server-rendered to-do list for htmx front ends.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file. A missing file falls back to defaults.
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Overrides `server.port`.
    #[arg(long)]
    port: Option<u16>,

    /// Overrides `log.format`.
    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the web server (the default).
    Serve,
    /// Apply database migrations and exit.
    Migrate,
}

fn init_tracing(config: &Config) -> WorkerGuard {
    let (writer, guard) = tracing_appender::non_blocking(std::io::stdout());
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer);
    match config.log.format {
        LogFormat::Full => builder.init(),
        LogFormat::Compact => builder.compact().init(),
    }
    guard
}

// ==============================================================================
// Command Logic
// ==============================================================================

/// Opens the store, serves until a shutdown signal, then closes the store.
async fn handle_serve(config: Config) -> anyhow::Result<()> {
    let db_pool = connect(&config.database)
        .await
        .context("Failed to connect to the database")?;
    run_migrations(&db_pool)
        .await
        .context("Failed to run database migrations")?;

    let db_repo = DbRepository::new(db_pool);
    let existing = db_repo.count_todos().await?;
    tracing::info!(todos = existing, database = %config.database.url, "Store ready");

    let result = web_server::run_server(
        &config.server,
        db_repo.clone(),
        web_server::shutdown_signal(),
    )
    .await;

    db_repo.close().await;
    result
}

async fn handle_migrate(config: Config) -> anyhow::Result<()> {
    let db_pool = connect(&config.database)
        .await
        .context("Failed to connect to the database")?;
    run_migrations(&db_pool)
        .await
        .context("Failed to run database migrations")?;
    db_pool.close().await;
    Ok(())
}
