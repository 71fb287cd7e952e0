//! Rewind - file editing tools with per-file undo.
//!
//! This is the main entry point for the rewind CLI.

mod server;
mod settings;

use clap::{Parser, Subcommand};
use rewind_history::{AllowedRoots, LocalFileIo, Registry};
use rewind_tools::{ToolContext, ToolRegistry};
use rewind_util::LogLevel;
use settings::Settings;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "rewind")]
#[command(author, version, about = "File editing tools with per-file undo history", long_about = None)]
struct Cli {
    /// Path to a JSON/JSONC config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Disable undo history (edits are still applied)
    #[arg(long, global = true)]
    disable_undo: bool,

    /// Maximum operations kept per file
    #[arg(long, global = true)]
    max_undo_operations: Option<usize>,

    /// Directory tools may operate in (repeatable, default: current directory)
    #[arg(long = "allow", global = true)]
    allow: Vec<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Subcommand
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve tool calls as JSON lines on stdin/stdout (default)
    Serve,
    /// List available tools and their parameter schemas
    Tools,
    /// Show the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = LogLevel::from_options(cli.log_level.as_deref(), cli.verbose)
        .ok_or_else(|| anyhow::anyhow!("invalid log level: {:?}", cli.log_level))?;
    rewind_util::log::init(level);

    let cwd = std::env::current_dir()?;
    let settings = Settings::resolve(&cli, &cwd).await?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server(settings, cwd).await,
        Commands::Tools => {
            list_tools();
            Ok(())
        }
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&settings)?);
            Ok(())
        }
    }
}

async fn run_server(settings: Settings, cwd: PathBuf) -> anyhow::Result<()> {
    let history = Arc::new(Registry::new(settings.history.clone())?);
    let ctx = ToolContext::new(
        settings.root_dir(&cwd),
        history.clone(),
        Arc::new(AllowedRoots::new(&settings.allowed_roots)),
        Arc::new(LocalFileIo::new()),
    )
    .with_cwd(&cwd);
    let tools = ToolRegistry::with_builtins();

    info!(
        enabled = settings.history.enabled,
        max_operations = settings.history.max_operations_per_file,
        roots = ?settings.allowed_roots,
        "Starting rewind server"
    );

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();

    let result = tokio::select! {
        result = server::serve(&tools, &ctx, stdin, stdout) => result,
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted");
            Ok(())
        }
    };

    let stats = history.stats().await;
    info!(
        files = stats.files_with_history,
        operations = stats.total_operations,
        bytes = stats.estimated_bytes,
        "Discarding undo history"
    );
    history.clear_all().await;

    result
}

fn list_tools() {
    let tools = ToolRegistry::with_builtins();
    for id in tools.list() {
        if let Some(tool) = tools.get(id) {
            println!("{}", id);
            for line in tool.description().lines() {
                println!("    {}", line);
            }
            println!();
        }
    }
}
