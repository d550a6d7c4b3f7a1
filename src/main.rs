use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod auth;
mod config;
mod models;
mod providers;
mod render;

use auth::Credentials;
use config::Config;
use providers::{codex::CodexProvider, copilot::CopilotProvider, ProviderFetcher};

#[derive(Parser)]
#[command(name = "limitline")]
#[command(about = "Show remaining usage for Codex and GitHub Copilot")]
struct Cli {
    /// Print a single-line status for embedding in tmux or a status bar
    #[arg(long)]
    compact: bool,

    /// Path to the opencode auth file
    /// (default: ~/.local/share/opencode/auth.json)
    #[arg(long)]
    auth_file: Option<PathBuf>,
}

fn setup_logging() {
    let filter = EnvFilter::try_from_env("LIMITLINE_LOG")
        .unwrap_or_else(|_| EnvFilter::new("limitline=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging();

    let config = Config::load()?;
    let auth_path = cli.auth_file.unwrap_or_else(Credentials::default_path);
    let credentials = Credentials::load(&auth_path)?;

    // Report order is fixed: Codex first, then Copilot.
    let adapters: Vec<Box<dyn ProviderFetcher>> = vec![
        Box::new(CodexProvider::new()),
        Box::new(CopilotProvider::new(config.copilot.monthly_limit)),
    ];

    let results = providers::collect(&adapters, &credentials).await;

    let output = if cli.compact {
        render::status_line(&results)
    } else {
        render::full_report(&results)
    };
    println!("{output}");

    // Per-provider failures are reported inline and do not fail the run.
    Ok(())
}
