mod admin;
mod config;
mod terminal;
mod train;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use services::{AdminService, Clock, ReportService, TrainingLoopService};
use tokio::io::BufReader;

use admin::{AdminCommand, run_admin};
use config::{AppConfig, GlobalArgs};
use terminal::Terminal;

/// Phishing-awareness training.
#[derive(Parser)]
#[command(name = "phishing-training", version, about = "Phishing-awareness training")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the learner flow in the terminal (default)
    Train,
    /// Inspect, export or clear stored results
    #[command(subcommand)]
    Admin(AdminCommand),
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing();

    let config = AppConfig::from_args(cli.global)?;
    tracing::debug!(?config, "configuration resolved");
    let clock = Clock::system();
    let storage = config.open_storage(clock).await?;

    match cli.command.unwrap_or(Command::Train) {
        Command::Train => {
            let svc = TrainingLoopService::new(clock, Arc::clone(&storage.results))
                .with_persist_timeout(config.persist_timeout);
            let mut reports = ReportService::new(clock);
            if let Some(dir) = &config.assets_dir {
                reports = reports.with_assets_dir(dir);
            }
            let mut term = Terminal::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout());
            train::run_training(&mut term, &svc, &reports, &config.report_dir).await?;
            Ok(())
        }
        Command::Admin(command) => {
            let admin = AdminService::new(clock, Arc::clone(&storage.results));
            run_admin(&admin, command, config.report_dir).await
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
