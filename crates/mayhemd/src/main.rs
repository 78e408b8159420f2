//! mayhem — the chaos agent.
//!
//! Each invocation is a single pass: discover the fleet, then either
//! restart whatever is unhealthy or kill one healthy service at random.
//! Run it from a scheduler to get the chaos/heal cycle over time.
//!
//! # Usage
//!
//! ```text
//! TOKEN_OF_CHAOS=... RAILWAY_PROJECT_ID=... mayhem run --config mayhem.toml
//! mayhem status
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use mayhem_chaos::{ChaosMonkey, RunOutcome};
use mayhem_core::MayhemConfig;
use mayhem_platform::{Credentials, PlatformClient};
use mayhem_probe::HttpProber;

#[derive(Parser)]
#[command(
    name = "mayhem",
    about = "Chaos agent — kills a healthy service or heals a broken fleet",
    version
)]
struct Cli {
    /// Control-plane bearer token.
    #[arg(long, env = "TOKEN_OF_CHAOS", hide_env_values = true, global = true)]
    token: Option<String>,

    /// Project the environment and services belong to.
    #[arg(long, env = "RAILWAY_PROJECT_ID", global = true)]
    project_id: Option<String>,

    /// Path to mayhem.toml.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log output format.
    #[arg(long, value_enum, default_value = "text", global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run one chaos pass (default).
    Run,
    /// Report fleet health as JSON without acting on it.
    Status,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    let result = run(cli).await;
    if let Err(e) = &result {
        error!(error = %e, "chaos pass aborted");
    }
    result
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,mayhem_chaos=debug,mayhem_platform=debug"));
    match format {
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = MayhemConfig::load(cli.config.as_deref())?;
    let credentials = Credentials::new(
        cli.token.unwrap_or_default(),
        cli.project_id.unwrap_or_default(),
    )?;

    let platform = PlatformClient::new(credentials, config.platform)?;
    let prober = HttpProber::new()?;
    let monkey = ChaosMonkey::new(platform, prober, config.probe);

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => {
            info!("I am an agent of chaos");
            match monkey.run_once().await? {
                RunOutcome::Healed(report) => info!(
                    checked = report.checked,
                    restarted = report.restarted.len(),
                    skipped = report.skipped.len(),
                    "heal pass finished"
                ),
                RunOutcome::Attacked(report) => info!(
                    service_id = %report.service_id,
                    attempts = report.attempts,
                    confirmed_kills = report.confirmed_kills,
                    "attack finished"
                ),
                RunOutcome::Idle => info!("nothing to do"),
            }
        }
        Command::Status => {
            let survey = monkey.survey().await?;
            println!("{}", serde_json::to_string_pretty(&survey)?);
        }
    }

    Ok(())
}
