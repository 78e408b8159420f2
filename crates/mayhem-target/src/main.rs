//! mayhem-target — sample service for the chaos agent to attack.
//!
//! # Usage
//!
//! ```text
//! PORT=3000 mayhem-target
//! ```

use std::net::SocketAddr;

use clap::Parser;
use tracing::info;

use mayhem_target::TargetServer;

#[derive(Parser)]
#[command(name = "mayhem-target", about = "Sample API with /health and /boom")]
struct Cli {
    /// Port to listen on.
    #[arg(long, env = "PORT", default_value = "3000")]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,mayhem_target=debug")),
        )
        .init();

    let cli = Cli::parse();
    let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));

    TargetServer::bind(addr).await?.serve().await?;

    info!("exiting");
    Ok(())
}
