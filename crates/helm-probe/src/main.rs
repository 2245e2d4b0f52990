//! helm-probe entry point.
//!
//! Connects to the game's network service, then logs every decoded packet
//! until the service closes the connection. Useful for checking what the
//! game emits on its protocol port without touching the game itself.

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use helm_core::protocol::DEFAULT_GAME_PORT;
use helm_probe::{GameConnection, LoggingHandler};

#[derive(Parser)]
#[command(name = "helm-probe", version)]
#[command(about = "Connect to the game's network service and log decoded packets")]
struct Cli {
    /// Host name or IP address of the game server.
    server: String,

    /// TCP port of the game's network service.
    #[arg(long, default_value_t = DEFAULT_GAME_PORT)]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging. Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let target = format!("{}:{}", cli.server, cli.port);
    let addr = tokio::net::lookup_host(&target)
        .await
        .with_context(|| format!("could not resolve {target}"))?
        .next()
        .with_context(|| format!("{target} resolved to no addresses"))?;

    let mut connection = GameConnection::connect(addr).await?;
    let mut handler = LoggingHandler;
    connection.run_until_closed(&mut handler).await?;

    info!("session ended");
    Ok(())
}
