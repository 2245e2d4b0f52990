//! helm-agent entry point.
//!
//! Wires together configuration, the platform input synthesizer, the pause
//! use case, and one of the two command transports:
//!
//! ```text
//! main()
//!  └─ load_config()            -- TOML file, CLI overrides on top
//!  └─ native_synthesizer()     -- SendInput on Windows, recording mock elsewhere
//!  └─ GameControl              -- the pause/screenshot action interface
//!  └─ --tcp   -> CommandServer -- readiness loop over all controller sockets
//!     --stdio -> command loop  -- stdin/stdout single-stream variant
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgGroup, Parser};
use tracing::info;
use tracing_subscriber::EnvFilter;

use helm_agent::application::control::GameControl;
use helm_agent::infrastructure::capture::CountingCapturer;
use helm_agent::infrastructure::command::{run_command_loop, CommandServer};
use helm_agent::infrastructure::input::native_synthesizer;
use helm_agent::infrastructure::storage::{load_config, load_config_from};

#[derive(Parser)]
#[command(name = "helm-agent", version)]
#[command(about = "Game pause automation: command listener driving synthesized input")]
#[command(group(ArgGroup::new("transport").required(true).args(["tcp", "stdio"])))]
struct Cli {
    /// Serve the text command protocol to TCP controllers.
    #[arg(long)]
    tcp: bool,

    /// Read commands from stdin and write replies to stdout.
    #[arg(long)]
    stdio: bool,

    /// TCP port for control messages (overrides the config file).
    #[arg(long)]
    port: Option<u16>,

    /// Bind address for the TCP listener (overrides the config file).
    #[arg(long)]
    bind: Option<String>,

    /// Path to the TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config_from(path)
            .with_context(|| format!("could not load config from {}", path.display()))?,
        None => load_config().context("could not load config")?,
    };

    // Initialise structured logging. `RUST_LOG` wins over the config file.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    info!("helm-agent starting");

    let mut control = GameControl::new(native_synthesizer(), config.control.to_settings());
    if config.control.screenshot_before_click {
        control = control.with_capturer(Box::new(CountingCapturer::new()));
    }

    if cli.tcp {
        let port = cli.port.unwrap_or(config.network.port);
        let bind = cli.bind.clone().unwrap_or(config.network.bind);
        let addr: SocketAddr = format!("{bind}:{port}")
            .parse()
            .with_context(|| format!("invalid listen address {bind}:{port}"))?;

        let server = CommandServer::bind(addr, control)
            .await
            .with_context(|| format!("could not bind command server on {addr}"))?;
        info!("waiting for TCP controllers on {}", server.local_addr()?);

        tokio::select! {
            result = server.run() => {
                result.context("command server failed")?;
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown signal received");
            }
        }
    } else {
        info!("reading commands from stdin");
        run_command_loop(tokio::io::stdin(), tokio::io::stdout(), &mut control)
            .await
            .context("stdio command loop failed")?;
    }

    info!("helm-agent stopped");
    Ok(())
}
