//! site-gate server.
//!
//! ```text
//!   Client ──▶ request id ─▶ trace ─▶ body limit ─▶ timeout ─▶ metrics
//!                                                              │
//!            ┌─────────────────────────────────────────────────┤
//!            ▼                                                 ▼
//!     pages (session guard)                          /api (rate gate on public writes)
//!       /  /login /register                            auth · profile · contact · admin
//!       /profile /dashboard                                     │
//!            │                                                 ▼
//!            └──────────── credential codec ◀──── cookie "token" / Bearer
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use site_gate::clock::SystemClock;
use site_gate::config::load_config;
use site_gate::lifecycle::{build_state, signals, Shutdown};
use site_gate::observability::{logging, metrics};
use site_gate::HttpServer;

#[derive(Parser)]
#[command(name = "site-gate", version, about = "Session and rate gating for the community site")]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    logging::init_logging(&config.observability);
    tracing::info!("site-gate v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.server.bind_address,
        production = config.server.production,
        rate_limit_enabled = config.rate_limit.enabled,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let bind_address = config.server.bind_address.clone();
    let state = build_state(config, Arc::new(SystemClock))?;

    let listener = TcpListener::bind(&bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(&shutdown);

    HttpServer::new(state).run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
