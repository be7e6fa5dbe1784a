//! Picto relay - CORS-repairing forwarder for the Freepik API.
//!
//! # Examples
//!
//! ```bash
//! # Listen on the default address
//! picto-relay
//!
//! # Expose on all interfaces
//! picto-relay --listen 0.0.0.0:8787
//!
//! # Point at a different upstream
//! PICTO_RELAY_UPSTREAM=http://localhost:9000 picto-relay
//! ```

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use picto_relay::{RelayConfig, RelayState, bind, serve};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// CORS-repairing relay for the Freepik API.
#[derive(Parser)]
#[command(name = "picto-relay")]
#[command(version)]
struct Args {
    /// Address to listen on.
    #[arg(long, env = "PICTO_RELAY_LISTEN", default_value = "127.0.0.1:8787")]
    listen: SocketAddr,

    /// Upstream origin requests are forwarded to.
    #[arg(long, env = "PICTO_RELAY_UPSTREAM", default_value = picto_relay::DEFAULT_UPSTREAM)]
    upstream: String,

    /// Upstream request timeout in seconds.
    #[arg(long, default_value_t = 60)]
    timeout_secs: u64,

    /// Verbose output (show debug info).
    #[arg(long, short)]
    verbose: bool,
}

fn setup_logging(verbose: bool) {
    let default = if verbose {
        "picto_relay=debug,tower_http=debug,info"
    } else {
        "picto_relay=info,warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown requested"),
        Err(e) => {
            warn!(error = %e, "Cannot listen for Ctrl-C; running until killed");
            std::future::pending::<()>().await;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.verbose);

    let config = RelayConfig::default()
        .with_listen(args.listen)
        .with_upstream(&args.upstream)?
        .with_timeout(Duration::from_secs(args.timeout_secs));

    let state = RelayState::new(&config)?;
    let listener = bind(&config).await?;
    serve(listener, state, shutdown_signal()).await?;

    Ok(())
}
