//! Sealbox server entry point.

use std::net::IpAddr;
use std::time::Duration;

use clap::Parser;
use sealbox_server::{Server, ServerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// One-time, self-destructing secret exchange server.
#[derive(Debug, Parser)]
#[command(name = "sealbox", version, about)]
struct Args {
    /// Address to bind.
    #[arg(long, env = "SEALBOX_BIND", default_value = "127.0.0.1")]
    bind: IpAddr,

    /// Port to listen on.
    #[arg(long, env = "SEALBOX_PORT", default_value_t = 8080)]
    port: u16,

    /// Seconds between expiry sweeps.
    #[arg(long, env = "SEALBOX_SWEEP_INTERVAL", default_value_t = 60)]
    sweep_interval: u64,

    /// TTL in seconds applied when a request omits `duration`.
    #[arg(long, env = "SEALBOX_DEFAULT_TTL", default_value_t = 300)]
    default_ttl: i64,

    /// Largest TTL in seconds a request may ask for.
    #[arg(long, env = "SEALBOX_MAX_TTL", default_value_t = 604_800)]
    max_ttl: i64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sealbox=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let config = ServerConfig {
        bind: args.bind,
        port: args.port,
        sweep_interval: Duration::from_secs(args.sweep_interval),
        default_ttl_secs: args.default_ttl,
        max_ttl_secs: args.max_ttl,
    };

    let server = Server::new(config)?;
    server.run().await?;
    Ok(())
}
