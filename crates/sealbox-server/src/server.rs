//! Server configuration, router construction and the serve loop.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use sealbox_core::SecretStore;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::routes;
use crate::Result;

/// Default listen port.
pub const DEFAULT_PORT: u16 = 8080;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind.
    pub bind: IpAddr,

    /// Port number.
    pub port: u16,

    /// Interval between expiry sweeps.
    pub sweep_interval: Duration,

    /// TTL applied when a create request omits `duration`.
    pub default_ttl_secs: i64,

    /// Largest TTL a create request may ask for.
    pub max_ttl_secs: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            sweep_interval: Duration::from_secs(60),
            default_ttl_secs: 300,
            // One week.
            max_ttl_secs: 604_800,
        }
    }
}

/// Shared state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    /// The secret store, shared with the sweep task.
    pub store: Arc<SecretStore>,

    /// Configuration (TTL limits).
    pub config: Arc<ServerConfig>,
}

/// The Sealbox HTTP server.
pub struct Server {
    state: AppState,
}

impl Server {
    /// Create a server with a freshly keyed, empty store.
    pub fn new(config: ServerConfig) -> sealbox_core::Result<Self> {
        let store = Arc::new(SecretStore::new()?);
        Ok(Self {
            state: AppState {
                store,
                config: Arc::new(config),
            },
        })
    }

    /// The underlying store (shared handle).
    pub fn store(&self) -> Arc<SecretStore> {
        Arc::clone(&self.state.store)
    }

    /// Build the router. Exposed separately so tests can drive it without
    /// binding a port.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/api/v1/secret", post(routes::create_secret))
            .route("/api/v1/secret/:id", get(routes::redeem_secret))
            .route("/health", get(routes::health))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Serve until ctrl-c, running the expiry sweep alongside.
    ///
    /// The sweep is stopped after the listener shuts down, so no task
    /// outlives the server.
    pub async fn run(&self) -> Result<()> {
        let sweep = self.state.store.start_sweep(self.state.config.sweep_interval);

        let addr = SocketAddr::new(self.state.config.bind, self.state.config.port);
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("listening on {}", addr);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        sweep.stop().await;
        info!("server stopped");
        Ok(())
    }
}

/// Resolves when the process receives ctrl-c.
async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}
