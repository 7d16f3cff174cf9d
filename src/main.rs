//! ORKL MCP - Tool server for the ORKL threat intelligence library

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use orkl_mcp::{create_router, spawn_cleanup_task, AppState, Config};

/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from the config file and environment
/// 3. Build the upstream client with its cache and rate limiter
/// 4. Check upstream connectivity (warns only)
/// 5. Start the background cache cleanup task
/// 6. Serve the HTTP API until SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "orkl_mcp=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ORKL MCP tool server");

    let config = Config::load().context("failed to load configuration")?;
    info!(
        "Configuration loaded: base_url={}, cache={} (ttl={}s, max_entries={}), rate_limit={}/{}s, port={}",
        config.base_url,
        config.use_cache,
        config.cache_ttl,
        config.cache_max_entries,
        config.rate_limit_requests,
        config.rate_limit_period,
        config.server_port
    );

    let state = AppState::from_config(&config).context("failed to build ORKL client")?;

    match state.client().check_connectivity().await {
        Ok(()) => info!("Connected to ORKL API at {}", config.base_url),
        Err(e) => warn!("ORKL API connectivity check failed: {}", e),
    }

    let cleanup_handle = if config.use_cache && config.cleanup_interval > 0 {
        Some(spawn_cleanup_task(
            state.client().cache().clone(),
            config.cleanup_interval,
        ))
    } else {
        info!("Cache cleanup task disabled");
        None
    };

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup_handle))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for Ctrl+C or SIGTERM, then stops the cleanup task.
async fn shutdown_signal(cleanup_handle: Option<JoinHandle<()>>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    if let Some(handle) = cleanup_handle {
        handle.abort();
        info!("Cleanup task stopped");
    }
}
