// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Vault Server
//!
//! Entry point for the `vault-server` binary. Parses CLI arguments,
//! initializes logging and metrics, opens the store, and serves the HTTP API.
//!
//! The binary supports two subcommands:
//!
//! - `run`: start the HTTP API
//! - `version`: print build version information

mod api;
mod cli;
mod logging;
mod metrics;

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use clap::Parser;
use std::sync::Arc;
use tokio::signal;

use vault_store::VaultStore;

use cli::{Commands, VaultServerCli};
use metrics::VaultMetrics;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = VaultServerCli::parse();

    match cli.command {
        Commands::Run(args) => run_server(args).await,
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

/// Opens the store and serves the API (and metrics, when enabled) until a
/// shutdown signal arrives.
async fn run_server(args: cli::RunArgs) -> Result<()> {
    logging::init_logging(logging::DEFAULT_FILTER, args.log_format);

    let store_config = args.store_config();
    tracing::info!(
        port = args.port,
        mode = %store_config.mode,
        data_file = ?store_config.persistence,
        allowed_origin = %args.allowed_origin,
        "starting vault-server"
    );

    let allowed_origin = HeaderValue::from_str(&args.allowed_origin)
        .with_context(|| format!("invalid allowed origin: {}", args.allowed_origin))?;

    // --- Store ---
    // Loaded before the listener is bound, so no request sees a partial load.
    let store = VaultStore::open(&store_config);

    // --- Metrics ---
    let vault_metrics = Arc::new(
        VaultMetrics::new()
            .map_err(|e| anyhow::anyhow!("failed to register prometheus metrics: {}", e))?,
    );
    vault_metrics.items_stored.set(store.len() as i64);

    // --- API server ---
    let app_state = api::AppState {
        store: store.into_shared(),
        metrics: Arc::clone(&vault_metrics),
    };
    let api_router = api::create_router(app_state, allowed_origin);
    let api_addr = format!("0.0.0.0:{}", args.port);
    let api_listener = tokio::net::TcpListener::bind(&api_addr)
        .await
        .with_context(|| format!("failed to bind API listener on {}", api_addr))?;
    tracing::info!("API server listening on {}", api_addr);

    // --- Metrics server ---
    let metrics_server = match args.metrics_port {
        Some(port) => {
            let metrics_router = axum::Router::new()
                .route("/metrics", axum::routing::get(metrics::metrics_handler))
                .with_state(Arc::clone(&vault_metrics));
            let metrics_addr = format!("0.0.0.0:{}", port);
            let metrics_listener = tokio::net::TcpListener::bind(&metrics_addr)
                .await
                .with_context(|| format!("failed to bind metrics listener on {}", metrics_addr))?;
            tracing::info!("Metrics server listening on {}", metrics_addr);
            Some(tokio::spawn(async move {
                if let Err(e) = axum::serve(metrics_listener, metrics_router).await {
                    tracing::error!("Metrics server error: {}", e);
                }
            }))
        }
        None => None,
    };

    // --- Serve ---
    axum::serve(api_listener, api_router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("API server error")?;

    if let Some(handle) = metrics_server {
        handle.abort();
    }
    tracing::info!("vault-server stopped");
    Ok(())
}

/// Prints version information to stdout.
fn print_version() {
    println!("vault-server {}", env!("CARGO_PKG_VERSION"));
    println!("rustc        {}", rustc_version());
}

/// Returns the Rust compiler version used to build this binary.
fn rustc_version() -> &'static str {
    option_env!("RUSTC_VERSION").unwrap_or("unknown")
}

/// Waits for SIGINT (Ctrl+C) or SIGTERM, whichever comes first.
///
/// On non-Unix platforms, only Ctrl+C is supported. If a handler cannot be
/// installed, that signal is simply never observed.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    tracing::info!("shutdown signal received, draining connections");
}
