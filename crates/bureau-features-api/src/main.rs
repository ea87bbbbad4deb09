//! Bureau Features server
//!
//! # Usage
//!
//! ```bash
//! # Defaults: 0.0.0.0:8002, pretty logs
//! bureau-features-server
//!
//! # TOML config plus overrides
//! bureau-features-server --config server.toml --port 9000 --log-format json
//! ```

use anyhow::Context;
use bureau_features_api::{create_router, init_tracing, AppState, ServerArgs, ServerConfig};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = ServerArgs::parse();
    let config = ServerConfig::load(&args).context("loading configuration")?;

    init_tracing(config.log_format);

    let addr = config.bind_addr();
    let state = AppState::new(config).context("initializing metrics")?;
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;

    tracing::info!(
        addr = %addr,
        version = env!("CARGO_PKG_VERSION"),
        "Bureau features service listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving requests")?;

    tracing::info!("Bureau features service shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
