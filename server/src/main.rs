//! Xchange Server Binary

use tracing::{error, info};

use xchange_server::{app_router, build_state, init_tracing, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env();
    init_tracing(config.log_format);

    info!("Starting Xchange server");

    if let Err(e) = config.validate() {
        error!(error = %e, "Invalid configuration");
        return Err(anyhow::anyhow!("Configuration error: {}", e));
    }

    let state = build_state(&config)?;
    info!(
        currencies = state.market.stats().currencies,
        rates = state.market.stats().rates,
        "Market ready"
    );

    let router = app_router(state);
    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!(addr = %config.bind_addr(), "Listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for shutdown signal");
            }
            info!("Shutdown signal received");
        })
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
