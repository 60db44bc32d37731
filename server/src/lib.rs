//! Xchange Server
//!
//! HTTP front end for the currency registry: listing and managing currencies,
//! listing rates and converting amounts.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod state;

pub use api::app_router;
pub use config::ServerConfig;
pub use state::{build_state, AppState};

use config::LogFormat;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global tracing subscriber.
pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init(),
    }
}
