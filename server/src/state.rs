//! Shared application state.

use std::sync::Arc;

use tracing::{info, warn};
use xchange_fx::Market;

use crate::auth::AuthManager;
use crate::config::ServerConfig;

pub struct AppState {
    pub market: Market,
    pub auth: AuthManager,
}

/// Build the market, seed it with the configured currencies and wrap it for the router.
pub fn build_state(config: &ServerConfig) -> anyhow::Result<Arc<AppState>> {
    let market = Market::new(config.market_config())?;

    if config.seed_currencies.is_empty() {
        info!("Currency seeding disabled");
    } else {
        let report = market.seed_defaults();
        if !report.is_complete() {
            warn!(failed = report.failed.len(), "Some default currencies were rejected");
        }
    }

    Ok(Arc::new(AppState {
        market,
        auth: AuthManager::new(config.users.clone()),
    }))
}
