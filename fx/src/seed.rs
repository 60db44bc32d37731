//! Startup seeding of the currency registry.

use tracing::{error, info};
use xchange_common::Currency;

use crate::error::ExchangeError;
use crate::registry::CurrencyRegistry;

/// Currencies tracked on a fresh start.
pub const DEFAULT_CURRENCIES: [&str; 7] = ["USD", "EUR", "GBP", "JPY", "CHF", "CAD", "AUD"];

/// Outcome of a seeding run.
#[derive(Debug, Clone, Default)]
pub struct SeedReport {
    /// Currencies now tracked as a result of the run (including ones already present).
    pub added: Vec<Currency>,
    /// Entries that failed, with the reason.
    pub failed: Vec<(String, ExchangeError)>,
}

impl SeedReport {
    /// Check whether every entry was accepted.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Add each code in turn. A failing entry is logged and skipped; the rest still run.
pub fn seed_currencies<I, S>(registry: &CurrencyRegistry, codes: I) -> SeedReport
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    info!("Initializing default currencies");

    let mut report = SeedReport::default();
    for code in codes {
        let code = code.as_ref();
        match registry.add_currency(code) {
            Ok(currency) => {
                info!(currency = %currency, "Added default currency");
                report.added.push(currency);
            }
            Err(e) => {
                error!(code, error = %e, "Failed to add default currency");
                report.failed.push((code.to_string(), e));
            }
        }
    }

    info!(
        total = registry.len(),
        failed = report.failed.len(),
        "Default currencies initialized"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ExchangeRateStore;
    use std::sync::Arc;

    #[test]
    fn test_seed_defaults() {
        let registry = CurrencyRegistry::new(Arc::new(ExchangeRateStore::new()));

        let report = seed_currencies(&registry, DEFAULT_CURRENCIES);

        assert!(report.is_complete());
        assert_eq!(report.added.len(), 7);
        assert_eq!(registry.len(), 7);
        assert_eq!(registry.store().len(), 42);
    }

    #[test]
    fn test_seed_skips_failures() {
        let registry = CurrencyRegistry::new(Arc::new(ExchangeRateStore::new()));

        let report = seed_currencies(&registry, ["usd", "", "eur", "  ", "USD"]);

        assert_eq!(report.failed.len(), 2);
        assert!(matches!(report.failed[0].1, ExchangeError::InvalidCurrency(_)));
        assert_eq!(report.added.len(), 3);
        assert_eq!(registry.len(), 2);
    }
}
