//! Currency conversion against the current rate graph.

use std::sync::Arc;

use tracing::{debug, warn};
use xchange_common::{normalize_code, ConversionResult};

use crate::error::{ExchangeError, ExchangeResult};
use crate::registry::CurrencyRegistry;
use crate::store::ExchangeRateStore;

/// Stateless converter. Reads the registry for membership and the store for rates.
#[derive(Clone)]
pub struct ConversionCalculator {
    registry: Arc<CurrencyRegistry>,
    store: Arc<ExchangeRateStore>,
}

impl ConversionCalculator {
    /// Create a calculator over the registry and the store it maintains.
    pub fn new(registry: Arc<CurrencyRegistry>) -> Self {
        let store = registry.store().clone();
        Self { registry, store }
    }

    /// Convert `amount` of `from` into `to` at the stored rate.
    ///
    /// The source currency is validated before the target, so when both are
    /// unknown the error names the source.
    pub fn convert(&self, amount: f64, from: &str, to: &str) -> ExchangeResult<ConversionResult> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(ExchangeError::InvalidAmount(amount));
        }

        let from = normalize_code(from);
        let to = normalize_code(to);

        let from_currency = self.registry.get_currency(&from)?;
        let to_currency = self.registry.get_currency(&to)?;

        let rate = self.store.get_rate(&from, &to).map_err(|err| {
            warn!(from = %from, to = %to, "No rate stored for two tracked currencies");
            err
        })?;

        let result = ConversionResult {
            amount,
            from: from_currency,
            to: to_currency,
            converted_amount: amount * rate,
            rate,
        };

        debug!(
            from = %result.from,
            to = %result.to,
            amount,
            converted = result.converted_amount,
            "Conversion completed"
        );

        Ok(result)
    }
}
