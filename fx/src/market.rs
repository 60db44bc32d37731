//! Market facade wiring the registry, the rate store and the calculator.

use std::ops::Range;
use std::sync::Arc;

use serde::Serialize;
use tracing::instrument;
use xchange_common::{ConversionResult, Currency, ExchangeRate};

use crate::conversion::ConversionCalculator;
use crate::error::ExchangeResult;
use crate::generator::{RateGenerator, RateRangeError, UniformRateGenerator, MAX_RATE, MIN_RATE};
use crate::registry::{CurrencyRegistry, MutationOrdering};
use crate::seed::{seed_currencies, SeedReport, DEFAULT_CURRENCIES};
use crate::store::ExchangeRateStore;

/// Configuration for a market.
#[derive(Debug, Clone)]
pub struct MarketConfig {
    /// Half-open range generated rates are drawn from.
    pub rate_range: Range<f64>,
    /// Fixed seed for the rate generator. `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Ordering of registry mutations.
    pub ordering: MutationOrdering,
    /// Currencies added by [`Market::seed_defaults`].
    pub default_currencies: Vec<String>,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            rate_range: MIN_RATE..MAX_RATE,
            seed: None,
            ordering: MutationOrdering::Relaxed,
            default_currencies: DEFAULT_CURRENCIES.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// Registry, store and calculator sharing one rate graph.
pub struct Market {
    store: Arc<ExchangeRateStore>,
    registry: Arc<CurrencyRegistry>,
    calculator: ConversionCalculator,
    config: MarketConfig,
}

impl Market {
    /// Create a market with a uniform generator built from the config.
    pub fn new(config: MarketConfig) -> Result<Self, RateRangeError> {
        let generator = UniformRateGenerator::with_range(config.rate_range.clone(), config.seed)?;
        Ok(Self::with_generator(config, Arc::new(generator)))
    }

    /// Create a market with an injected rate source. `rate_range` and `seed`
    /// in the config are ignored.
    pub fn with_generator(config: MarketConfig, generator: Arc<dyn RateGenerator>) -> Self {
        let store = Arc::new(ExchangeRateStore::with_generator(generator));
        let registry = Arc::new(CurrencyRegistry::with_ordering(store.clone(), config.ordering));
        let calculator = ConversionCalculator::new(registry.clone());

        Self {
            store,
            registry,
            calculator,
            config,
        }
    }

    /// Track the configured default currencies.
    pub fn seed_defaults(&self) -> SeedReport {
        seed_currencies(&self.registry, &self.config.default_currencies)
    }

    pub fn list_currencies(&self) -> Vec<Currency> {
        self.registry.list_currencies()
    }

    #[instrument(skip(self))]
    pub fn add_currency(&self, code: &str) -> ExchangeResult<Currency> {
        self.registry.add_currency(code)
    }

    #[instrument(skip(self))]
    pub fn remove_currency(&self, code: &str) -> ExchangeResult<Currency> {
        self.registry.remove_currency(code)
    }

    pub fn is_tracked(&self, code: &str) -> bool {
        self.registry.is_tracked(code)
    }

    pub fn get_rate(&self, from: &str, to: &str) -> ExchangeResult<f64> {
        self.store.get_rate(from, to)
    }

    pub fn convert(&self, amount: f64, from: &str, to: &str) -> ExchangeResult<ConversionResult> {
        self.calculator.convert(amount, from, to)
    }

    pub fn list_rates(&self) -> Vec<ExchangeRate> {
        self.store.list_all_rates()
    }

    /// Get market statistics.
    pub fn stats(&self) -> MarketStats {
        MarketStats {
            currencies: self.registry.len(),
            rates: self.store.len(),
        }
    }

    pub fn registry(&self) -> &Arc<CurrencyRegistry> {
        &self.registry
    }

    pub fn store(&self) -> &Arc<ExchangeRateStore> {
        &self.store
    }

    pub fn calculator(&self) -> &ConversionCalculator {
        &self.calculator
    }

    pub fn config(&self) -> &MarketConfig {
        &self.config
    }
}

/// Market statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MarketStats {
    pub currencies: usize,
    pub rates: usize,
}
