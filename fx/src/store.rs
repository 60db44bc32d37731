//! Pairwise exchange rate graph.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::debug;
use xchange_common::{normalize_code, Currency, CurrencyPair, ExchangeRate};

use crate::error::{ExchangeError, ExchangeResult};
use crate::generator::{RateGenerator, UniformRateGenerator};

/// Thread-safe store of directed exchange rates.
///
/// Every pair is written in both directions by a single generation call, the
/// second entry holding the exact reciprocal of the first. Individual reads and
/// writes are atomic per key; there is no transaction spanning keys, so a reader
/// racing a generation may briefly see one direction without the other.
pub struct ExchangeRateStore {
    rates: DashMap<CurrencyPair, ExchangeRate>,
    generator: Arc<dyn RateGenerator>,
}

impl ExchangeRateStore {
    /// Create a store drawing rates uniformly from `[0.5, 2.0)`.
    pub fn new() -> Self {
        Self::with_generator(Arc::new(UniformRateGenerator::from_entropy()))
    }

    /// Create a store with an injected rate source.
    pub fn with_generator(generator: Arc<dyn RateGenerator>) -> Self {
        Self {
            rates: DashMap::new(),
            generator,
        }
    }

    /// Generate and store rates for `from -> to` and `to -> from`.
    ///
    /// No-op if the pair already has a rate in either direction, or if both
    /// sides are the same currency.
    pub fn generate_rate_for_pair(&self, from: &Currency, to: &Currency) {
        if from == to {
            return;
        }

        let pair = CurrencyPair::new(from.clone(), to.clone());
        let canonical = Self::canonical(&pair);
        if self.rates.contains_key(&canonical) {
            debug!(pair = %pair, "Rate already present");
            return;
        }

        // Draw outside the map so no shard is locked while the generator runs.
        let rate = ExchangeRate::new(pair.clone(), self.generator.next_rate());
        let (claimed, other) = if canonical == pair {
            (rate.clone(), rate.inverse())
        } else {
            (rate.inverse(), rate.clone())
        };

        // Whoever claims the canonical direction owns writing both entries.
        match self.rates.entry(canonical) {
            Entry::Occupied(_) => {
                debug!(pair = %pair, "Rate generated concurrently, discarding draw");
                return;
            }
            Entry::Vacant(slot) => {
                slot.insert(claimed);
            }
        }
        self.rates.insert(other.pair.clone(), other);

        debug!(pair = %pair, rate = rate.rate, "Generated rate pair");
    }

    /// Look up the rate for converting `from` into `to`.
    ///
    /// Codes are matched case-insensitively; equal codes always yield `1.0`.
    pub fn get_rate(&self, from: &str, to: &str) -> ExchangeResult<f64> {
        let from = normalize_code(from);
        let to = normalize_code(to);

        if from == to {
            return Ok(1.0);
        }

        let (Some(from_currency), Some(to_currency)) = (Currency::parse(&from), Currency::parse(&to))
        else {
            return Err(ExchangeError::RateNotFound { from, to });
        };

        let pair = CurrencyPair::new(from_currency, to_currency);
        self.rates
            .get(&pair)
            .map(|entry| entry.rate)
            .ok_or_else(|| ExchangeError::rate_not_found(&pair))
    }

    /// Get the stored record for an ordered pair, if any.
    pub fn get(&self, pair: &CurrencyPair) -> Option<ExchangeRate> {
        self.rates.get(pair).map(|entry| entry.clone())
    }

    /// Remove every rate that has `code` on either side.
    ///
    /// Returns the number of entries removed; zero is not an error.
    pub fn remove_rates_for_currency(&self, code: &str) -> usize {
        let Some(currency) = Currency::parse(code) else {
            return 0;
        };

        let before = self.rates.len();
        self.rates.retain(|pair, _| !pair.involves(&currency));
        let removed = before.saturating_sub(self.rates.len());

        debug!(currency = %currency, removed, "Pruned rates");
        removed
    }

    /// Snapshot of all stored rates.
    pub fn list_all_rates(&self) -> Vec<ExchangeRate> {
        self.rates.iter().map(|entry| entry.value().clone()).collect()
    }

    /// Get the number of stored directed rates.
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    fn canonical(pair: &CurrencyPair) -> CurrencyPair {
        if pair.from <= pair.to {
            pair.clone()
        } else {
            pair.inverse()
        }
    }
}

impl Default for ExchangeRateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{FixedRateGenerator, MAX_RATE, MIN_RATE};

    fn currency(code: &str) -> Currency {
        Currency::parse(code).unwrap()
    }

    fn fixed_store(rate: f64) -> ExchangeRateStore {
        ExchangeRateStore::with_generator(Arc::new(FixedRateGenerator::constant(rate)))
    }

    #[test]
    fn test_generate_stores_both_directions() {
        let store = fixed_store(1.25);

        store.generate_rate_for_pair(&currency("USD"), &currency("EUR"));

        assert_eq!(store.len(), 2);
        assert_eq!(store.get_rate("USD", "EUR").unwrap(), 1.25);
        assert_eq!(store.get_rate("EUR", "USD").unwrap(), 0.8);
    }

    #[test]
    fn test_requested_direction_gets_drawn_rate() {
        // EUR sorts before USD, so the canonical side is the inverse here.
        let store = fixed_store(1.6);

        store.generate_rate_for_pair(&currency("USD"), &currency("EUR"));

        assert_eq!(store.get_rate("USD", "EUR").unwrap(), 1.6);
        assert_eq!(store.get_rate("EUR", "USD").unwrap(), 1.0 / 1.6);
    }

    #[test]
    fn test_generate_is_idempotent() {
        let generator = Arc::new(FixedRateGenerator::new(vec![1.5, 0.6]));
        let store = ExchangeRateStore::with_generator(generator.clone());

        store.generate_rate_for_pair(&currency("USD"), &currency("EUR"));
        store.generate_rate_for_pair(&currency("USD"), &currency("EUR"));
        store.generate_rate_for_pair(&currency("EUR"), &currency("USD"));

        assert_eq!(generator.draws(), 1);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get_rate("USD", "EUR").unwrap(), 1.5);
    }

    #[test]
    fn test_same_currency_not_stored() {
        let store = fixed_store(1.5);

        store.generate_rate_for_pair(&currency("USD"), &currency("USD"));

        assert!(store.is_empty());
        assert_eq!(store.get_rate("USD", "usd").unwrap(), 1.0);
        // Equal codes short-circuit even when nothing is tracked.
        assert_eq!(store.get_rate("XYZ", "XYZ").unwrap(), 1.0);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let store = fixed_store(1.1);
        store.generate_rate_for_pair(&currency("USD"), &currency("GBP"));

        assert_eq!(store.get_rate("usd", "gbp").unwrap(), 1.1);
        assert_eq!(store.get_rate(" Usd", "GbP ").unwrap(), 1.1);
    }

    #[test]
    fn test_missing_rate() {
        let store = fixed_store(1.1);

        let result = store.get_rate("USD", "EUR");

        assert_eq!(
            result,
            Err(ExchangeError::RateNotFound {
                from: "USD".into(),
                to: "EUR".into()
            })
        );
        assert!(matches!(
            store.get_rate("", "EUR"),
            Err(ExchangeError::RateNotFound { .. })
        ));
    }

    #[test]
    fn test_remove_rates_for_currency() {
        let store = ExchangeRateStore::new();
        let (usd, eur, gbp) = (currency("USD"), currency("EUR"), currency("GBP"));
        store.generate_rate_for_pair(&usd, &eur);
        store.generate_rate_for_pair(&usd, &gbp);
        store.generate_rate_for_pair(&eur, &gbp);
        assert_eq!(store.len(), 6);

        let removed = store.remove_rates_for_currency("eur");

        assert_eq!(removed, 4);
        assert_eq!(store.len(), 2);
        assert!(store.list_all_rates().iter().all(|r| !r.pair.involves(&eur)));
        assert!(store.get_rate("USD", "GBP").is_ok());
    }

    #[test]
    fn test_remove_without_rates_is_noop() {
        let store = ExchangeRateStore::new();

        assert_eq!(store.remove_rates_for_currency("JPY"), 0);
        assert_eq!(store.remove_rates_for_currency("  "), 0);
    }

    #[test]
    fn test_list_all_rates_is_snapshot() {
        let store = ExchangeRateStore::new();
        store.generate_rate_for_pair(&currency("USD"), &currency("EUR"));

        let snapshot = store.list_all_rates();
        store.remove_rates_for_currency("USD");

        assert_eq!(snapshot.len(), 2);
        assert!(store.is_empty());
    }

    #[test]
    fn test_generated_rates_in_range_and_reciprocal() {
        let store = ExchangeRateStore::with_generator(Arc::new(UniformRateGenerator::seeded(11)));
        let codes = ["USD", "EUR", "GBP", "JPY", "CHF", "CAD", "AUD"];
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                store.generate_rate_for_pair(&currency(a), &currency(b));
            }
        }

        for rate in store.list_all_rates() {
            let inverse = store.get(&rate.pair.inverse()).unwrap();
            assert!((rate.rate * inverse.rate - 1.0).abs() < 1e-9);
            // Only one direction of each pair is drawn directly.
            let drawn = (MIN_RATE..MAX_RATE).contains(&rate.rate)
                || (MIN_RATE..MAX_RATE).contains(&inverse.rate);
            assert!(drawn);
        }
    }

    #[test]
    fn test_concurrent_generation_of_same_pair() {
        let store = ExchangeRateStore::with_generator(Arc::new(UniformRateGenerator::seeded(5)));
        let (usd, eur) = (currency("USD"), currency("EUR"));

        std::thread::scope(|s| {
            for i in 0..8 {
                let (store, usd, eur) = (&store, &usd, &eur);
                s.spawn(move || {
                    if i % 2 == 0 {
                        store.generate_rate_for_pair(usd, eur);
                    } else {
                        store.generate_rate_for_pair(eur, usd);
                    }
                });
            }
        });

        let forward = store.get_rate("USD", "EUR").unwrap();
        let backward = store.get_rate("EUR", "USD").unwrap();
        assert_eq!(store.len(), 2);
        assert!((forward * backward - 1.0).abs() < 1e-9);
    }
}
