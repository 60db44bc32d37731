//! Tracked currency registry.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::{Mutex, MutexGuard};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use xchange_common::{normalize_code, Currency};

use crate::error::{ExchangeError, ExchangeResult};
use crate::store::ExchangeRateStore;

/// How registry mutations are ordered against each other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationOrdering {
    /// Per-key atomicity only. Adds and removes run their two steps
    /// (currency set, then rate graph) without any wider lock.
    #[default]
    Relaxed,
    /// Adds and removes are serialized by one lock, so an add can never
    /// generate rates against a partner that is concurrently being removed.
    /// Readers still do not block.
    Serialized,
}

/// Owns the set of tracked currencies and keeps the rate graph in step with it.
pub struct CurrencyRegistry {
    /// Tracked currencies keyed by normalized code.
    currencies: DashMap<String, Currency>,
    /// Rate graph expanded and pruned by this registry.
    store: Arc<ExchangeRateStore>,
    ordering: MutationOrdering,
    mutation_lock: Mutex<()>,
}

impl CurrencyRegistry {
    /// Create an empty registry backed by `store`.
    pub fn new(store: Arc<ExchangeRateStore>) -> Self {
        Self::with_ordering(store, MutationOrdering::default())
    }

    /// Create an empty registry with an explicit mutation ordering.
    pub fn with_ordering(store: Arc<ExchangeRateStore>, ordering: MutationOrdering) -> Self {
        Self {
            currencies: DashMap::new(),
            store,
            ordering,
            mutation_lock: Mutex::new(()),
        }
    }

    /// All tracked currencies, sorted by code.
    pub fn list_currencies(&self) -> Vec<Currency> {
        let mut currencies: Vec<Currency> =
            self.currencies.iter().map(|entry| entry.value().clone()).collect();
        currencies.sort();
        currencies
    }

    /// Start tracking a currency and generate its rates against every other
    /// tracked currency.
    ///
    /// Adding a code that is already tracked succeeds without touching the
    /// rate graph.
    pub fn add_currency(&self, code: &str) -> ExchangeResult<Currency> {
        let currency =
            Currency::parse(code).ok_or_else(|| ExchangeError::InvalidCurrency(code.to_string()))?;
        let _guard = self.mutation_guard();

        match self.currencies.entry(currency.code().to_string()) {
            Entry::Occupied(_) => {
                debug!(currency = %currency, "Currency already tracked");
                return Ok(currency);
            }
            Entry::Vacant(slot) => {
                slot.insert(currency.clone());
            }
        }

        // Snapshot first so no registry shard is held while the store is written.
        let partners: Vec<Currency> = self
            .currencies
            .iter()
            .map(|entry| entry.value().clone())
            .filter(|existing| existing != &currency)
            .collect();

        for partner in &partners {
            self.store.generate_rate_for_pair(&currency, partner);
        }

        info!(
            currency = %currency,
            partners = partners.len(),
            "Currency added"
        );
        Ok(currency)
    }

    /// Check whether a code is tracked. Case-insensitive.
    pub fn is_tracked(&self, code: &str) -> bool {
        self.currencies.contains_key(&normalize_code(code))
    }

    /// Look up a tracked currency.
    pub fn get_currency(&self, code: &str) -> ExchangeResult<Currency> {
        let code = normalize_code(code);
        self.currencies
            .get(&code)
            .map(|entry| entry.value().clone())
            .ok_or(ExchangeError::CurrencyNotFound(code))
    }

    /// Stop tracking a currency and prune every rate that references it.
    pub fn remove_currency(&self, code: &str) -> ExchangeResult<Currency> {
        let normalized = normalize_code(code);
        if normalized.is_empty() {
            return Err(ExchangeError::InvalidCurrency(code.to_string()));
        }
        let _guard = self.mutation_guard();

        let (_, currency) = self
            .currencies
            .remove(&normalized)
            .ok_or(ExchangeError::CurrencyNotFound(normalized))?;

        let pruned = self.store.remove_rates_for_currency(currency.code());

        info!(currency = %currency, pruned, "Currency removed");
        Ok(currency)
    }

    /// Number of tracked currencies.
    pub fn len(&self) -> usize {
        self.currencies.len()
    }

    /// Check if no currency is tracked.
    pub fn is_empty(&self) -> bool {
        self.currencies.is_empty()
    }

    /// The rate store this registry maintains.
    pub fn store(&self) -> &Arc<ExchangeRateStore> {
        &self.store
    }

    /// Mutation ordering in effect.
    pub fn ordering(&self) -> MutationOrdering {
        self.ordering
    }

    fn mutation_guard(&self) -> Option<MutexGuard<'_, ()>> {
        match self.ordering {
            MutationOrdering::Relaxed => None,
            MutationOrdering::Serialized => Some(self.mutation_lock.lock()),
        }
    }
}
