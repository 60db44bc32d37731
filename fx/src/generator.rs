//! Rate generation.
//!
//! The store never draws numbers itself; it asks a [`RateGenerator`] so that
//! tests can substitute a seeded or scripted source.

use std::ops::Range;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

/// Default lower bound (inclusive) for generated rates.
pub const MIN_RATE: f64 = 0.5;

/// Default upper bound (exclusive) for generated rates.
pub const MAX_RATE: f64 = 2.0;

/// Source of fresh exchange rates.
pub trait RateGenerator: Send + Sync {
    /// Draw the next rate. Must be finite and strictly positive.
    fn next_rate(&self) -> f64;
}

/// Error for an unusable rate range.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Invalid rate range {start}..{end}: bounds must be positive, finite and increasing")]
pub struct RateRangeError {
    pub start: f64,
    pub end: f64,
}

/// Draws rates uniformly from a half-open range.
pub struct UniformRateGenerator {
    range: Range<f64>,
    rng: Mutex<StdRng>,
}

impl UniformRateGenerator {
    /// Generator over `[0.5, 2.0)` seeded from the OS.
    pub fn from_entropy() -> Self {
        Self {
            range: MIN_RATE..MAX_RATE,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Generator over `[0.5, 2.0)` with a fixed seed, for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self {
            range: MIN_RATE..MAX_RATE,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Generator over a custom range.
    pub fn with_range(range: Range<f64>, seed: Option<u64>) -> Result<Self, RateRangeError> {
        let valid = range.start.is_finite()
            && range.end.is_finite()
            && range.start > 0.0
            && range.start < range.end;
        if !valid {
            return Err(RateRangeError {
                start: range.start,
                end: range.end,
            });
        }

        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            range,
            rng: Mutex::new(rng),
        })
    }

    /// The range rates are drawn from.
    pub fn range(&self) -> Range<f64> {
        self.range.clone()
    }
}

impl Default for UniformRateGenerator {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl RateGenerator for UniformRateGenerator {
    fn next_rate(&self) -> f64 {
        self.rng.lock().gen_range(self.range.clone())
    }
}

/// Scripted generator for tests. Hands out rates in order, then repeats the last.
#[cfg(any(test, feature = "test-utils"))]
pub struct FixedRateGenerator {
    rates: Vec<f64>,
    next: std::sync::atomic::AtomicUsize,
}

#[cfg(any(test, feature = "test-utils"))]
impl FixedRateGenerator {
    /// Create a generator from a non-empty list of rates.
    pub fn new(rates: Vec<f64>) -> Self {
        assert!(!rates.is_empty(), "FixedRateGenerator needs at least one rate");
        Self {
            rates,
            next: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// Generator that always returns `rate`.
    pub fn constant(rate: f64) -> Self {
        Self::new(vec![rate])
    }

    /// Number of rates drawn so far.
    pub fn draws(&self) -> usize {
        self.next.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl RateGenerator for FixedRateGenerator {
    fn next_rate(&self) -> f64 {
        let idx = self.next.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.rates[idx.min(self.rates.len() - 1)]
    }
}
