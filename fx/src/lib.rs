//! Xchange FX Core
//!
//! In-memory currency registry and exchange rate graph.
//!
//! # Features
//!
//! - Case-insensitive currency registry with idempotent adds
//! - Complete pairwise rate graph, each pair stored as exact reciprocals
//! - Injectable, seedable rate generation
//! - Conversion with ordered input validation
//!
//! # Example
//!
//! ```rust,ignore
//! use xchange_fx::{Market, MarketConfig};
//!
//! let market = Market::new(MarketConfig::default())?;
//! market.add_currency("usd")?;
//! market.add_currency("eur")?;
//!
//! let result = market.convert(100.0, "USD", "EUR")?;
//! println!("{} {} = {} {}", result.amount, result.from, result.converted_amount, result.to);
//! ```

pub mod conversion;
pub mod error;
pub mod generator;
pub mod market;
pub mod registry;
pub mod seed;
pub mod store;

pub use conversion::ConversionCalculator;
pub use error::{ExchangeError, ExchangeResult};
pub use generator::{RateGenerator, RateRangeError, UniformRateGenerator};
#[cfg(any(test, feature = "test-utils"))]
pub use generator::FixedRateGenerator;
pub use market::{Market, MarketConfig, MarketStats};
pub use registry::{CurrencyRegistry, MutationOrdering};
pub use seed::{seed_currencies, SeedReport, DEFAULT_CURRENCIES};
pub use store::ExchangeRateStore;
