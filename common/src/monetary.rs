//! Currency and exchange rate types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalize a raw currency code: surrounding whitespace is trimmed and the
/// remainder uppercased.
pub fn normalize_code(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// A tracked currency, identified by its normalized code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency(String);

impl Currency {
    /// Parse a raw code. Returns `None` when nothing is left after normalization.
    pub fn parse(raw: &str) -> Option<Self> {
        let code = normalize_code(raw);
        if code.is_empty() {
            None
        } else {
            Some(Self(code))
        }
    }

    /// Get the currency code.
    pub fn code(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Currency {
    type Error = EmptyCurrencyCode;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw).ok_or(EmptyCurrencyCode)
    }
}

impl From<Currency> for String {
    fn from(currency: Currency) -> Self {
        currency.0
    }
}

impl AsRef<str> for Currency {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Error when a currency code is empty after normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyCurrencyCode;

impl fmt::Display for EmptyCurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Currency code cannot be empty")
    }
}

impl std::error::Error for EmptyCurrencyCode {}

/// An ordered pair of currencies. `USD/EUR` and `EUR/USD` are distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyPair {
    /// Currency being converted from.
    pub from: Currency,
    /// Currency being converted to.
    pub to: Currency,
}

impl CurrencyPair {
    /// Create a new currency pair.
    pub fn new(from: Currency, to: Currency) -> Self {
        Self { from, to }
    }

    /// Get the inverse pair.
    pub fn inverse(&self) -> Self {
        Self {
            from: self.to.clone(),
            to: self.from.clone(),
        }
    }

    /// Check whether either side of the pair is `currency`.
    pub fn involves(&self, currency: &Currency) -> bool {
        &self.from == currency || &self.to == currency
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.from, self.to)
    }
}

/// A stored exchange rate for one direction of a currency pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeRate {
    /// The ordered pair this rate converts.
    pub pair: CurrencyPair,
    /// Units of `pair.to` per unit of `pair.from`.
    pub rate: f64,
    /// When the rate was drawn.
    pub generated_at: DateTime<Utc>,
}

impl ExchangeRate {
    /// Create a new rate stamped with the current time.
    pub fn new(pair: CurrencyPair, rate: f64) -> Self {
        Self {
            pair,
            rate,
            generated_at: Utc::now(),
        }
    }

    pub fn from(&self) -> &Currency {
        &self.pair.from
    }

    pub fn to(&self) -> &Currency {
        &self.pair.to
    }

    /// The opposite direction, carrying the exact reciprocal.
    pub fn inverse(&self) -> Self {
        Self {
            pair: self.pair.inverse(),
            rate: 1.0 / self.rate,
            generated_at: self.generated_at,
        }
    }
}

/// Identity is the ordered pair; the rate value does not take part.
impl PartialEq for ExchangeRate {
    fn eq(&self, other: &Self) -> bool {
        self.pair == other.pair
    }
}

impl Eq for ExchangeRate {}

impl fmt::Display for ExchangeRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.pair, self.rate)
    }
}

/// Outcome of converting an amount between two tracked currencies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResult {
    /// Amount in the source currency.
    pub amount: f64,
    /// Source currency.
    #[serde(rename = "fromCurrency")]
    pub from: Currency,
    /// Target currency.
    #[serde(rename = "toCurrency")]
    pub to: Currency,
    /// `amount * rate`, unrounded.
    pub converted_amount: f64,
    /// Rate applied.
    pub rate: f64,
}
