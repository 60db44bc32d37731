//! Exchange error types.

use thiserror::Error;
use xchange_common::CurrencyPair;

/// Errors returned by the registry, the rate store and the calculator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExchangeError {
    /// Currency code is empty after normalization.
    #[error("Currency code cannot be empty (got {0:?})")]
    InvalidCurrency(String),

    /// Currency is not tracked by the registry.
    #[error("Currency not found: {0}")]
    CurrencyNotFound(String),

    /// Amount is negative.
    #[error("Amount cannot be negative: {0}")]
    InvalidAmount(f64),

    /// No stored rate for the ordered pair.
    #[error("Exchange rate not found for {from} to {to}")]
    RateNotFound { from: String, to: String },
}

impl ExchangeError {
    /// Rate lookup failure for an ordered pair.
    pub fn rate_not_found(pair: &CurrencyPair) -> Self {
        ExchangeError::RateNotFound {
            from: pair.from.code().to_string(),
            to: pair.to.code().to_string(),
        }
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            ExchangeError::InvalidCurrency(_) => "INVALID_CURRENCY",
            ExchangeError::CurrencyNotFound(_) => "CURRENCY_NOT_FOUND",
            ExchangeError::InvalidAmount(_) => "INVALID_AMOUNT",
            ExchangeError::RateNotFound { .. } => "RATE_NOT_FOUND",
        }
    }

    /// Whether the caller supplied malformed input, as opposed to referencing
    /// something that does not exist.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ExchangeError::InvalidCurrency(_) | ExchangeError::InvalidAmount(_)
        )
    }
}

/// Result type for exchange operations.
pub type ExchangeResult<T> = Result<T, ExchangeError>;

#[cfg(test)]
mod tests {
    use super::*;
    use xchange_common::Currency;

    #[test]
    fn test_error_codes() {
        let pair = CurrencyPair::new(
            Currency::parse("USD").unwrap(),
            Currency::parse("EUR").unwrap(),
        );

        assert_eq!(ExchangeError::InvalidCurrency(String::new()).error_code(), "INVALID_CURRENCY");
        assert_eq!(ExchangeError::CurrencyNotFound("ZZZ".into()).error_code(), "CURRENCY_NOT_FOUND");
        assert_eq!(ExchangeError::InvalidAmount(-1.0).error_code(), "INVALID_AMOUNT");
        assert_eq!(ExchangeError::rate_not_found(&pair).error_code(), "RATE_NOT_FOUND");
        assert_eq!(
            ExchangeError::rate_not_found(&pair).to_string(),
            "Exchange rate not found for USD to EUR"
        );
    }

    #[test]
    fn test_messages_name_the_currency() {
        let err = ExchangeError::CurrencyNotFound("ZZZ".into());
        assert_eq!(err.to_string(), "Currency not found: ZZZ");
        assert!(!err.is_client_error());
        assert!(ExchangeError::InvalidAmount(-5.0).is_client_error());
    }
}
