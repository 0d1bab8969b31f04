//! Error Types for Gold Valuation

use rust_decimal::Decimal;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ValuationError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValuationError {
    #[error("Invalid quote: {0}")]
    InvalidQuote(String),

    #[error("Invalid holding: buy price {buy_price} and weight {weight} must both be positive")]
    InvalidHolding {
        buy_price: Decimal,
        weight: Decimal,
    },

    #[error("Division by zero: percent profit is undefined for a zero buy price")]
    DivisionByZero,

    #[error("Invalid discount band: require 0 <= min ({min}) <= chosen ({chosen}) <= max ({max}) <= 100")]
    InvalidDiscountBand {
        min: Decimal,
        chosen: Decimal,
        max: Decimal,
    },

    #[error("Arithmetic overflow computing {0}")]
    Overflow(&'static str),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ValuationError {
    /// Stable machine-readable code for API responses
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidQuote(_) => "INVALID_QUOTE",
            Self::InvalidHolding { .. } => "INVALID_HOLDING",
            Self::DivisionByZero => "DIVISION_BY_ZERO",
            Self::InvalidDiscountBand { .. } => "INVALID_DISCOUNT_BAND",
            Self::Overflow(_) => "OVERFLOW",
            Self::Config(_) => "CONFIG",
        }
    }
}

/// Failures of the price/FX acquisition layer.
///
/// These never reach the calculator: a failed spot fetch means there is no
/// quote to evaluate, and a failed FX fetch is replaced by the fallback rate.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("No price available: {0}")]
    NoPrice(String),

    #[error("Feed returned status {0}")]
    Status(u16),

    #[error("Field '{0}' not found in feed response")]
    MissingField(String),

    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Decode error: {0}")]
    Decode(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes() {
        assert_eq!(ValuationError::DivisionByZero.code(), "DIVISION_BY_ZERO");
        let err = ValuationError::InvalidHolding { buy_price: dec!(0), weight: dec!(1) };
        assert_eq!(err.code(), "INVALID_HOLDING");
        assert!(err.to_string().contains("buy price 0"));
        assert_eq!(ValuationError::Overflow("total value").code(), "OVERFLOW");
    }
}
