//! Quote Acquisition
//!
//! Feeds for the two numbers the calculator needs: gold spot price in USD
//! per troy ounce and the USD exchange rate for the local currency.
//! [`QuoteProvider`] turns them into a validated [`MarketQuote`], applying
//! the fallback exchange rate explicitly when the FX feed fails.

mod http;
mod mock;

pub use http::HttpQuoteFeed;
pub use mock::StaticQuoteFeed;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;

use crate::error::{FetchError, ValuationError};
use crate::model::{MarketQuote, QuoteSource};

/// Source of the gold spot price (Strategy pattern)
#[async_trait]
pub trait SpotPriceFeed: Send + Sync {
    /// Spot price in USD per troy ounce
    async fn fetch_spot_price_usd_per_oz(&self) -> std::result::Result<Decimal, FetchError>;

    fn name(&self) -> &str;
}

/// Source of USD exchange rates
#[async_trait]
pub trait FxRateFeed: Send + Sync {
    /// Units of `currency` per one USD
    async fn fetch_fx_rate(&self, currency: &str) -> std::result::Result<Decimal, FetchError>;
}

/// Why a quote could not be produced
#[derive(thiserror::Error, Debug)]
pub enum QuoteError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Invalid(#[from] ValuationError),
}

/// A quote plus whether its exchange rate is the configured fallback
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AcquiredQuote {
    pub quote: MarketQuote,
    pub fx_fallback_used: bool,
}

pub struct QuoteProvider {
    spot: Arc<dyn SpotPriceFeed>,
    fx: Arc<dyn FxRateFeed>,
    currency: String,
    fx_fallback: Decimal,
}

impl QuoteProvider {
    pub fn new(
        spot: Arc<dyn SpotPriceFeed>,
        fx: Arc<dyn FxRateFeed>,
        currency: impl Into<String>,
        fx_fallback: Decimal,
    ) -> Self {
        Self {
            spot,
            fx,
            currency: currency.into(),
            fx_fallback,
        }
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Exchange rate from the feed, or the fallback when the feed fails
    pub async fn fx_rate(&self) -> (Decimal, bool) {
        match self.fx.fetch_fx_rate(&self.currency).await {
            Ok(rate) if rate > Decimal::ZERO => (rate, false),
            Ok(rate) => {
                tracing::warn!("FX feed returned non-positive rate {}, using fallback {}", rate, self.fx_fallback);
                (self.fx_fallback, true)
            }
            Err(e) => {
                tracing::warn!("FX feed failed ({}), using fallback rate {}", e, self.fx_fallback);
                (self.fx_fallback, true)
            }
        }
    }

    /// Spot price and exchange rate from the feeds, fetched concurrently
    pub async fn live_quote(&self) -> std::result::Result<AcquiredQuote, QuoteError> {
        let (spot, (fx_rate, fx_fallback_used)) =
            tokio::join!(self.spot.fetch_spot_price_usd_per_oz(), self.fx_rate());
        let spot = spot.inspect_err(|e| {
            tracing::error!("Spot price feed {} failed: {}", self.spot.name(), e);
        })?;
        Self::build(spot, fx_rate, fx_fallback_used, QuoteSource::Live)
    }

    /// User-entered spot price with a fetched exchange rate
    pub async fn manual_quote(&self, spot_price_usd_per_oz: Decimal) -> std::result::Result<AcquiredQuote, QuoteError> {
        let (fx_rate, fx_fallback_used) = self.fx_rate().await;
        Self::build(spot_price_usd_per_oz, fx_rate, fx_fallback_used, QuoteSource::Manual)
    }

    fn build(
        spot: Decimal,
        fx_rate: Decimal,
        fx_fallback_used: bool,
        source: QuoteSource,
    ) -> std::result::Result<AcquiredQuote, QuoteError> {
        let quote = MarketQuote::new(spot, fx_rate, Utc::now(), source)?;
        Ok(AcquiredQuote {
            quote,
            fx_fallback_used,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn provider(feed: StaticQuoteFeed) -> QuoteProvider {
        let feed = Arc::new(feed);
        QuoteProvider::new(feed.clone(), feed, "TWD", dec!(33.07))
    }

    #[tokio::test]
    async fn test_live_quote() {
        let provider = provider(StaticQuoteFeed::new(dec!(3063.48), dec!(32.5)));
        let acquired = provider.live_quote().await.unwrap();
        assert_eq!(acquired.quote.spot_price_usd_per_oz(), dec!(3063.48));
        assert_eq!(acquired.quote.fx_rate(), dec!(32.5));
        assert_eq!(acquired.quote.source(), QuoteSource::Live);
        assert!(!acquired.fx_fallback_used);
    }

    #[tokio::test]
    async fn test_fx_failure_uses_fallback() {
        let provider = provider(StaticQuoteFeed::new(dec!(3063.48), dec!(32.5)).with_failing_fx());
        let acquired = provider.manual_quote(dec!(3000)).await.unwrap();
        assert_eq!(acquired.quote.fx_rate(), dec!(33.07));
        assert_eq!(acquired.quote.source(), QuoteSource::Manual);
        assert!(acquired.fx_fallback_used);
    }

    #[tokio::test]
    async fn test_missing_spot_price_is_error() {
        let provider = provider(StaticQuoteFeed::without_spot_price(dec!(32.5)));
        let err = provider.live_quote().await.unwrap_err();
        assert!(matches!(err, QuoteError::Fetch(FetchError::NoPrice(_))));
    }

    #[tokio::test]
    async fn test_non_positive_manual_spot_rejected() {
        let provider = provider(StaticQuoteFeed::new(dec!(3063.48), dec!(32.5)));
        let err = provider.manual_quote(Decimal::ZERO).await.unwrap_err();
        assert!(matches!(err, QuoteError::Invalid(ValuationError::InvalidQuote(_))));
    }
}
