//! Static Quote Feed
//!
//! For testing and offline runs. Returns fixed prices.

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::{FxRateFeed, SpotPriceFeed};
use crate::error::FetchError;

/// Feed with a fixed spot price and exchange rate
#[derive(Clone, Debug)]
pub struct StaticQuoteFeed {
    spot_price: Option<Decimal>,
    fx_rate: Decimal,
    fail_fx: bool,
}

impl StaticQuoteFeed {
    pub const fn new(spot_price_usd_per_oz: Decimal, fx_rate: Decimal) -> Self {
        Self {
            spot_price: Some(spot_price_usd_per_oz),
            fx_rate,
            fail_fx: false,
        }
    }

    /// A feed whose spot price is unavailable
    pub const fn without_spot_price(fx_rate: Decimal) -> Self {
        Self {
            spot_price: None,
            fx_rate,
            fail_fx: false,
        }
    }

    /// Make every exchange-rate request fail
    #[must_use]
    pub const fn with_failing_fx(mut self) -> Self {
        self.fail_fx = true;
        self
    }
}

#[async_trait]
impl SpotPriceFeed for StaticQuoteFeed {
    async fn fetch_spot_price_usd_per_oz(&self) -> Result<Decimal, FetchError> {
        self.spot_price
            .ok_or_else(|| FetchError::NoPrice("static feed has no spot price".into()))
    }

    fn name(&self) -> &str {
        "StaticFeed"
    }
}

#[async_trait]
impl FxRateFeed for StaticQuoteFeed {
    async fn fetch_fx_rate(&self, currency: &str) -> Result<Decimal, FetchError> {
        if self.fail_fx {
            return Err(FetchError::MissingField(format!("rates.{currency}")));
        }
        Ok(self.fx_rate)
    }
}
