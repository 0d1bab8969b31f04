//! Valuation Pipeline
//!
//! Pure calculation stages chained by [`Valuator`]:
//!
//! ```text
//! MarketQuote ──▶ UnitConverter ──▶ discount::simulate ──▶ profit (x3) ──▶ decide
//!                 (USD/oz → local/g)  (chosen/min/max)                     (Hold | ConsiderSell)
//! ```
//!
//! Rounding happens once, on the reported totals and profits. The converted
//! spot price and the three sell prices stay unrounded, so ranges are never
//! derived from already-rounded intermediates.

mod converter;
mod decision;
mod discount;
mod profit;

pub use converter::{UnitConverter, GRAMS_PER_TROY_OUNCE};
pub use decision::decide;
pub use discount::{sell_price, simulate, SellPrices};
pub use profit::profit;

use crate::error::Result;
use crate::model::{checked_mul, round_money, DiscountBand, Holding, MarketQuote, ValuationResult};

/// Stateless evaluator for one (holding, quote, band) triple
#[derive(Clone, Copy, Debug, Default)]
pub struct Valuator {
    converter: UnitConverter,
}

impl Valuator {
    pub const fn new(converter: UnitConverter) -> Self {
        Self { converter }
    }

    pub const fn converter(&self) -> &UnitConverter {
        &self.converter
    }

    pub fn value(
        &self,
        holding: &Holding,
        quote: &MarketQuote,
        band: &DiscountBand,
    ) -> Result<ValuationResult> {
        holding.validate()?;

        let spot = self
            .converter
            .to_local_per_gram(quote.spot_price_usd_per_oz(), quote.fx_rate())?;
        let prices = simulate(spot, band);

        let weight = holding.weight;
        let original_value = holding.original_value()?;
        let total = |price| checked_mul(price, weight, "total value").map(round_money);
        let total_value = total(prices.simulated)?;

        let result = ValuationResult {
            spot_price_local_per_gram: spot,
            discount_used: band.chosen(),
            simulated_sell_price: prices.simulated,
            min_sell_price: prices.min,
            max_sell_price: prices.max,
            total_value,
            min_total_value: total(prices.min)?,
            max_total_value: total(prices.max)?,
            original_value,
            profit: profit(holding.buy_price, weight, prices.simulated)?,
            min_profit: profit(holding.buy_price, weight, prices.min)?,
            max_profit: profit(holding.buy_price, weight, prices.max)?,
            decision: decide(total_value, original_value),
        };

        tracing::debug!(
            spot_local_per_gram = %spot,
            simulated_sell_price = %result.simulated_sell_price,
            total_value = %result.total_value,
            decision = ?result.decision,
            "Valued holding"
        );

        Ok(result)
    }
}
