//! Domain Models
//!
//! Core data types for valuing a gold holding.
//! Uses `rust_decimal` for all monetary values - never use f64 for money!

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ValuationError};

/// Decimal places used for every rounded monetary figure and percentage
pub const MONEY_DP: u32 = 2;

/// Round half away from zero to two decimals (`1.005 -> 1.01`, `-1.005 -> -1.01`).
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// `a * b`, failing with `Overflow` instead of panicking past `Decimal::MAX`
pub(crate) fn checked_mul(a: Decimal, b: Decimal, what: &'static str) -> Result<Decimal> {
    a.checked_mul(b).ok_or(ValuationError::Overflow(what))
}

/// `a / b`, failing with `Overflow` instead of panicking past `Decimal::MAX`
pub(crate) fn checked_div(a: Decimal, b: Decimal, what: &'static str) -> Result<Decimal> {
    a.checked_div(b).ok_or(ValuationError::Overflow(what))
}

/// A gold position: what was paid per gram and how many grams are held
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holding {
    /// Buy price in local currency per gram
    pub buy_price: Decimal,

    /// Weight in grams
    pub weight: Decimal,
}

impl Holding {
    /// Create a holding, rejecting non-positive buy price or weight
    pub fn new(buy_price: Decimal, weight: Decimal) -> Result<Self> {
        let holding = Self { buy_price, weight };
        holding.validate()?;
        Ok(holding)
    }

    /// Check the positivity invariant.
    ///
    /// Fields are public so a deserialized holding may bypass `new`;
    /// the session re-checks before evaluating.
    pub fn validate(&self) -> Result<()> {
        if self.buy_price <= Decimal::ZERO || self.weight <= Decimal::ZERO {
            return Err(ValuationError::InvalidHolding {
                buy_price: self.buy_price,
                weight: self.weight,
            });
        }
        Ok(())
    }

    /// Amount originally invested, rounded to two decimals
    pub fn original_value(&self) -> Result<Decimal> {
        checked_mul(self.buy_price, self.weight, "original value").map(round_money)
    }
}

/// Where a quote's spot price came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteSource {
    Live,
    Manual,
}

impl QuoteSource {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Live => "Live",
            Self::Manual => "Manual",
        }
    }
}

/// A validated market observation: spot price and FX rate, both positive
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MarketQuote {
    spot_price_usd_per_oz: Decimal,
    fx_rate: Decimal,
    observed_at: DateTime<Utc>,
    source: QuoteSource,
}

impl MarketQuote {
    pub fn new(
        spot_price_usd_per_oz: Decimal,
        fx_rate: Decimal,
        observed_at: DateTime<Utc>,
        source: QuoteSource,
    ) -> Result<Self> {
        if spot_price_usd_per_oz <= Decimal::ZERO {
            return Err(ValuationError::InvalidQuote(format!(
                "spot price must be positive, got {spot_price_usd_per_oz}"
            )));
        }
        if fx_rate <= Decimal::ZERO {
            return Err(ValuationError::InvalidQuote(format!(
                "exchange rate must be positive, got {fx_rate}"
            )));
        }
        Ok(Self {
            spot_price_usd_per_oz,
            fx_rate,
            observed_at,
            source,
        })
    }

    /// Build from raw feed numbers; NaN and infinities are rejected
    pub fn from_f64(
        spot_price_usd_per_oz: f64,
        fx_rate: f64,
        observed_at: DateTime<Utc>,
        source: QuoteSource,
    ) -> Result<Self> {
        Self::new(
            decimal_from_f64("spot price", spot_price_usd_per_oz)?,
            decimal_from_f64("exchange rate", fx_rate)?,
            observed_at,
            source,
        )
    }

    pub const fn spot_price_usd_per_oz(&self) -> Decimal {
        self.spot_price_usd_per_oz
    }

    pub const fn fx_rate(&self) -> Decimal {
        self.fx_rate
    }

    pub const fn observed_at(&self) -> DateTime<Utc> {
        self.observed_at
    }

    pub const fn source(&self) -> QuoteSource {
        self.source
    }
}

fn decimal_from_f64(field: &str, value: f64) -> Result<Decimal> {
    if !value.is_finite() {
        return Err(ValuationError::InvalidQuote(format!("{field} is not a finite number")));
    }
    Decimal::try_from(value)
        .map_err(|e| ValuationError::InvalidQuote(format!("{field} out of range: {e}")))
}

/// Bank buy-back discount range, in percentage points (0.44 means 0.44%)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct DiscountBand {
    min: Decimal,
    max: Decimal,
    chosen: Decimal,
}

impl DiscountBand {
    /// Create a band; requires `0 <= min <= chosen <= max <= 100`
    pub fn new(min: Decimal, max: Decimal, chosen: Decimal) -> Result<Self> {
        let hundred = Decimal::ONE_HUNDRED;
        if min < Decimal::ZERO || min > chosen || chosen > max || max > hundred {
            return Err(ValuationError::InvalidDiscountBand { min, chosen, max });
        }
        Ok(Self { min, max, chosen })
    }

    /// Same limits, different chosen discount
    pub fn with_chosen(&self, chosen: Decimal) -> Result<Self> {
        Self::new(self.min, self.max, chosen)
    }

    pub const fn min(&self) -> Decimal {
        self.min
    }

    pub const fn max(&self) -> Decimal {
        self.max
    }

    pub const fn chosen(&self) -> Decimal {
        self.chosen
    }
}

/// Profit or loss, both rounded to two decimals
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profit {
    /// Absolute amount in local currency
    pub absolute: Decimal,

    /// Percentage relative to the buy price
    pub percent: Decimal,
}

impl Profit {
    pub fn is_gain(&self) -> bool {
        self.percent > Decimal::ZERO
    }
}

/// Recommendation derived from simulated value vs original investment
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Hold,
    ConsiderSell,
}

impl Decision {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Hold => "Hold",
            Self::ConsiderSell => "Consider Sell",
        }
    }
}

/// Everything derived from one (holding, quote, band) evaluation
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ValuationResult {
    /// Converted spot price, local currency per gram (unrounded)
    pub spot_price_local_per_gram: Decimal,

    /// Discount applied for the simulated sale
    pub discount_used: Decimal,

    /// Sell price per gram at the chosen discount
    pub simulated_sell_price: Decimal,

    /// Worst-case sell price per gram (largest discount)
    pub min_sell_price: Decimal,

    /// Best-case sell price per gram (smallest discount)
    pub max_sell_price: Decimal,

    pub total_value: Decimal,
    pub min_total_value: Decimal,
    pub max_total_value: Decimal,
    pub original_value: Decimal,

    pub profit: Profit,
    pub min_profit: Profit,
    pub max_profit: Profit,

    pub decision: Decision,
}
