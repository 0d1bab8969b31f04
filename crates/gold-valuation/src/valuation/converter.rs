//! Unit Converter
//!
//! USD per troy ounce into local currency per gram.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::{Result, ValuationError};
use crate::model::{checked_div, checked_mul};

/// Grams in one troy ounce
pub const GRAMS_PER_TROY_OUNCE: Decimal = dec!(31.1035);

/// Converts spot quotes using an injectable troy-ounce constant
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnitConverter {
    grams_per_troy_ounce: Decimal,
}

impl Default for UnitConverter {
    fn default() -> Self {
        Self {
            grams_per_troy_ounce: GRAMS_PER_TROY_OUNCE,
        }
    }
}

impl UnitConverter {
    pub fn new(grams_per_troy_ounce: Decimal) -> Result<Self> {
        if grams_per_troy_ounce <= Decimal::ZERO {
            return Err(ValuationError::Config(format!(
                "grams per troy ounce must be positive, got {grams_per_troy_ounce}"
            )));
        }
        Ok(Self { grams_per_troy_ounce })
    }

    pub const fn grams_per_troy_ounce(&self) -> Decimal {
        self.grams_per_troy_ounce
    }

    /// `spot * fx / grams_per_troy_ounce`, unrounded
    pub fn to_local_per_gram(&self, spot_price_usd_per_oz: Decimal, fx_rate: Decimal) -> Result<Decimal> {
        if spot_price_usd_per_oz <= Decimal::ZERO || fx_rate <= Decimal::ZERO {
            return Err(ValuationError::InvalidQuote(format!(
                "spot price ({spot_price_usd_per_oz}) and exchange rate ({fx_rate}) must be positive"
            )));
        }
        let per_ounce = checked_mul(spot_price_usd_per_oz, fx_rate, "local spot price")?;
        checked_div(per_ounce, self.grams_per_troy_ounce, "local spot price")
    }
}
