//! Valuation Configuration
//!
//! Injectable constants: target currency, fallback FX rate, discount band
//! limits, the troy-ounce constant and feed settings.

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ValuationError};
use crate::model::DiscountBand;
use crate::valuation::{UnitConverter, GRAMS_PER_TROY_OUNCE};

pub const DEFAULT_SPOT_PRICE_URL: &str = "https://api.gold-api.com/price/XAU";
pub const DEFAULT_FX_RATE_URL: &str = "https://open.er-api.com/v6/latest/USD";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValuationConfig {
    /// ISO code of the single local currency (e.g. "TWD")
    pub currency: String,

    /// Rate used when the FX feed fails
    pub usd_to_local_fallback: Decimal,

    /// Smallest bank buy-back discount (%)
    pub discount_min: Decimal,

    /// Largest bank buy-back discount (%)
    pub discount_max: Decimal,

    /// Discount preselected when the caller gives none (%)
    pub discount_default: Decimal,

    pub grams_per_troy_ounce: Decimal,

    /// Offset used when displaying timestamps
    pub utc_offset_hours: i32,

    pub spot_price_url: String,
    pub fx_rate_url: String,
    pub http_timeout_secs: u64,

    /// Spot price (USD/oz) served when the public feeds are bypassed
    pub offline_spot_price: Decimal,
}

impl Default for ValuationConfig {
    fn default() -> Self {
        Self {
            currency: "TWD".into(),
            usd_to_local_fallback: dec!(33.07),
            discount_min: dec!(0.12),
            discount_max: dec!(1.16),
            discount_default: dec!(0.44),
            grams_per_troy_ounce: GRAMS_PER_TROY_OUNCE,
            utc_offset_hours: 8,
            spot_price_url: DEFAULT_SPOT_PRICE_URL.into(),
            fx_rate_url: DEFAULT_FX_RATE_URL.into(),
            http_timeout_secs: 10,
            offline_spot_price: dec!(3063.48),
        }
    }
}

impl ValuationConfig {
    /// Read `GOLD_*` environment variables, keeping defaults for unset ones
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unparseable values are an error
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            currency: lookup("GOLD_CURRENCY")
                .map_or(defaults.currency, |c| c.trim().to_uppercase()),
            usd_to_local_fallback: parse_or(&lookup, "GOLD_FX_FALLBACK", defaults.usd_to_local_fallback)?,
            discount_min: parse_or(&lookup, "GOLD_DISCOUNT_MIN", defaults.discount_min)?,
            discount_max: parse_or(&lookup, "GOLD_DISCOUNT_MAX", defaults.discount_max)?,
            discount_default: parse_or(&lookup, "GOLD_DISCOUNT_DEFAULT", defaults.discount_default)?,
            grams_per_troy_ounce: parse_or(&lookup, "GOLD_GRAMS_PER_OZ", defaults.grams_per_troy_ounce)?,
            utc_offset_hours: parse_or(&lookup, "GOLD_UTC_OFFSET_HOURS", defaults.utc_offset_hours)?,
            spot_price_url: lookup("GOLD_SPOT_PRICE_URL").unwrap_or(defaults.spot_price_url),
            fx_rate_url: lookup("GOLD_FX_RATE_URL").unwrap_or(defaults.fx_rate_url),
            http_timeout_secs: parse_or(&lookup, "GOLD_HTTP_TIMEOUT_SECS", defaults.http_timeout_secs)?,
            offline_spot_price: parse_or(&lookup, "GOLD_OFFLINE_SPOT", defaults.offline_spot_price)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.currency.is_empty() {
            return Err(ValuationError::Config("currency must not be empty".into()));
        }
        if self.usd_to_local_fallback <= Decimal::ZERO {
            return Err(ValuationError::Config(format!(
                "fallback exchange rate must be positive, got {}",
                self.usd_to_local_fallback
            )));
        }
        if self.offline_spot_price <= Decimal::ZERO {
            return Err(ValuationError::Config(format!(
                "offline spot price must be positive, got {}",
                self.offline_spot_price
            )));
        }
        if !(-12..=14).contains(&self.utc_offset_hours) {
            return Err(ValuationError::Config(format!(
                "UTC offset {} is out of range",
                self.utc_offset_hours
            )));
        }
        self.default_band()?;
        self.converter()?;
        Ok(())
    }

    /// Band with the configured limits and default discount
    pub fn default_band(&self) -> Result<DiscountBand> {
        DiscountBand::new(self.discount_min, self.discount_max, self.discount_default)
    }

    /// Band with the configured limits and a caller-chosen discount
    pub fn band(&self, chosen: Option<Decimal>) -> Result<DiscountBand> {
        DiscountBand::new(
            self.discount_min,
            self.discount_max,
            chosen.unwrap_or(self.discount_default),
        )
    }

    pub fn converter(&self) -> Result<UnitConverter> {
        UnitConverter::new(self.grams_per_troy_ounce)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| ValuationError::Config(format!("{key}={raw}: {e}"))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ValuationConfig::default();
        assert!(config.validate().is_ok());
        let band = config.default_band().unwrap();
        assert_eq!(band.min(), dec!(0.12));
        assert_eq!(band.max(), dec!(1.16));
        assert_eq!(band.chosen(), dec!(0.44));
        assert_eq!(config.usd_to_local_fallback, dec!(33.07));
    }

    #[test]
    fn test_overrides() {
        let config = ValuationConfig::from_lookup(lookup_from(&[
            ("GOLD_CURRENCY", " usd "),
            ("GOLD_DISCOUNT_MAX", "2.5"),
            ("GOLD_UTC_OFFSET_HOURS", "-5"),
        ]))
        .unwrap();
        assert_eq!(config.currency, "USD");
        assert_eq!(config.discount_max, dec!(2.5));
        assert_eq!(config.utc_offset_hours, -5);
        assert_eq!(config.discount_min, dec!(0.12));
    }

    #[test]
    fn test_unparseable_value_is_error() {
        let err = ValuationConfig::from_lookup(lookup_from(&[("GOLD_FX_FALLBACK", "abc")])).unwrap_err();
        assert!(matches!(err, ValuationError::Config(_)));
    }

    #[test]
    fn test_inconsistent_discounts_rejected() {
        let err = ValuationConfig::from_lookup(lookup_from(&[("GOLD_DISCOUNT_DEFAULT", "5")])).unwrap_err();
        assert!(matches!(err, ValuationError::InvalidDiscountBand { .. }));
    }

    #[test]
    fn test_offline_spot_price() {
        assert_eq!(ValuationConfig::default().offline_spot_price, dec!(3063.48));

        let config = ValuationConfig::from_lookup(lookup_from(&[("GOLD_OFFLINE_SPOT", "2950.10")])).unwrap();
        assert_eq!(config.offline_spot_price, dec!(2950.10));

        let err = ValuationConfig::from_lookup(lookup_from(&[("GOLD_OFFLINE_SPOT", "0")])).unwrap_err();
        assert!(matches!(err, ValuationError::Config(_)));
    }

    #[test]
    fn test_band_with_chosen() {
        let config = ValuationConfig::default();
        assert_eq!(config.band(None).unwrap().chosen(), dec!(0.44));
        assert_eq!(config.band(Some(dec!(1.0))).unwrap().chosen(), dec!(1.0));
        assert!(config.band(Some(dec!(3))).is_err());
    }
}
