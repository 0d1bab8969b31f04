//! Discount Band Simulator
//!
//! A larger discount always means a lower sell price, so the band's `max`
//! discount yields the worst-case (minimum) sell price and vice versa.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::model::DiscountBand;

/// Sell prices per gram implied by a discount band
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SellPrices {
    /// At the chosen discount
    pub simulated: Decimal,

    /// At the band's largest discount
    pub min: Decimal,

    /// At the band's smallest discount
    pub max: Decimal,
}

/// Price after the bank takes `discount_pct` percent off
pub fn sell_price(spot_price_local_per_gram: Decimal, discount_pct: Decimal) -> Decimal {
    spot_price_local_per_gram * (Decimal::ONE - discount_pct / Decimal::ONE_HUNDRED)
}

pub fn simulate(spot_price_local_per_gram: Decimal, band: &DiscountBand) -> SellPrices {
    SellPrices {
        simulated: sell_price(spot_price_local_per_gram, band.chosen()),
        min: sell_price(spot_price_local_per_gram, band.max()),
        max: sell_price(spot_price_local_per_gram, band.min()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_inverted_mapping() {
        let band = DiscountBand::new(dec!(1), dec!(10), dec!(5)).unwrap();
        let prices = simulate(dec!(1000), &band);
        assert_eq!(prices.simulated, dec!(950));
        assert_eq!(prices.min, dec!(900));
        assert_eq!(prices.max, dec!(990));
    }

    #[test]
    fn test_ordering_holds_across_bands() {
        let bands = [
            (dec!(0.12), dec!(1.16), dec!(0.44)),
            (dec!(0), dec!(100), dec!(0)),
            (dec!(0), dec!(100), dec!(100)),
            (dec!(2.5), dec!(7.5), dec!(7.5)),
            (dec!(0.01), dec!(0.02), dec!(0.015)),
        ];
        for (min, max, chosen) in bands {
            let band = DiscountBand::new(min, max, chosen).unwrap();
            let prices = simulate(dec!(3257.1666), &band);
            assert!(prices.min <= prices.simulated, "{band:?}");
            assert!(prices.simulated <= prices.max, "{band:?}");
        }
    }

    #[test]
    fn test_degenerate_band() {
        let band = DiscountBand::new(dec!(0.44), dec!(0.44), dec!(0.44)).unwrap();
        let prices = simulate(dec!(3257.17), &band);
        assert_eq!(prices.simulated, prices.min);
        assert_eq!(prices.simulated, prices.max);
    }

    #[test]
    fn test_full_discount() {
        assert_eq!(sell_price(dec!(3257.17), dec!(100)), Decimal::ZERO);
        assert_eq!(sell_price(dec!(3257.17), Decimal::ZERO), dec!(3257.17));
    }
}
