//! Decision Engine

use rust_decimal::Decimal;

use crate::model::Decision;

/// Hold while the simulated value is below what was paid; ties favor selling.
pub fn decide(total_value: Decimal, original_value: Decimal) -> Decision {
    if total_value < original_value {
        Decision::Hold
    } else {
        Decision::ConsiderSell
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_decide() {
        assert_eq!(decide(dec!(998793.22), dec!(1002232.00)), Decision::Hold);
        assert_eq!(decide(dec!(1002232.01), dec!(1002232.00)), Decision::ConsiderSell);
    }

    #[test]
    fn test_tie_considers_selling() {
        for x in [Decimal::ZERO, dec!(0.01), dec!(1002232.00), dec!(-5)] {
            assert_eq!(decide(x, x), Decision::ConsiderSell);
        }
    }
}
