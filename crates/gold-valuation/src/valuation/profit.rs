//! Profit Calculator

use rust_decimal::Decimal;

use crate::error::{Result, ValuationError};
use crate::model::{checked_div, checked_mul, round_money, Profit};

/// Profit of selling `weight` grams at `sell_price` after buying at `buy_price`.
///
/// Fails as a whole with `DivisionByZero` when `buy_price` is zero; no
/// absolute figure is returned on its own. Figures beyond `Decimal`'s range
/// fail with `Overflow` the same way.
pub fn profit(buy_price: Decimal, weight: Decimal, sell_price: Decimal) -> Result<Profit> {
    if buy_price.is_zero() {
        return Err(ValuationError::DivisionByZero);
    }
    let diff = sell_price
        .checked_sub(buy_price)
        .ok_or(ValuationError::Overflow("profit"))?;
    let absolute = checked_mul(diff, weight, "profit")?;
    let ratio = checked_div(diff, buy_price, "profit percentage")?;
    let percent = checked_mul(ratio, Decimal::ONE_HUNDRED, "profit percentage")?;
    Ok(Profit {
        absolute: round_money(absolute),
        percent: round_money(percent),
    })
}
