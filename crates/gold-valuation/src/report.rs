//! Valuation Report
//!
//! Plain-text rendering of an [`Evaluation`] for dashboards and logs.
//! Everything here is formatting; no figure is recomputed.

use chrono::{DateTime, FixedOffset, Offset, Utc};
use rust_decimal::Decimal;

use crate::model::{round_money, Profit};
use crate::session::Evaluation;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct ValuationReport<'a> {
    evaluation: &'a Evaluation,
    currency: &'a str,
    offset: FixedOffset,
}

impl<'a> ValuationReport<'a> {
    /// `utc_offset_hours` outside +/-23 falls back to UTC
    pub fn new(evaluation: &'a Evaluation, currency: &'a str, utc_offset_hours: i32) -> Self {
        Self {
            evaluation,
            currency,
            offset: fixed_offset(utc_offset_hours),
        }
    }

    /// One `label: value` line per figure
    pub fn lines(&self) -> Vec<(String, String)> {
        let r = &self.evaluation.result;
        let q = &self.evaluation.quote;
        let cur = self.currency;

        vec![
            ("Last Updated".into(), format_timestamp(q.observed_at(), self.offset)),
            ("Conversion Rate".into(), format!("1 USD = {:.4} {cur}", q.fx_rate())),
            ("Mode".into(), q.source().label().into()),
            ("Spot Price (USD/oz)".into(), format!("{:.2}", round_money(q.spot_price_usd_per_oz()))),
            (format!("Spot Price ({cur}/g)"), format!("{:.2}", round_money(r.spot_price_local_per_gram))),
            ("Discount Used".into(), format!("{:.2}%", r.discount_used)),
            ("Simulated Sell Price".into(), format!("{:.2} {cur}/g", round_money(r.simulated_sell_price))),
            (
                "Sell Price Range".into(),
                format!(
                    "[{:.2} {cur}/g] ~ [{:.2} {cur}/g]",
                    round_money(r.min_sell_price),
                    round_money(r.max_sell_price)
                ),
            ),
            (
                "Profit / Loss".into(),
                format!("{} {cur} ({})", format_money(r.profit.absolute), format_percent_delta(&r.profit)),
            ),
            (
                "Profit Range".into(),
                format!(
                    "[{} {cur}] ~ [{} {cur}]",
                    format_money(r.min_profit.absolute),
                    format_money(r.max_profit.absolute)
                ),
            ),
            ("Total Market Value".into(), format!("{} {cur}", format_money(r.total_value))),
            (
                "Value Range".into(),
                format!(
                    "[{} {cur}] ~ [{} {cur}]",
                    format_money(r.min_total_value),
                    format_money(r.max_total_value)
                ),
            ),
            ("Original Investment".into(), format!("{} {cur}", format_money(r.original_value))),
            ("Decision".into(), r.decision.label().into()),
        ]
    }

    pub fn render(&self) -> String {
        let mut s = String::from("Gold Investment Valuation\n");
        for (label, value) in self.lines() {
            s.push_str(&format!("  {label}: {value}\n"));
        }
        s
    }
}

/// Two decimals with thousands separators: `-1234567.891 -> -1,234,567.89`
pub fn format_money(value: Decimal) -> String {
    let rounded = round_money(value);
    // avoid "-0.00"
    let rounded = if rounded.is_zero() { Decimal::ZERO } else { rounded };
    let text = format!("{rounded:.2}");
    let (sign, digits) = text
        .strip_prefix('-')
        .map_or(("", text.as_str()), |rest| ("-", rest));
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}{grouped}.{frac_part}")
}

/// `▲ 1.25%` for gains, `🔻 -0.34%` otherwise
pub fn format_percent_delta(profit: &Profit) -> String {
    let arrow = if profit.is_gain() { "▲" } else { "🔻" };
    format!("{arrow} {:.2}%", profit.percent)
}

pub fn format_timestamp(at: DateTime<Utc>, offset: FixedOffset) -> String {
    at.with_timezone(&offset).format(TIMESTAMP_FORMAT).to_string()
}

/// Convert an RFC 2822 GMT string (as found in RSS `pubDate`) to local time.
///
/// Unparseable input is returned unchanged.
pub fn convert_gmt_to_local(gmt: &str, utc_offset_hours: i32) -> String {
    DateTime::parse_from_rfc2822(gmt.trim()).map_or_else(
        |_| gmt.to_string(),
        |parsed| format_timestamp(parsed.with_timezone(&Utc), fixed_offset(utc_offset_hours)),
    )
}

fn fixed_offset(hours: i32) -> FixedOffset {
    hours
        .checked_mul(3600)
        .and_then(FixedOffset::east_opt)
        .unwrap_or_else(|| Utc.fix())
}
