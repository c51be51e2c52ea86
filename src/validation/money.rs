use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Keeps digits, thousands separators and the first decimal point.
pub fn sanitize_money_input(raw: &str) -> String {
    let mut seen_point = false;
    raw.chars()
        .filter(|c| match c {
            '0'..='9' | ',' => true,
            '.' if !seen_point => {
                seen_point = true;
                true
            }
            _ => false,
        })
        .collect()
}

/// Parses a monetary input after stripping thousands separators.
pub fn parse_money(raw: &str) -> Option<Decimal> {
    let stripped: String = raw.chars().filter(|c| *c != ',' && !c.is_whitespace()).collect();
    if stripped.is_empty() {
        return None;
    }
    Decimal::from_str(&stripped).ok()
}

/// Keeps at most two decimal digits, dropping the rest.
pub fn truncate_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::ToZero)
}

/// Blur-time correction: truncate to cents, then pull into `[min, max]`.
pub fn clamp_money(value: Decimal, min: Decimal, max: Decimal) -> Decimal {
    truncate_cents(value).clamp(min, max)
}

/// `qty × unit_cost` rounded to cents, or `None` when the product overflows.
pub fn derived_total(qty: u32, unit_cost: Decimal) -> Option<Decimal> {
    Decimal::from(qty)
        .checked_mul(unit_cost)
        .map(|total| total.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

/// Live total for a form: zero until both factors parse and multiply.
pub fn live_total(qty_raw: &str, unit_cost_raw: &str) -> Decimal {
    match (qty_raw.trim().parse::<u32>().ok(), parse_money(unit_cost_raw)) {
        (Some(qty), Some(cost)) => derived_total(qty, cost).unwrap_or(Decimal::ZERO),
        _ => Decimal::ZERO,
    }
}

/// Two decimals with thousands separators, e.g. `1,806.00`.
pub fn format_money(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let plain = format!("{:.2}", rounded.abs());
    let (whole, cents) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{}{}.{}", if negative { "-" } else { "" }, grouped, cents)
}
