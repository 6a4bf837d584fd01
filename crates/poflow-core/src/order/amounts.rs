//! Amount, rate and quantity parsing for line-item cells.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::Cell;

/// Round a money amount to two decimal places, halves away from zero.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Parse a plain decimal number, accepting scientific notation.
pub fn parse_decimal(s: &str) -> Option<Decimal> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

/// Numeric value of a cell; text goes through `parse_text`.
fn cell_value(cell: &Cell, parse_text: impl Fn(&str) -> Option<Decimal>) -> Option<Decimal> {
    match cell {
        Cell::Number(n) if n.is_finite() => parse_decimal(&n.to_string()),
        Cell::Number(_) => None,
        Cell::Text(s) => parse_text(s),
        Cell::Empty => None,
    }
}

/// Parse an amount such as `"1,234.50"`; commas are thousands separators.
pub fn parse_amount(cell: &Cell) -> Option<Decimal> {
    cell_value(cell, |s| parse_decimal(&s.replace(',', "")))
}

/// Parse a percentage such as `"2.5%"` into `2.5`.
pub fn parse_rate(cell: &Cell) -> Option<Decimal> {
    cell_value(cell, |s| parse_decimal(&s.replace('%', "")))
}

/// Parse the grand total, e.g. `"INR 1234.50"`.
///
/// The currency code and all whitespace are removed; thousands separators are not.
pub fn parse_grand_total(cell: &Cell, currency: &str) -> Option<Decimal> {
    cell_value(cell, |s| {
        let stripped = if currency.is_empty() {
            s.to_string()
        } else {
            s.replace(currency, "")
        };
        let compact: String = stripped.chars().filter(|c| !c.is_whitespace()).collect();
        parse_decimal(&compact)
    })
}

/// Parse a whole-number quantity. Fractional quantities are rejected.
pub fn parse_quantity(cell: &Cell) -> Option<u32> {
    match cell {
        Cell::Number(n) if n.fract() == 0.0 => Decimal::from_str(&n.to_string()).ok()?.to_u32(),
        Cell::Number(_) => None,
        Cell::Text(s) => s.trim().parse().ok(),
        Cell::Empty => None,
    }
}
