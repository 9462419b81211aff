use crate::model::Cell;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Coerce a cell to a number. Never fails: anything that does not parse
/// becomes `None`.
///
/// Accepts plain decimals ("12", "-3.5", ".5") and scientific notation
/// ("1e3") after trimming whitespace. Thousands separators, units and
/// currency symbols are not stripped.
pub fn coerce_numeric(cell: &Cell) -> Option<Decimal> {
    match cell {
        Cell::Number(n) => Some(*n),
        Cell::Missing => None,
        Cell::Text(s) => parse_number(s),
    }
}

fn parse_number(s: &str) -> Option<Decimal> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}
