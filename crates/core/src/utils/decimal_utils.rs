use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::constants::EARNINGS_DISPLAY_PRECISION;
use crate::errors::{Error, Result, ValidationError};

/// Rounds a fully-accumulated figure for display (4 dp, half away from zero).
///
/// Only final results are rounded; sums are always accumulated at full
/// precision first.
pub fn round_for_display(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(
        EARNINGS_DISPLAY_PRECISION,
        RoundingStrategy::MidpointAwayFromZero,
    )
}

/// Parses a user supplied amount such as `"25"`, `"-10.5"` or `"1e2"`.
pub fn parse_amount(raw: &str) -> Result<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::missing_field("amount"));
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|e| Error::Validation(ValidationError::DecimalParse(e)))
}
