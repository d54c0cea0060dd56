//! Conversions between stored TEXT columns and domain values.
//!
//! Money is persisted as decimal text so that no precision is lost between
//! writes. Rows written by older tooling may hold floats in scientific
//! notation, which are still accepted on read.

use std::str::FromStr;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

/// Parses stored decimal text, accepting scientific notation and plain floats.
pub fn try_parse_decimal(value_str: &str) -> Option<Decimal> {
    let trimmed = value_str.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
        .or_else(|| f64::from_str(trimmed).ok().and_then(Decimal::from_f64))
}

/// Like [`try_parse_decimal`] for required columns: unparseable text reads as
/// zero and is logged.
pub fn parse_decimal_tolerant(value_str: &str, field_name: &str) -> Decimal {
    match try_parse_decimal(value_str) {
        Some(d) => d,
        None => {
            log::error!(
                "Failed to parse {} '{}' as a decimal. Falling back to ZERO.",
                field_name,
                value_str
            );
            Decimal::ZERO
        }
    }
}

/// Nullable money columns: blank or unparseable text reads as missing.
pub fn parse_optional_decimal(value: Option<&str>, field_name: &str) -> Option<Decimal> {
    let raw = value.filter(|s| !s.trim().is_empty())?;
    let parsed = try_parse_decimal(raw);
    if parsed.is_none() {
        log::warn!("Ignoring unparseable {} '{}'", field_name, raw);
    }
    parsed
}

/// Canonical text form for a decimal column.
pub fn decimal_to_text(value: Decimal) -> String {
    value.normalize().to_string()
}
