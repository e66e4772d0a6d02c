//! Serde and parsing helpers for NUMERIC(30,18) amounts.
//!
//! Amounts are `BigDecimal` end to end so every value the column can hold
//! (30 significant digits) round-trips without rounding.

use bigdecimal::BigDecimal;
use serde::{Serialize, Serializer};
use std::str::FromStr;

pub const MAX_DIGITS: i64 = 30;
pub const DECIMAL_PLACES: i64 = 18;
const MAX_WHOLE_DIGITS: i64 = MAX_DIGITS - DECIMAL_PLACES;

/// Plain decimal text with trailing zeros dropped ("5.8", "0", "1000").
pub fn to_plain_string(value: &BigDecimal) -> String {
    let normalized = value.normalized();
    let (_, scale) = normalized.as_bigint_and_exponent();
    if scale < 0 {
        normalized.with_scale(0).to_string()
    } else {
        normalized.to_string()
    }
}

/// Used with #[serde(serialize_with = "crate::utils::decimal::serialize")].
pub fn serialize<S>(value: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    to_plain_string(value).serialize(serializer)
}

/// Parse an amount from a request body. Accepts a JSON string or number.
/// Errors are user-facing messages.
pub fn parse_json(value: &serde_json::Value) -> Result<BigDecimal, String> {
    match value {
        serde_json::Value::String(s) => parse_str(s),
        serde_json::Value::Number(n) => parse_str(&n.to_string()),
        serde_json::Value::Null => Err("This field may not be null.".to_string()),
        _ => Err("A valid number is required.".to_string()),
    }
}

/// Parse a decimal from text and check it fits NUMERIC(30,18).
pub fn parse_str(raw: &str) -> Result<BigDecimal, String> {
    let value = BigDecimal::from_str(raw.trim())
        .map_err(|_| "A valid number is required.".to_string())?;
    check_precision(value)
}

/// Reject values the column would round or overflow. Checks run on the
/// exact parsed digits, before any rescaling.
fn check_precision(value: BigDecimal) -> Result<BigDecimal, String> {
    let value = value.normalized();
    let (digits, scale) = value.as_bigint_and_exponent();
    if scale > DECIMAL_PLACES {
        return Err(format!(
            "Ensure that there are no more than {} decimal places.",
            DECIMAL_PLACES
        ));
    }

    let magnitude = digits.magnitude().to_string();
    let whole = if magnitude == "0" {
        0
    } else {
        (magnitude.len() as i64 - scale).max(0)
    };
    if whole > MAX_WHOLE_DIGITS {
        return Err(format!(
            "Ensure that there are no more than {} digits before the decimal point.",
            MAX_WHOLE_DIGITS
        ));
    }
    Ok(value)
}
