//! # Scalar Parsing
//!
//! Turns untrusted strings into validated, range-checked domain values.
//! Everything here is a pure function; the errors are the specific
//! [`JobCalcError`](crate::error::JobCalcError) variants, never a silent
//! coercion.
//!
//! ## Accepted forms
//! ```text
//! parse_currency    "500"  "12.34"  "$1,302.20"      (>= 0, <= 2 decimals)
//! parse_percentage  "10"  "8.25"  "10%"  "0.5"       (0-100, <= 2 decimals)
//! parse_hours       "10"  "10.5"                     (>= 0, <= 2 decimals)
//! parse_bool        "1" "true" "yes" "on"  /  "0" "false" "no" "off"
//! ```

use crate::error::{CalcResult, JobCalcError};
use crate::money::{Currency, Hours};
use crate::percent::{Percentage, MAX_PERCENT_BPS};

// =============================================================================
// Scaled Decimal Parsing
// =============================================================================

/// Parses a decimal string into an integer scaled by `10^scale`.
///
/// At most `scale` fractional digits are accepted; more digits are rejected
/// rather than rounded, so no precision is ever silently dropped. The sign
/// is preserved so callers can raise their own negative-value errors.
pub(crate) fn parse_scaled(raw: &str, scale: u32) -> CalcResult<i64> {
    let invalid = || JobCalcError::InvalidNumber(raw.to_string());

    let trimmed = raw.trim();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };

    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, f),
        None => (digits, ""),
    };

    if int_part.is_empty() && frac_part.is_empty() {
        return Err(invalid());
    }
    if !int_part.bytes().all(|b| b.is_ascii_digit())
        || !frac_part.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(invalid());
    }
    if frac_part.len() > scale as usize {
        return Err(invalid());
    }

    let whole: i64 = if int_part.is_empty() {
        0
    } else {
        int_part.parse().map_err(|_| invalid())?
    };
    let mut frac: i64 = if frac_part.is_empty() {
        0
    } else {
        frac_part.parse().map_err(|_| invalid())?
    };
    for _ in frac_part.len()..scale as usize {
        frac *= 10;
    }

    let value = whole
        .checked_mul(10_i64.pow(scale))
        .and_then(|v| v.checked_add(frac))
        .ok_or_else(invalid)?;

    Ok(if negative { -value } else { value })
}

// =============================================================================
// Domain Value Parsers
// =============================================================================

/// Parses a currency amount: optional leading `$`, optional comma grouping,
/// up to two fractional digits.
///
/// Negative input fails with `NegativeAmount`; non-numeric input fails with
/// `InvalidNumber`.
pub fn parse_currency(raw: &str) -> CalcResult<Currency> {
    let mut stripped = raw.trim().to_string();
    stripped.retain(|c| c != ',');
    let stripped = stripped.strip_prefix('$').unwrap_or(&stripped);

    let cents = parse_scaled(stripped, 2).map_err(|_| JobCalcError::InvalidNumber(raw.to_string()))?;
    if cents < 0 {
        return Err(JobCalcError::NegativeAmount(raw.to_string()));
    }
    Ok(Currency::from_cents(cents))
}

/// Parses a percentage in the inclusive 0-100 range: optional trailing `%`,
/// up to two fractional digits (basis-point resolution).
///
/// A numeric value outside the range fails with `PercentageOutOfRange`;
/// non-numeric input fails with `InvalidNumber`.
pub fn parse_percentage(raw: &str) -> CalcResult<Percentage> {
    let trimmed = raw.trim();
    let stripped = trimmed.strip_suffix('%').unwrap_or(trimmed);

    let bps = parse_scaled(stripped, 2).map_err(|_| JobCalcError::InvalidNumber(raw.to_string()))?;
    if bps < 0 || bps > MAX_PERCENT_BPS as i64 {
        return Err(JobCalcError::PercentageOutOfRange(raw.to_string()));
    }
    Ok(Percentage::from_bps(bps as u32))
}

/// Parses an hour count, up to two fractional digits.
pub fn parse_hours(raw: &str) -> CalcResult<Hours> {
    let hundredths = parse_scaled(raw, 2)?;
    if hundredths < 0 {
        return Err(JobCalcError::NegativeAmount(raw.to_string()));
    }
    Ok(Hours::from_hundredths(hundredths))
}

/// Parses a boolean-like string from a fixed token set, case-insensitively.
///
/// Truthy: `1`, `true`, `yes`, `on`. Falsy: `0`, `false`, `no`, `off`.
/// Anything else fails with `InvalidBool`.
pub fn parse_bool(raw: &str) -> CalcResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(JobCalcError::InvalidBool(raw.to_string())),
    }
}

/// Splits a multi-value user string on `separator`, trimming each item and
/// dropping empty ones. An all-blank input yields an empty vec.
pub fn parse_input_string(raw: &str, separator: &str) -> Vec<String> {
    raw.split(separator)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

// =============================================================================
// Flatten
// =============================================================================

/// Flattens a sequence of sequences into one ordered sequence.
///
/// Purely structural: no validation or conversion happens here. Used to
/// combine value batches from multiple sources (flags, env, prompts) while
/// preserving their declared order.
pub fn flatten<I, T>(nested: I) -> Vec<T>
where
    I: IntoIterator,
    I::Item: IntoIterator<Item = T>,
{
    nested.into_iter().flatten().collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
