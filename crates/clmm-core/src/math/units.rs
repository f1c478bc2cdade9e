//! # Token Units
//!
//! Conversion between base-unit token amounts and human-readable decimal
//! strings. Parsing and formatting are exact; only `to_display_f64` is lossy.

use crate::errors::{ClmmError, CoreResult};
use crate::types::TokenAmount;

/// 10^decimals as a base-unit scale
pub fn decimals_scale(decimals: u8) -> CoreResult<u128> {
    10u128
        .checked_pow(u32::from(decimals))
        .ok_or(ClmmError::MathOverflow)
}

/// Render a base-unit amount as a decimal string, trailing zeros trimmed
///
/// `format_units(1_500_000_000_000_000_000, 18) == "1.5"`
pub fn format_units(amount: TokenAmount, decimals: u8) -> String {
    let digits = amount.to_string();
    let decimals = usize::from(decimals);
    if decimals == 0 {
        return digits;
    }

    let padded = if digits.len() <= decimals {
        format!("{}{}", "0".repeat(decimals + 1 - digits.len()), digits)
    } else {
        digits
    };

    let (whole, fraction) = padded.split_at(padded.len() - decimals);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{}.{}", whole, fraction)
    }
}

/// Parse a decimal string into base units
///
/// Accepts `"12"`, `"12.5"` and `".5"`. Fractional digits beyond `decimals`
/// are rejected unless they are zeros.
pub fn parse_units(text: &str, decimals: u8) -> CoreResult<TokenAmount> {
    let text = text.trim();
    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (text, ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return Err(ClmmError::InvalidArgument("empty token amount"));
    }
    let is_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if !is_digits(whole) || !is_digits(fraction) {
        return Err(ClmmError::InvalidArgument("token amount must be a plain decimal number"));
    }

    let fraction = fraction.trim_end_matches('0');
    if fraction.len() > usize::from(decimals) {
        return Err(ClmmError::InvalidArgument("too many fractional digits for token decimals"));
    }

    let scale = decimals_scale(decimals)?;
    // fraction.len() <= decimals, so this cannot fail once `scale` exists
    let fraction_scale = decimals_scale(decimals - fraction.len() as u8)?;

    let whole_units = parse_digits(whole)?
        .checked_mul(scale)
        .ok_or(ClmmError::MathOverflow)?;
    let fraction_units = parse_digits(fraction)?
        .checked_mul(fraction_scale)
        .ok_or(ClmmError::MathOverflow)?;

    whole_units
        .checked_add(fraction_units)
        .ok_or(ClmmError::MathOverflow)
}

fn parse_digits(digits: &str) -> CoreResult<u128> {
    digits.bytes().try_fold(0u128, |acc, b| {
        acc.checked_mul(10)
            .and_then(|acc| acc.checked_add(u128::from(b - b'0')))
            .ok_or(ClmmError::MathOverflow)
    })
}

/// Approximate amount in whole tokens, for display only
pub fn to_display_f64(amount: TokenAmount, decimals: u8) -> f64 {
    amount as f64 / 10f64.powi(i32::from(decimals))
}
