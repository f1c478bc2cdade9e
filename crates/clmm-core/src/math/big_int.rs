//! Big integer operations for high-precision math
//!
//! `mul_div` keeps the full 512-bit product of two `U256` operands so that
//! expressions like `amount * sqrt_a * sqrt_b / Q96` never lose bits before
//! the final division.

use ethnum::U256;

use crate::errors::{ClmmError, CoreResult};

/// Rounding mode for division operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
pub enum Rounding {
    /// Round down (towards zero)
    Down,
    /// Round up (away from zero)
    Up,
}

/// Multiply two u128 values into a U256 (never overflows)
#[inline]
pub fn mul_u128_to_u256(a: u128, b: u128) -> U256 {
    U256::new(a) * U256::new(b)
}

/// Full 256x256 -> 512 bit multiplication, returned as (hi, lo)
pub fn widening_mul(a: U256, b: U256) -> (U256, U256) {
    let (a1, a0) = a.into_words();
    let (b1, b0) = b.into_words();

    let p00 = mul_u128_to_u256(a0, b0);
    let p01 = mul_u128_to_u256(a0, b1);
    let p10 = mul_u128_to_u256(a1, b0);
    let p11 = mul_u128_to_u256(a1, b1);

    let (lo, carry1) = p00.overflowing_add(p01 << 128u32);
    let (lo, carry2) = lo.overflowing_add(p10 << 128u32);

    // Cannot overflow: the full product is below 2^512
    let hi = p11
        + (p01 >> 128u32)
        + (p10 >> 128u32)
        + U256::new(carry1 as u128)
        + U256::new(carry2 as u128);

    (hi, lo)
}

/// Divide the 512-bit value (hi, lo) by `denominator`, returning
/// (quotient, remainder). Requires `hi < denominator` so the quotient fits.
fn div_rem_512(hi: U256, lo: U256, denominator: U256) -> CoreResult<(U256, U256)> {
    if denominator == U256::ZERO {
        return Err(ClmmError::DivisionByZero);
    }
    if hi >= denominator {
        return Err(ClmmError::MathOverflow);
    }
    if hi == U256::ZERO {
        return Ok((lo / denominator, lo % denominator));
    }

    // Restoring long division, one bit of `lo` at a time
    let mut remainder = hi;
    let mut quotient = U256::ZERO;
    for bit in (0..256u32).rev() {
        let carry = (remainder >> 255u32) == U256::ONE;
        remainder = (remainder << 1u32) | ((lo >> bit) & U256::ONE);
        quotient <<= 1u32;
        if carry || remainder >= denominator {
            remainder = remainder.wrapping_sub(denominator);
            quotient |= U256::ONE;
        }
    }

    Ok((quotient, remainder))
}

/// Multiply two values and divide by a third with specified rounding
/// result = (a * b) / denominator
pub fn mul_div(
    a: U256,
    b: U256,
    denominator: U256,
    rounding: Rounding,
) -> CoreResult<U256> {
    let (hi, lo) = widening_mul(a, b);
    let (quotient, remainder) = div_rem_512(hi, lo, denominator)?;

    if rounding == Rounding::Up && remainder != U256::ZERO {
        return quotient.checked_add(U256::ONE).ok_or(ClmmError::MathOverflow);
    }

    Ok(quotient)
}

/// (a * b) / denominator, floored, together with the remainder
pub fn mul_div_rem(a: U256, b: U256, denominator: U256) -> CoreResult<(U256, U256)> {
    let (hi, lo) = widening_mul(a, b);
    div_rem_512(hi, lo, denominator)
}

/// Divide with rounding
pub fn div_rounding(numerator: U256, denominator: U256, rounding: Rounding) -> CoreResult<U256> {
    if denominator == U256::ZERO {
        return Err(ClmmError::DivisionByZero);
    }
    let quotient = numerator / denominator;
    if rounding == Rounding::Up && numerator % denominator != U256::ZERO {
        return quotient.checked_add(U256::ONE).ok_or(ClmmError::MathOverflow);
    }
    Ok(quotient)
}

/// Narrow a U256 into u128
pub fn u256_to_u128(value: U256) -> CoreResult<u128> {
    let (hi, lo) = value.into_words();
    if hi != 0 {
        return Err(ClmmError::MathOverflow);
    }
    Ok(lo)
}

/// Multiply two u128 values and divide by a third with specified rounding
pub fn mul_div_u128(
    a: u128,
    b: u128,
    denominator: u128,
    rounding: Rounding,
) -> CoreResult<u128> {
    let result = mul_div(U256::new(a), U256::new(b), U256::new(denominator), rounding)?;
    u256_to_u128(result)
}
