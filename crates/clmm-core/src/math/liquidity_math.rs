//! # Liquidity Math
//!
//! Liquidity derived from a single token amount and a sqrt price range.
//! Results are floored exactly once, so the derived liquidity never needs
//! more of the committed token than was supplied.

use ethnum::U256;

use crate::constants::{Q96_U256, RESOLUTION, U160_MAX};
use crate::errors::{ClmmError, CoreResult};
use crate::math::big_int::{mul_div, mul_div_rem, u256_to_u128, Rounding};
use crate::types::{Liquidity, SqrtPriceX96, TokenAmount};

/// Order a range ascending, rejecting zero-width, zero-priced and
/// wider-than-160-bit bounds
pub(crate) fn ordered_range(
    sqrt_price_a: SqrtPriceX96,
    sqrt_price_b: SqrtPriceX96,
) -> CoreResult<(SqrtPriceX96, SqrtPriceX96)> {
    let (lower, upper) = SqrtPriceX96::ordered(sqrt_price_a, sqrt_price_b);
    if lower == upper {
        return Err(ClmmError::InvalidArgument("zero-width price range"));
    }
    if lower.is_zero() {
        return Err(ClmmError::InvalidArgument("sqrt price must be positive"));
    }
    if upper.raw() > U160_MAX {
        return Err(ClmmError::InvalidArgument("sqrt price exceeds 160 bits"));
    }
    Ok((lower, upper))
}

/// Calculate liquidity for a given amount of token0
///
/// L = amount0 * sqrt_a * sqrt_b / (Q96 * (sqrt_b - sqrt_a))
///
/// The sqrt price product is split into quotient and remainder over the
/// denominator so the 448-bit numerator is floored once.
pub fn liquidity_from_token0(
    amount0: TokenAmount,
    sqrt_price_a: SqrtPriceX96,
    sqrt_price_b: SqrtPriceX96,
) -> CoreResult<Liquidity> {
    let (lower, upper) = ordered_range(sqrt_price_a, sqrt_price_b)?;

    // Below 2^256 since both bounds fit in 160 bits
    let denominator = (upper.raw() - lower.raw()) << RESOLUTION;
    let (quotient, remainder) = mul_div_rem(lower.raw(), upper.raw(), denominator)?;

    let amount0 = U256::new(amount0);
    let whole = amount0
        .checked_mul(quotient)
        .ok_or(ClmmError::MathOverflow)?;
    let fraction = mul_div(amount0, remainder, denominator, Rounding::Down)?;
    let liquidity = whole
        .checked_add(fraction)
        .ok_or(ClmmError::MathOverflow)?;

    u256_to_u128(liquidity)
}

/// Calculate liquidity for a given amount of token1
///
/// L = amount1 * Q96 / (sqrt_b - sqrt_a)
pub fn liquidity_from_token1(
    amount1: TokenAmount,
    sqrt_price_a: SqrtPriceX96,
    sqrt_price_b: SqrtPriceX96,
) -> CoreResult<Liquidity> {
    let (lower, upper) = ordered_range(sqrt_price_a, sqrt_price_b)?;

    let liquidity = mul_div(
        U256::new(amount1),
        Q96_U256,
        upper.raw() - lower.raw(),
        Rounding::Down,
    )?;

    u256_to_u128(liquidity)
}
