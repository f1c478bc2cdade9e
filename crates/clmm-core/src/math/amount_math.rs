//! # Amount Math
//!
//! Token amounts a position of liquidity L holds over a sqrt price range.
//!
//! amount0 = L * (sqrt_b - sqrt_a) / (sqrt_a * sqrt_b)
//! amount1 = L * (sqrt_b - sqrt_a)
//!
//! The `*_for_liquidity` variants floor. The `*_delta` variants take an
//! explicit rounding mode for callers that need the amount owed rather than
//! the amount held.

use ethnum::U256;

use crate::constants::{Q96_U256, RESOLUTION};
use crate::errors::{ClmmError, CoreResult};
use crate::math::big_int::{div_rounding, mul_div, u256_to_u128, Rounding};
use crate::types::{Liquidity, SqrtPriceX96, TokenAmount};

/// Amount of token0 spanned by `liquidity` between two sqrt prices
pub fn amount0_delta(
    liquidity: Liquidity,
    sqrt_price_a: SqrtPriceX96,
    sqrt_price_b: SqrtPriceX96,
    rounding: Rounding,
) -> CoreResult<TokenAmount> {
    let (lower, upper) = SqrtPriceX96::ordered(sqrt_price_a, sqrt_price_b);
    if lower == upper {
        return Ok(0);
    }
    if lower.is_zero() {
        return Err(ClmmError::InvalidArgument("sqrt price must be positive"));
    }

    let numerator1 = U256::new(liquidity) << RESOLUTION;
    let numerator2 = upper.raw() - lower.raw();

    let scaled = mul_div(numerator1, numerator2, upper.raw(), rounding)?;
    let amount = div_rounding(scaled, lower.raw(), rounding)?;

    u256_to_u128(amount)
}

/// Amount of token1 spanned by `liquidity` between two sqrt prices
pub fn amount1_delta(
    liquidity: Liquidity,
    sqrt_price_a: SqrtPriceX96,
    sqrt_price_b: SqrtPriceX96,
    rounding: Rounding,
) -> CoreResult<TokenAmount> {
    let (lower, upper) = SqrtPriceX96::ordered(sqrt_price_a, sqrt_price_b);
    if lower == upper {
        return Ok(0);
    }

    let amount = mul_div(
        U256::new(liquidity),
        upper.raw() - lower.raw(),
        Q96_U256,
        rounding,
    )?;

    u256_to_u128(amount)
}

/// Token0 held by `liquidity` over the range, floored
pub fn amount0_for_liquidity(
    liquidity: Liquidity,
    sqrt_price_a: SqrtPriceX96,
    sqrt_price_b: SqrtPriceX96,
) -> CoreResult<TokenAmount> {
    amount0_delta(liquidity, sqrt_price_a, sqrt_price_b, Rounding::Down)
}

/// Token1 held by `liquidity` over the range, floored
pub fn amount1_for_liquidity(
    liquidity: Liquidity,
    sqrt_price_a: SqrtPriceX96,
    sqrt_price_b: SqrtPriceX96,
) -> CoreResult<TokenAmount> {
    amount1_delta(liquidity, sqrt_price_a, sqrt_price_b, Rounding::Down)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::Q96;
    use crate::math::fixed_point::to_sqrt_q96;

    fn sqrt(price: f64) -> SqrtPriceX96 {
        to_sqrt_q96(price).unwrap()
    }

    #[test]
    fn test_reference_amounts() {
        let lower = sqrt(4545.0);
        let current = sqrt(5000.0);
        let upper = sqrt(5500.0);
        let liquidity = 1_517_882_343_751_509_783_892;

        assert_eq!(
            amount0_for_liquidity(liquidity, current, upper).unwrap(),
            998_976_618_347_425_273
        );
        assert_eq!(
            amount1_for_liquidity(liquidity, lower, current).unwrap(),
            4_999_999_999_999_999_999_999
        );
    }

    #[test]
    fn test_one_unit_of_liquidity() {
        let lower = sqrt(4545.0);
        let current = sqrt(5000.0);
        let upper = sqrt(5500.0);

        assert_eq!(amount0_for_liquidity(1, current, upper).unwrap(), 0);
        assert_eq!(amount1_for_liquidity(1, lower, current).unwrap(), 3);
    }

    #[test]
    fn test_zero_width_range_holds_nothing() {
        let p = sqrt(5000.0);
        assert_eq!(amount0_for_liquidity(1_000_000, p, p).unwrap(), 0);
        assert_eq!(amount1_for_liquidity(1_000_000, p, p).unwrap(), 0);
    }

    #[test]
    fn test_simple_ranges() {
        let lower = SqrtPriceX96::from_u128(Q96);
        let upper = SqrtPriceX96::from_u128(2 * Q96);

        // amount1 = L * (2 - 1), amount0 = L * (2 - 1) / (1 * 2)
        assert_eq!(amount1_for_liquidity(1_000, lower, upper).unwrap(), 1_000);
        assert_eq!(amount0_for_liquidity(1_000, lower, upper).unwrap(), 500);
        assert_eq!(amount0_for_liquidity(1_001, upper, lower).unwrap(), 500);
    }

    #[test]
    fn test_rounding_up_covers_rounding_down() {
        let lower = sqrt(4545.0);
        let upper = sqrt(5500.0);
        for liquidity in [1u128, 7, 1_000_003, 1_517_882_343_751_509_783_892] {
            let down0 = amount0_delta(liquidity, lower, upper, Rounding::Down).unwrap();
            let up0 = amount0_delta(liquidity, lower, upper, Rounding::Up).unwrap();
            assert!(up0 >= down0 && up0 - down0 <= 1);

            let down1 = amount1_delta(liquidity, lower, upper, Rounding::Down).unwrap();
            let up1 = amount1_delta(liquidity, lower, upper, Rounding::Up).unwrap();
            assert!(up1 >= down1 && up1 - down1 <= 1);
        }
    }

    #[test]
    fn test_zero_lower_bound_rejected_for_token0() {
        let upper = SqrtPriceX96::ONE;
        assert!(matches!(
            amount0_for_liquidity(1, SqrtPriceX96::from_u128(0), upper),
            Err(ClmmError::InvalidArgument(_))
        ));
    }
}
