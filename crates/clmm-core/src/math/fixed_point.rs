//! # Fixed-Point Conversions
//!
//! Q64.96 sqrt price conversions to and from floating-point prices.
//!
//! Rounding policy: `to_sqrt_q96` floors. The product `sqrt(price) * 2^96` is
//! evaluated in f64 and the resulting f64 is converted to an integer exactly
//! from its IEEE-754 bits, so the only truncation is the final floor.

use ethnum::U256;

use crate::constants::{Q96, U160_MAX};
use crate::errors::{ClmmError, CoreResult};
use crate::types::{Price, SqrtPriceX96};

const F64_MANTISSA_BITS: u32 = 52;
const F64_EXPONENT_BIAS: i32 = 1075;

// ============================================================================
// Float <-> Wide Integer Conversion
// ============================================================================

/// Floor a finite, non-negative f64 into a U256 without intermediate rounding
pub fn f64_to_u256_floor(value: f64) -> CoreResult<U256> {
    if !value.is_finite() || value < 0.0 {
        return Err(ClmmError::InvalidArgument("value must be finite and non-negative"));
    }

    let bits = value.to_bits();
    let biased_exponent = ((bits >> F64_MANTISSA_BITS) & 0x7ff) as i32;
    if biased_exponent == 0 {
        // Zero or subnormal, both below 1
        return Ok(U256::ZERO);
    }

    let mantissa = (bits & ((1u64 << F64_MANTISSA_BITS) - 1)) | (1u64 << F64_MANTISSA_BITS);
    // value == mantissa * 2^exponent
    let exponent = biased_exponent - F64_EXPONENT_BIAS;

    if exponent >= 0 {
        if exponent > (256 - F64_MANTISSA_BITS as i32 - 1) {
            return Err(ClmmError::MathOverflow);
        }
        Ok(U256::from(mantissa) << exponent as u32)
    } else if exponent <= -(F64_MANTISSA_BITS as i32 + 1) {
        Ok(U256::ZERO)
    } else {
        Ok(U256::from(mantissa >> (-exponent) as u32))
    }
}

/// Convert a U256 to the nearest representable f64 (approximately)
pub fn u256_to_f64(value: U256) -> f64 {
    let (hi, lo) = value.into_words();
    (hi as f64) * 2f64.powi(128) + (lo as f64)
}

// ============================================================================
// Q64.96 Sqrt Price Conversion
// ============================================================================

/// Convert a price to `floor(sqrt(price) * 2^96)`
pub fn to_sqrt_q96(price: Price) -> CoreResult<SqrtPriceX96> {
    if price.is_nan() || price <= 0.0 {
        return Err(ClmmError::InvalidArgument("price must be positive"));
    }
    if price.is_infinite() {
        return Err(ClmmError::InvalidArgument("price must be finite"));
    }

    let scaled = price.sqrt() * (Q96 as f64);
    let raw = f64_to_u256_floor(scaled)
        .map_err(|_| ClmmError::InvalidArgument("price exceeds the Q64.96 range"))?;

    if raw == U256::ZERO {
        return Err(ClmmError::InvalidArgument("price is below the Q64.96 resolution"));
    }
    if raw > U160_MAX {
        return Err(ClmmError::InvalidArgument("price exceeds the Q64.96 range"));
    }

    Ok(SqrtPriceX96::from_raw(raw))
}

/// Convert a Q64.96 sqrt price back to a price: `(sqrtp / 2^96)^2`
pub fn from_sqrt_q96(sqrt_price: SqrtPriceX96) -> Price {
    let sqrt = u256_to_f64(sqrt_price.raw()) / (Q96 as f64);
    sqrt * sqrt
}
