//! # Tick Math
//!
//! Conversions between prices, ticks and Q64.96 sqrt prices.
//!
//! Two families live here:
//! - float conversions (`price_to_tick`, `tick_to_price`) used when callers
//!   start from human prices
//! - exact integer conversions (`sqrt_ratio_at_tick`, `tick_at_sqrt_ratio`)
//!   with the same results as the on-chain Uniswap V3 TickMath library

use ethnum::U256;
use tracing::debug;

use crate::constants::{
    FEE_HIGH, FEE_LOWEST, FEE_MEDIUM, MAX_SQRT_RATIO, MAX_TICK, MIN_SQRT_RATIO, MIN_TICK,
    Q128_U256, TICK_BASE, TICK_SPACING_HIGH, TICK_SPACING_LOWEST, TICK_SPACING_MEDIUM,
};
use crate::errors::{ClmmError, CoreResult};
use crate::types::{Price, SqrtPriceX96, Tick};

/// sqrt(1.0001)^-(2^i) in Q128, for i in 0..20
const MAGIC_SQRT_RATIOS: [u128; 20] = [
    0xfffcb933bd6fad37aa2d162d1a594001,
    0xfff97272373d413259a46990580e213a,
    0xfff2e50f5f656932ef12357cf3c7fdcc,
    0xffe5caca7e10e4e61c3624eaa0941cd0,
    0xffcb9843d60f6159c9db58835c926644,
    0xff973b41fa98c081472e6896dfb254c0,
    0xff2ea16466c96a3843ec78b326b52861,
    0xfe5dee046a99a2a811c461f1969c3053,
    0xfcbe86c7900a88aedcffc83b479aa3a4,
    0xf987a7253ac413176f2b074cf7815e54,
    0xf3392b0822b70005940c7a398e4b70f3,
    0xe7159475a2c29b7443b29c7fa6e889d9,
    0xd097f3bdfd2022b8845ad8f792aa5825,
    0xa9f746462d870fdf8a65dc1f90e061e5,
    0x70d869a156d2a1b890bb3df62baf32f7,
    0x31be135f97d08fd981231505542fcfa6,
    0x9aa508b5b7a84e1c677de54f3e99bc9,
    0x5d6af8dedb81196699c329225ee604,
    0x2216e584f5fa1ea926041bedfe98,
    0x48a170391f7dc42444e8fa2,
];

/// Float error never moves the log estimate by more than a step or two
const MAX_CORRECTION_STEPS: usize = 4;

// ============================================================================
// Validation
// ============================================================================

/// Check if a tick is within the supported range
pub fn is_tick_valid(tick: Tick) -> bool {
    (MIN_TICK..=MAX_TICK).contains(&tick)
}

/// Fail with `OutOfRange` for ticks outside [MIN_TICK, MAX_TICK]
pub fn check_tick(tick: Tick) -> CoreResult<Tick> {
    if is_tick_valid(tick) {
        Ok(tick)
    } else {
        Err(ClmmError::OutOfRange(tick))
    }
}

// ============================================================================
// Price <-> Tick (floating point)
// ============================================================================

/// 1.0001^tick without range validation
#[inline]
fn raw_price_at_tick(tick: i64) -> f64 {
    TICK_BASE.powf(tick as f64)
}

/// Convert a tick to its price: 1.0001^tick
pub fn tick_to_price(tick: Tick) -> CoreResult<Price> {
    check_tick(tick)?;
    Ok(raw_price_at_tick(tick as i64))
}

/// Convert a price to the greatest tick whose price does not exceed it
///
/// The log-based estimate is only a starting point. The result is verified
/// against `tick_to_price(tick) <= price < tick_to_price(tick + 1)` so that
/// estimates landing on the wrong side of an integer are corrected.
pub fn price_to_tick(price: Price) -> CoreResult<Tick> {
    if price.is_nan() || price <= 0.0 {
        return Err(ClmmError::InvalidArgument("price must be positive"));
    }
    if price.is_infinite() {
        return Err(ClmmError::InvalidArgument("price must be finite"));
    }

    let estimate = (price.ln() / TICK_BASE.ln()).floor();
    let lowest = (MIN_TICK - 1) as f64;
    let highest = (MAX_TICK + 1) as f64;
    if estimate < lowest {
        return Err(ClmmError::OutOfRange(MIN_TICK - 1));
    }
    if estimate > highest {
        return Err(ClmmError::OutOfRange(MAX_TICK + 1));
    }

    let initial = estimate as i64;
    let mut tick = initial;
    for _ in 0..MAX_CORRECTION_STEPS {
        if raw_price_at_tick(tick) > price {
            tick -= 1;
        } else if raw_price_at_tick(tick + 1) <= price {
            tick += 1;
        } else {
            break;
        }
    }

    if raw_price_at_tick(tick) > price || raw_price_at_tick(tick + 1) <= price {
        return Err(ClmmError::InternalError("tick boundary correction did not converge"));
    }
    if tick != initial {
        debug!(price, estimate = initial, corrected = tick, "corrected float tick estimate");
    }

    let tick = i32::try_from(tick).map_err(|_| ClmmError::ConversionError)?;
    check_tick(tick)
}

// ============================================================================
// Tick <-> Sqrt Price (exact integer)
// ============================================================================

/// Get sqrt(1.0001^tick) * 2^96, rounded up
pub fn sqrt_ratio_at_tick(tick: Tick) -> CoreResult<SqrtPriceX96> {
    check_tick(tick)?;

    let abs_tick = tick.unsigned_abs();
    let mut ratio = if abs_tick & 0x1 != 0 {
        U256::new(MAGIC_SQRT_RATIOS[0])
    } else {
        Q128_U256
    };

    // Binary decomposition of the tick using the magic constants
    for (i, magic) in MAGIC_SQRT_RATIOS.iter().enumerate().skip(1) {
        if abs_tick & (1 << i) != 0 {
            ratio = (ratio * U256::new(*magic)) >> 128u32;
        }
    }

    // Constants encode negative powers; invert for positive ticks
    if tick > 0 {
        ratio = U256::MAX / ratio;
    }

    // Q128 -> Q96, rounding up so the tick of the result is exact
    let round_up = if ratio & U256::new(0xffff_ffff) != U256::ZERO {
        U256::ONE
    } else {
        U256::ZERO
    };
    Ok(SqrtPriceX96::from_raw((ratio >> 32u32) + round_up))
}

/// Get the greatest tick whose sqrt ratio is <= `sqrt_price`
pub fn tick_at_sqrt_ratio(sqrt_price: SqrtPriceX96) -> CoreResult<Tick> {
    let raw = sqrt_price.raw();
    if raw < MIN_SQRT_RATIO || raw >= MAX_SQRT_RATIO {
        return Err(ClmmError::InvalidArgument("sqrt price outside [MIN_SQRT_RATIO, MAX_SQRT_RATIO)"));
    }

    let mut low = MIN_TICK;
    let mut high = MAX_TICK;
    while low < high {
        let mid = low + (high - low + 1) / 2;
        if sqrt_ratio_at_tick(mid)? <= sqrt_price {
            low = mid;
        } else {
            high = mid - 1;
        }
    }

    Ok(low)
}

// ============================================================================
// Tick Spacing
// ============================================================================

/// Standard fee tiers and their tick spacings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeeTier {
    /// 0.05%
    Lowest,
    /// 0.30%
    Medium,
    /// 1.00%
    High,
}

impl FeeTier {
    /// Look up a tier by its fee in hundredths of a basis point
    pub fn from_fee(fee: u32) -> CoreResult<Self> {
        match fee {
            FEE_LOWEST => Ok(Self::Lowest),
            FEE_MEDIUM => Ok(Self::Medium),
            FEE_HIGH => Ok(Self::High),
            _ => Err(ClmmError::InvalidArgument("unknown fee tier")),
        }
    }

    pub fn fee(&self) -> u32 {
        match self {
            Self::Lowest => FEE_LOWEST,
            Self::Medium => FEE_MEDIUM,
            Self::High => FEE_HIGH,
        }
    }

    pub fn tick_spacing(&self) -> i32 {
        match self {
            Self::Lowest => TICK_SPACING_LOWEST,
            Self::Medium => TICK_SPACING_MEDIUM,
            Self::High => TICK_SPACING_HIGH,
        }
    }
}

fn check_spacing(tick_spacing: i32) -> CoreResult<()> {
    if tick_spacing <= 0 {
        return Err(ClmmError::InvalidArgument("tick spacing must be positive"));
    }
    Ok(())
}

/// Whether `tick` lies on the spacing grid
pub fn is_tick_aligned(tick: Tick, tick_spacing: i32) -> CoreResult<bool> {
    check_spacing(tick_spacing)?;
    Ok(tick.rem_euclid(tick_spacing) == 0)
}

/// Greatest usable tick <= `tick` (floors toward negative infinity)
pub fn align_tick_down(tick: Tick, tick_spacing: i32) -> CoreResult<Tick> {
    check_spacing(tick_spacing)?;
    check_tick(tick)?;
    let aligned = tick - tick.rem_euclid(tick_spacing);
    check_tick(aligned)
}

/// Least usable tick >= `tick`
pub fn align_tick_up(tick: Tick, tick_spacing: i32) -> CoreResult<Tick> {
    check_spacing(tick_spacing)?;
    check_tick(tick)?;
    let remainder = tick.rem_euclid(tick_spacing);
    let aligned = if remainder == 0 {
        tick
    } else {
        tick - remainder + tick_spacing
    };
    check_tick(aligned)
}

/// Lowest tick on the spacing grid inside the valid range
pub fn min_usable_tick(tick_spacing: i32) -> CoreResult<Tick> {
    check_spacing(tick_spacing)?;
    Ok((MIN_TICK / tick_spacing) * tick_spacing)
}

/// Highest tick on the spacing grid inside the valid range
pub fn max_usable_tick(tick_spacing: i32) -> CoreResult<Tick> {
    check_spacing(tick_spacing)?;
    Ok((MAX_TICK / tick_spacing) * tick_spacing)
}
