//! # Protocol Constants
//!
//! Fundamental constants for concentrated liquidity math including:
//! - Fixed-point scale factors (Q96, Q128)
//! - Tick bounds and the matching sqrt price bounds
//! - Fee tier tick spacings
//! - Token base-unit scales

use ethnum::U256;

// ============================================================================
// Mathematical Constants
// ============================================================================

/// Number of fractional bits in the Q64.96 sqrt price format
pub const RESOLUTION: u32 = 96;

/// Q96 fixed-point scale factor: 2^96
pub const Q96: u128 = 1u128 << RESOLUTION;

/// Q96 as a 256-bit value for wide intermediates
pub const Q96_U256: U256 = U256::new(Q96);

/// Q128 scale factor: 2^128 (does not fit in u128)
pub const Q128_U256: U256 = U256::from_words(1, 0);

/// Largest value a Q64.96 sqrt price may occupy (uint160)
pub const U160_MAX: U256 = U256::from_words(u32::MAX as u128, u128::MAX);

// ============================================================================
// Tick Constants
// ============================================================================

/// Base of the tick/price exponential: price(tick) = 1.0001^tick
pub const TICK_BASE: f64 = 1.0001;

/// Minimum valid tick
pub const MIN_TICK: i32 = -887_272;

/// Maximum valid tick
pub const MAX_TICK: i32 = 887_272;

/// Sqrt price at MIN_TICK in Q64.96
pub const MIN_SQRT_RATIO: U256 = U256::new(4_295_128_739);

/// Sqrt price at MAX_TICK in Q64.96
/// 1461446703485210103287273052203988822378723970342
pub const MAX_SQRT_RATIO: U256 =
    U256::from_words(0xfffd8963, 0xefd1fc6a506488495d951d5263988d26);

// ============================================================================
// Fee Tier Constants
// ============================================================================

/// 0.05% fee tier, hundredths of a basis point
pub const FEE_LOWEST: u32 = 500;

/// 0.30% fee tier
pub const FEE_MEDIUM: u32 = 3_000;

/// 1.00% fee tier
pub const FEE_HIGH: u32 = 10_000;

pub const TICK_SPACING_LOWEST: i32 = 10;
pub const TICK_SPACING_MEDIUM: i32 = 60;
pub const TICK_SPACING_HIGH: i32 = 200;

// ============================================================================
// Token Unit Constants
// ============================================================================

/// Decimals used by ETH-like tokens
pub const DEFAULT_TOKEN_DECIMALS: u8 = 18;

/// One whole 18-decimal token in base units (1 ETH = 10^18 wei)
pub const ETH: u128 = 1_000_000_000_000_000_000;

/// Largest decimals value whose scale 10^decimals fits in u128
pub const MAX_TOKEN_DECIMALS: u8 = 38;
