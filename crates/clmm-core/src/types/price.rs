//! # Price Types
//!
//! Scalar aliases and the Q64.96 sqrt price newtype.

use std::fmt;

use ethnum::U256;

use crate::constants::{MAX_SQRT_RATIO, MIN_SQRT_RATIO, Q96_U256};
use crate::errors::CoreResult;

/// Units of token1 per unit of token0, always > 0
pub type Price = f64;

/// Discrete price index, price = 1.0001^tick
pub type Tick = i32;

/// Liquidity L of a position (x * y = L^2 within its range)
pub type Liquidity = u128;

/// Token quantity in the token's smallest integral unit
pub type TokenAmount = u128;

/// sqrt(price) * 2^96 stored as an unsigned integer
///
/// Values up to 2^160 occur inside the valid tick range, so the inner
/// representation is 256 bits wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SqrtPriceX96(U256);

impl SqrtPriceX96 {
    /// sqrt price of 1.0
    pub const ONE: Self = Self(Q96_U256);

    /// sqrt price at MIN_TICK
    pub const MIN: Self = Self(MIN_SQRT_RATIO);

    /// sqrt price at MAX_TICK
    pub const MAX: Self = Self(MAX_SQRT_RATIO);

    /// Wrap a raw Q64.96 value
    pub const fn from_raw(raw: U256) -> Self {
        Self(raw)
    }

    /// Wrap a raw Q64.96 value that fits in u128
    pub const fn from_u128(raw: u128) -> Self {
        Self(U256::new(raw))
    }

    /// Raw Q64.96 integer
    pub const fn raw(&self) -> U256 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == U256::ZERO
    }

    /// Convert a price to its floored Q64.96 sqrt price
    pub fn from_price(price: Price) -> CoreResult<Self> {
        crate::math::fixed_point::to_sqrt_q96(price)
    }

    /// Convert back to a floating-point price
    pub fn to_price(&self) -> Price {
        crate::math::fixed_point::from_sqrt_q96(*self)
    }

    /// Order two sqrt prices ascending
    pub fn ordered(a: Self, b: Self) -> (Self, Self) {
        if a > b {
            (b, a)
        } else {
            (a, b)
        }
    }
}

impl From<U256> for SqrtPriceX96 {
    fn from(raw: U256) -> Self {
        Self(raw)
    }
}

impl From<SqrtPriceX96> for U256 {
    fn from(sqrt_price: SqrtPriceX96) -> Self {
        sqrt_price.0
    }
}

impl fmt::Display for SqrtPriceX96 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

// Serialized as a decimal string, JSON numbers cannot carry 160 bits
#[cfg(feature = "client")]
impl serde::Serialize for SqrtPriceX96 {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

#[cfg(feature = "client")]
impl<'de> serde::Deserialize<'de> for SqrtPriceX96 {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = <String as serde::Deserialize>::deserialize(deserializer)?;
        U256::from_str_radix(text.trim(), 10)
            .map(Self)
            .map_err(serde::de::Error::custom)
    }
}
