//! # Position Types
//!
//! Inputs and results of the position solver. Every value here is produced
//! per call and never stored.

use crate::errors::{ClmmError, CoreResult};
use crate::math::units::format_units;
use crate::types::{Liquidity, Price, SqrtPriceX96, Tick, TokenAmount};

/// Where the current price sits relative to a range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "client", serde(rename_all = "snake_case"))]
pub enum RangePosition {
    /// current <= lower, the position is all token0
    BelowRange,
    /// lower < current < upper
    InRange,
    /// current >= upper, the position is all token1
    AboveRange,
}

/// Token whose budget determined the liquidity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "client", serde(rename_all = "snake_case"))]
pub enum BindingToken {
    Token0,
    Token1,
}

/// Price range and token budgets for a new position
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
pub struct PositionRequest {
    pub price_current: Price,
    pub price_lower: Price,
    pub price_upper: Price,
    /// Token0 budget in base units
    pub budget0: TokenAmount,
    /// Token1 budget in base units
    pub budget1: TokenAmount,
}

impl PositionRequest {
    pub fn new(
        price_current: Price,
        price_lower: Price,
        price_upper: Price,
        budget0: TokenAmount,
        budget1: TokenAmount,
    ) -> Self {
        Self {
            price_current,
            price_lower,
            price_upper,
            budget0,
            budget1,
        }
    }

    /// Check that all prices are positive and finite and `lower < upper`
    pub fn validate_range(&self) -> CoreResult<()> {
        for price in [self.price_current, self.price_lower, self.price_upper] {
            if !(price.is_finite() && price > 0.0) {
                return Err(ClmmError::InvalidArgument("price must be positive and finite"));
            }
        }
        if self.price_lower >= self.price_upper {
            return Err(ClmmError::InvalidArgument("price_lower must be below price_upper"));
        }
        Ok(())
    }

    /// Check `lower < current < upper` and that both budgets are positive
    pub fn validate_in_range(&self) -> CoreResult<()> {
        self.validate_range()?;
        if !(self.price_lower < self.price_current && self.price_current < self.price_upper) {
            return Err(ClmmError::InvalidArgument(
                "price_current must lie strictly between price_lower and price_upper",
            ));
        }
        if self.budget0 == 0 {
            return Err(ClmmError::InvalidArgument("token0 budget must be positive"));
        }
        if self.budget1 == 0 {
            return Err(ClmmError::InvalidArgument("token1 budget must be positive"));
        }
        Ok(())
    }
}

/// Result of solving a position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(serde::Serialize))]
pub struct PositionQuote {
    // Informational ticks
    pub tick_current: Tick,
    pub tick_lower: Tick,
    pub tick_upper: Tick,

    // Q64.96 prices the arithmetic ran on
    pub sqrt_price_current: SqrtPriceX96,
    pub sqrt_price_lower: SqrtPriceX96,
    pub sqrt_price_upper: SqrtPriceX96,

    pub range_position: RangePosition,

    /// Liquidity the token0 budget alone could fund, `None` when token0 is not consumed
    pub liquidity0: Option<Liquidity>,
    /// Liquidity the token1 budget alone could fund, `None` when token1 is not consumed
    pub liquidity1: Option<Liquidity>,
    /// Binding (smallest) candidate
    pub liquidity: Liquidity,
    pub binding: BindingToken,

    pub budget0: TokenAmount,
    pub budget1: TokenAmount,

    /// Token0 actually consumed by `liquidity`
    pub amount0: TokenAmount,
    /// Token1 actually consumed by `liquidity`
    pub amount1: TokenAmount,
}

impl PositionQuote {
    /// Unused token0 budget
    pub fn shortfall0(&self) -> TokenAmount {
        self.budget0.saturating_sub(self.amount0)
    }

    /// Unused token1 budget
    pub fn shortfall1(&self) -> TokenAmount {
        self.budget1.saturating_sub(self.amount1)
    }

    pub fn fits_budgets(&self) -> bool {
        self.amount0 <= self.budget0 && self.amount1 <= self.budget1
    }

    /// Consumed token0 as a decimal string
    pub fn amount0_units(&self, decimals: u8) -> String {
        format_units(self.amount0, decimals)
    }

    /// Consumed token1 as a decimal string
    pub fn amount1_units(&self, decimals: u8) -> String {
        format_units(self.amount1, decimals)
    }
}
