//! # Range Regimes
//!
//! Where the current price sits relative to a range decides which tokens a
//! position holds. Each regime keeps its own liquidity and amount formulas.

use tracing::trace;

use crate::errors::{ClmmError, CoreResult};
use crate::math::amount_math::{amount0_for_liquidity, amount1_for_liquidity};
use crate::math::liquidity_math::{liquidity_from_token0, liquidity_from_token1, ordered_range};
use crate::types::{BindingToken, Liquidity, RangePosition, SqrtPriceX96, TokenAmount};

/// A range classified against the current sqrt price
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regime {
    /// current <= lower: only token0 is held
    BelowRange {
        sqrt_price_lower: SqrtPriceX96,
        sqrt_price_upper: SqrtPriceX96,
    },
    /// lower < current < upper: both tokens are held
    InRange {
        sqrt_price_lower: SqrtPriceX96,
        sqrt_price_current: SqrtPriceX96,
        sqrt_price_upper: SqrtPriceX96,
    },
    /// current >= upper: only token1 is held
    AboveRange {
        sqrt_price_lower: SqrtPriceX96,
        sqrt_price_upper: SqrtPriceX96,
    },
}

/// Liquidity candidates of a regime and the one that binds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiquidityCandidates {
    pub liquidity0: Option<Liquidity>,
    pub liquidity1: Option<Liquidity>,
    pub liquidity: Liquidity,
    pub binding: BindingToken,
}

impl Regime {
    /// Classify a range (bounds in any order) against the current sqrt price
    pub fn classify(
        sqrt_price_current: SqrtPriceX96,
        sqrt_price_a: SqrtPriceX96,
        sqrt_price_b: SqrtPriceX96,
    ) -> CoreResult<Self> {
        let (sqrt_price_lower, sqrt_price_upper) = ordered_range(sqrt_price_a, sqrt_price_b)?;
        if sqrt_price_current.is_zero() {
            return Err(ClmmError::InvalidArgument("sqrt price must be positive"));
        }

        let regime = if sqrt_price_current <= sqrt_price_lower {
            Self::BelowRange {
                sqrt_price_lower,
                sqrt_price_upper,
            }
        } else if sqrt_price_current >= sqrt_price_upper {
            Self::AboveRange {
                sqrt_price_lower,
                sqrt_price_upper,
            }
        } else {
            Self::InRange {
                sqrt_price_lower,
                sqrt_price_current,
                sqrt_price_upper,
            }
        };
        Ok(regime)
    }

    pub fn range_position(&self) -> RangePosition {
        match self {
            Self::BelowRange { .. } => RangePosition::BelowRange,
            Self::InRange { .. } => RangePosition::InRange,
            Self::AboveRange { .. } => RangePosition::AboveRange,
        }
    }

    /// Ordered (lower, upper) bounds
    pub fn bounds(&self) -> (SqrtPriceX96, SqrtPriceX96) {
        match *self {
            Self::BelowRange {
                sqrt_price_lower,
                sqrt_price_upper,
            }
            | Self::InRange {
                sqrt_price_lower,
                sqrt_price_upper,
                ..
            }
            | Self::AboveRange {
                sqrt_price_lower,
                sqrt_price_upper,
            } => (sqrt_price_lower, sqrt_price_upper),
        }
    }

    pub fn consumes_token0(&self) -> bool {
        !matches!(self, Self::AboveRange { .. })
    }

    pub fn consumes_token1(&self) -> bool {
        !matches!(self, Self::BelowRange { .. })
    }

    /// Largest liquidity the budgets can fund in this regime
    pub fn liquidity(
        &self,
        budget0: TokenAmount,
        budget1: TokenAmount,
    ) -> CoreResult<LiquidityCandidates> {
        let candidates = match *self {
            Self::BelowRange {
                sqrt_price_lower,
                sqrt_price_upper,
            } => {
                let liquidity0 = liquidity_from_token0(budget0, sqrt_price_lower, sqrt_price_upper)?;
                LiquidityCandidates {
                    liquidity0: Some(liquidity0),
                    liquidity1: None,
                    liquidity: liquidity0,
                    binding: BindingToken::Token0,
                }
            }
            Self::InRange {
                sqrt_price_lower,
                sqrt_price_current,
                sqrt_price_upper,
            } => {
                let liquidity0 =
                    liquidity_from_token0(budget0, sqrt_price_current, sqrt_price_upper)?;
                let liquidity1 =
                    liquidity_from_token1(budget1, sqrt_price_lower, sqrt_price_current)?;
                let (liquidity, binding) = if liquidity0 <= liquidity1 {
                    (liquidity0, BindingToken::Token0)
                } else {
                    (liquidity1, BindingToken::Token1)
                };
                LiquidityCandidates {
                    liquidity0: Some(liquidity0),
                    liquidity1: Some(liquidity1),
                    liquidity,
                    binding,
                }
            }
            Self::AboveRange {
                sqrt_price_lower,
                sqrt_price_upper,
            } => {
                let liquidity1 = liquidity_from_token1(budget1, sqrt_price_lower, sqrt_price_upper)?;
                LiquidityCandidates {
                    liquidity0: None,
                    liquidity1: Some(liquidity1),
                    liquidity: liquidity1,
                    binding: BindingToken::Token1,
                }
            }
        };

        trace!(
            "{:?}: L0={:?}, L1={:?}, binding {:?}",
            self.range_position(),
            candidates.liquidity0,
            candidates.liquidity1,
            candidates.binding
        );
        Ok(candidates)
    }

    /// Token amounts held by `liquidity` in this regime, floored
    pub fn amounts(&self, liquidity: Liquidity) -> CoreResult<(TokenAmount, TokenAmount)> {
        match *self {
            Self::BelowRange {
                sqrt_price_lower,
                sqrt_price_upper,
            } => Ok((
                amount0_for_liquidity(liquidity, sqrt_price_lower, sqrt_price_upper)?,
                0,
            )),
            Self::InRange {
                sqrt_price_lower,
                sqrt_price_current,
                sqrt_price_upper,
            } => Ok((
                amount0_for_liquidity(liquidity, sqrt_price_current, sqrt_price_upper)?,
                amount1_for_liquidity(liquidity, sqrt_price_lower, sqrt_price_current)?,
            )),
            Self::AboveRange {
                sqrt_price_lower,
                sqrt_price_upper,
            } => Ok((
                0,
                amount1_for_liquidity(liquidity, sqrt_price_lower, sqrt_price_upper)?,
            )),
        }
    }
}

/// Largest liquidity the budgets fund in the range at `sqrt_price_current`
pub fn liquidity_for_amounts(
    sqrt_price_current: SqrtPriceX96,
    sqrt_price_a: SqrtPriceX96,
    sqrt_price_b: SqrtPriceX96,
    amount0: TokenAmount,
    amount1: TokenAmount,
) -> CoreResult<Liquidity> {
    let regime = Regime::classify(sqrt_price_current, sqrt_price_a, sqrt_price_b)?;
    Ok(regime.liquidity(amount0, amount1)?.liquidity)
}

/// Token amounts held by `liquidity` in the range at `sqrt_price_current`
pub fn amounts_for_liquidity(
    sqrt_price_current: SqrtPriceX96,
    sqrt_price_a: SqrtPriceX96,
    sqrt_price_b: SqrtPriceX96,
    liquidity: Liquidity,
) -> CoreResult<(TokenAmount, TokenAmount)> {
    Regime::classify(sqrt_price_current, sqrt_price_a, sqrt_price_b)?.amounts(liquidity)
}
