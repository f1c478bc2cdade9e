//! # Position Solver
//!
//! Given a price range and two token budgets, find the binding liquidity and
//! the exact amounts that liquidity consumes.
//!
//! 1. Validate the request
//! 2. Derive informational ticks
//! 3. Convert prices to Q64.96 sqrt prices
//! 4. Classify the range and compute the liquidity candidates
//! 5. Keep the smallest candidate
//! 6. Recompute the consumed amounts from it

use tracing::debug;

use crate::errors::{ClmmError, CoreResult};
use crate::math::fixed_point::to_sqrt_q96;
use crate::math::tick_math::{check_tick, price_to_tick, sqrt_ratio_at_tick, tick_at_sqrt_ratio};
use crate::position::Regime;
use crate::types::{
    Liquidity, PositionQuote, PositionRequest, RangePosition, SqrtPriceX96, Tick, TokenAmount,
};

/// Stateless solver for new positions
pub struct PositionSolver;

impl PositionSolver {
    /// Solve a strictly in-range position
    ///
    /// Requires `price_lower < price_current < price_upper` and both budgets
    /// positive. Use [`PositionSolver::quote`] for ranges the current price
    /// sits outside of.
    pub fn solve(request: &PositionRequest) -> CoreResult<PositionQuote> {
        request.validate_in_range()?;
        let quote = Self::quote_prices(request)?;

        // Prices closer than the Q64.96 resolution collapse onto a bound
        if quote.range_position != RangePosition::InRange {
            return Err(ClmmError::InvalidArgument(
                "price_current is indistinguishable from a range bound",
            ));
        }
        Ok(quote)
    }

    /// Quote a position in any regime
    ///
    /// `price_current <= price_lower` consumes only token0 and
    /// `price_current >= price_upper` only token1. Only the budget of a
    /// consumed token has to be positive.
    pub fn quote(request: &PositionRequest) -> CoreResult<PositionQuote> {
        request.validate_range()?;
        Self::quote_prices(request)
    }

    /// Quote a position whose bounds are ticks, using exact tick sqrt ratios
    pub fn quote_at_ticks(
        sqrt_price_current: SqrtPriceX96,
        tick_lower: Tick,
        tick_upper: Tick,
        budget0: TokenAmount,
        budget1: TokenAmount,
    ) -> CoreResult<PositionQuote> {
        let (sqrt_price_lower, sqrt_price_upper) = Self::tick_bounds(tick_lower, tick_upper)?;
        let tick_current = tick_at_sqrt_ratio(sqrt_price_current)?;

        Self::build(
            (tick_current, tick_lower, tick_upper),
            (sqrt_price_current, sqrt_price_lower, sqrt_price_upper),
            budget0,
            budget1,
        )
    }

    /// Token amounts `liquidity` requires between two ticks at the current price
    pub fn amounts_at_ticks(
        sqrt_price_current: SqrtPriceX96,
        tick_lower: Tick,
        tick_upper: Tick,
        liquidity: Liquidity,
    ) -> CoreResult<(TokenAmount, TokenAmount)> {
        let (sqrt_price_lower, sqrt_price_upper) = Self::tick_bounds(tick_lower, tick_upper)?;
        let (amount0, amount1) =
            Regime::classify(sqrt_price_current, sqrt_price_lower, sqrt_price_upper)?
                .amounts(liquidity)?;

        debug!(
            "L={} over [{}, {}] requires amount0={}, amount1={}",
            liquidity, tick_lower, tick_upper, amount0, amount1
        );
        Ok((amount0, amount1))
    }

    fn tick_bounds(tick_lower: Tick, tick_upper: Tick) -> CoreResult<(SqrtPriceX96, SqrtPriceX96)> {
        check_tick(tick_lower)?;
        check_tick(tick_upper)?;
        if tick_lower >= tick_upper {
            return Err(ClmmError::InvalidArgument("tick_lower must be below tick_upper"));
        }
        Ok((sqrt_ratio_at_tick(tick_lower)?, sqrt_ratio_at_tick(tick_upper)?))
    }

    fn quote_prices(request: &PositionRequest) -> CoreResult<PositionQuote> {
        let ticks = (
            price_to_tick(request.price_current)?,
            price_to_tick(request.price_lower)?,
            price_to_tick(request.price_upper)?,
        );
        let sqrt_prices = (
            to_sqrt_q96(request.price_current)?,
            to_sqrt_q96(request.price_lower)?,
            to_sqrt_q96(request.price_upper)?,
        );

        Self::build(ticks, sqrt_prices, request.budget0, request.budget1)
    }

    fn build(
        (tick_current, tick_lower, tick_upper): (Tick, Tick, Tick),
        (sqrt_price_current, sqrt_price_lower, sqrt_price_upper): (
            SqrtPriceX96,
            SqrtPriceX96,
            SqrtPriceX96,
        ),
        budget0: TokenAmount,
        budget1: TokenAmount,
    ) -> CoreResult<PositionQuote> {
        let regime = Regime::classify(sqrt_price_current, sqrt_price_lower, sqrt_price_upper)?;
        if regime.consumes_token0() && budget0 == 0 {
            return Err(ClmmError::InvalidArgument("token0 budget must be positive"));
        }
        if regime.consumes_token1() && budget1 == 0 {
            return Err(ClmmError::InvalidArgument("token1 budget must be positive"));
        }

        let candidates = regime.liquidity(budget0, budget1)?;
        if candidates.liquidity == 0 {
            return Err(ClmmError::InvalidArgument("budgets fund zero liquidity"));
        }
        let (amount0, amount1) = regime.amounts(candidates.liquidity)?;

        let quote = PositionQuote {
            tick_current,
            tick_lower,
            tick_upper,
            sqrt_price_current,
            sqrt_price_lower,
            sqrt_price_upper,
            range_position: regime.range_position(),
            liquidity0: candidates.liquidity0,
            liquidity1: candidates.liquidity1,
            liquidity: candidates.liquidity,
            binding: candidates.binding,
            budget0,
            budget1,
            amount0,
            amount1,
        };

        if !quote.fits_budgets() {
            return Err(ClmmError::InternalError("solved amounts exceed the budgets"));
        }

        debug!(
            "Solved {:?} position: ticks [{}, {}, {}], L={}, binding {:?}, amount0={}/{}, amount1={}/{}",
            quote.range_position,
            tick_lower,
            tick_current,
            tick_upper,
            quote.liquidity,
            quote.binding,
            amount0,
            budget0,
            amount1,
            budget1
        );
        Ok(quote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{ETH, MAX_TICK, MIN_TICK};
    use crate::math::amount_math::amount1_for_liquidity;
    use crate::types::BindingToken;

    fn reference_request() -> PositionRequest {
        PositionRequest::new(5000.0, 4545.0, 5500.0, ETH, 5000 * ETH)
    }

    #[test]
    fn test_solve_reference_scenario() {
        let quote = PositionSolver::solve(&reference_request()).unwrap();

        assert_eq!((quote.tick_current, quote.tick_lower, quote.tick_upper), (85176, 84222, 86129));
        assert_eq!(quote.range_position, RangePosition::InRange);
        assert_eq!(quote.binding, BindingToken::Token1);
        assert_eq!(quote.liquidity, 1_517_882_343_751_509_783_892);
        assert_eq!(quote.amount0, 998_976_618_347_425_273);
        assert_eq!(quote.amount1, 4_999_999_999_999_999_999_999);
        assert!(quote.fits_budgets());
        assert_eq!(quote.shortfall1(), 1);
        assert!(quote.shortfall0() > 0);
    }

    #[test]
    fn test_solve_rejects_boundaries() {
        for (current, lower, upper) in [(4545.0, 4545.0, 5500.0), (5500.0, 4545.0, 5500.0), (4000.0, 4545.0, 5500.0)] {
            let request = PositionRequest::new(current, lower, upper, ETH, 5000 * ETH);
            assert!(matches!(
                PositionSolver::solve(&request),
                Err(ClmmError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn test_solve_rejects_empty_budget() {
        let mut request = reference_request();
        request.budget1 = 0;
        assert!(matches!(
            PositionSolver::solve(&request),
            Err(ClmmError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_solve_tiny_prices() {
        let request = PositionRequest::new(2e-30, 1e-30, 4e-30, ETH, ETH);
        let quote = PositionSolver::solve(&request).unwrap();

        assert_eq!(quote.liquidity0, Some(4828));
        assert_eq!(quote.liquidity, 4828);
        assert_eq!(quote.binding, BindingToken::Token0);
        assert_eq!(quote.amount0, 999_911_539_568_649_688);
        assert_eq!(quote.amount1, 0);
        assert!(quote.fits_budgets());
    }

    #[test]
    fn test_solve_rejects_budget_below_one_liquidity_unit() {
        // One wei of token1 funds no liquidity at these prices
        let mut request = reference_request();
        request.budget1 = 1;
        assert_eq!(
            PositionSolver::solve(&request),
            Err(ClmmError::InvalidArgument("budgets fund zero liquidity"))
        );
    }

    #[test]
    fn test_quote_matches_solve_in_range() {
        let request = reference_request();
        assert_eq!(
            PositionSolver::quote(&request).unwrap(),
            PositionSolver::solve(&request).unwrap()
        );
    }

    #[test]
    fn test_quote_boundaries() {
        let below = PositionSolver::quote(&PositionRequest::new(4545.0, 4545.0, 5500.0, ETH, 0)).unwrap();
        assert_eq!(below.range_position, RangePosition::BelowRange);
        assert_eq!(below.binding, BindingToken::Token0);
        assert_eq!(below.liquidity1, None);
        assert_eq!(below.amount0, 999_999_999_999_999_999);
        assert_eq!(below.amount1, 0);

        let above =
            PositionSolver::quote(&PositionRequest::new(5500.0, 4545.0, 5500.0, 0, 5000 * ETH)).unwrap();
        assert_eq!(above.range_position, RangePosition::AboveRange);
        assert_eq!(above.binding, BindingToken::Token1);
        assert_eq!(above.liquidity0, None);
        assert_eq!(above.amount0, 0);
        assert_eq!(above.amount1, 4_999_999_999_999_999_999_995);
    }

    #[test]
    fn test_quote_requires_consumed_budget() {
        let request = PositionRequest::new(4000.0, 4545.0, 5500.0, 0, 5000 * ETH);
        assert!(matches!(
            PositionSolver::quote(&request),
            Err(ClmmError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_quote_at_ticks() {
        let sqrt_price_current = to_sqrt_q96(5000.0).unwrap();
        let quote =
            PositionSolver::quote_at_ticks(sqrt_price_current, 84222, 86129, ETH, 5000 * ETH).unwrap();

        assert_eq!(quote.tick_current, 85176);
        assert_eq!(quote.sqrt_price_lower, sqrt_ratio_at_tick(84222).unwrap());
        assert_eq!(quote.range_position, RangePosition::InRange);
        assert!(quote.fits_budgets());

        // Amounts for the solved liquidity agree with the quote
        let amounts =
            PositionSolver::amounts_at_ticks(sqrt_price_current, 84222, 86129, quote.liquidity).unwrap();
        assert_eq!(amounts, (quote.amount0, quote.amount1));
        assert_eq!(
            amounts.1,
            amount1_for_liquidity(quote.liquidity, quote.sqrt_price_lower, sqrt_price_current).unwrap()
        );
    }

    #[test]
    fn test_tick_entry_points_validate_ticks() {
        let current = SqrtPriceX96::ONE;
        assert_eq!(
            PositionSolver::amounts_at_ticks(current, MIN_TICK - 1, 0, 1),
            Err(ClmmError::OutOfRange(MIN_TICK - 1))
        );
        assert_eq!(
            PositionSolver::quote_at_ticks(current, 0, MAX_TICK + 1, 1, 1),
            Err(ClmmError::OutOfRange(MAX_TICK + 1))
        );
        assert!(matches!(
            PositionSolver::amounts_at_ticks(current, 60, -60, 1),
            Err(ClmmError::InvalidArgument(_))
        ));
    }
}
