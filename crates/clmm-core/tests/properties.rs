//! Property-based tests for tick, liquidity and solver invariants
//!
//! Run with: cargo test -p clmm-core --test properties

use clmm_core::math::*;
use clmm_core::*;
use proptest::prelude::*;

// ============================================================
// STRATEGIES
// ============================================================

prop_compose! {
    /// Exact sqrt ratios of a non-empty range anywhere in the tick domain
    fn sqrt_range_strategy()(
        tick_lower in MIN_TICK..MAX_TICK,
        width in 1i32..200_000i32
    ) -> (SqrtPriceX96, SqrtPriceX96) {
        let tick_upper = tick_lower.saturating_add(width).min(MAX_TICK);
        (
            sqrt_ratio_at_tick(tick_lower).unwrap(),
            sqrt_ratio_at_tick(tick_upper).unwrap(),
        )
    }
}

prop_compose! {
    /// Log-uniform u128 so small and huge magnitudes are both common
    fn magnitude_strategy()(mantissa in any::<u128>(), shift in 0u32..128) -> u128 {
        (mantissa >> shift).max(1)
    }
}

prop_compose! {
    /// Price range with the current price anywhere around it
    fn request_strategy()(
        log_lower in -38.0f64..37.0,
        log_width in -3.0f64..1.0,
        position in -0.5f64..1.5,
        budget0 in 1u128..1_000_000_000_000_000_000_000_000_000_000u128,
        budget1 in 1u128..1_000_000_000_000_000_000_000_000_000_000u128
    ) -> PositionRequest {
        let price_lower = 10f64.powf(log_lower);
        let price_upper = price_lower * (1.0 + 10f64.powf(log_width));
        let price_current = price_lower + (price_upper - price_lower) * position;
        PositionRequest::new(price_current.max(price_lower / 2.0), price_lower, price_upper, budget0, budget1)
    }
}

/// Unwrap a result, turning values that do not fit u128 into a skipped case
macro_rules! fit_or_skip {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(ClmmError::MathOverflow) => return Ok(()),
            Err(e) => return Err(TestCaseError::fail(format!("unexpected error: {}", e))),
        }
    };
}

// ============================================================
// TICK PROPERTIES
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2000))]

    /// Property: price_to_tick(tick_to_price(T)) == T
    #[test]
    fn prop_tick_price_round_trip(tick in MIN_TICK..=MAX_TICK) {
        let price = tick_to_price(tick).unwrap();
        prop_assert_eq!(price_to_tick(price).unwrap(), tick);
    }

    /// Property: tick_to_price(t) <= p < tick_to_price(t + 1)
    #[test]
    fn prop_price_to_tick_floors(log_price in -30.0f64..30.0) {
        let price = 10f64.powf(log_price);
        let tick = price_to_tick(price).unwrap();
        prop_assert!(tick_to_price(tick).unwrap() <= price);
        prop_assert!(tick_to_price(tick + 1).unwrap() > price);
    }

    /// Property: price_to_tick is non-decreasing
    #[test]
    fn prop_price_to_tick_monotonic(log_a in -30.0f64..30.0, log_b in -30.0f64..30.0) {
        let (low, high) = if log_a <= log_b { (log_a, log_b) } else { (log_b, log_a) };
        let tick_low = price_to_tick(10f64.powf(low)).unwrap();
        let tick_high = price_to_tick(10f64.powf(high)).unwrap();
        prop_assert!(tick_low <= tick_high);
    }

    /// Property: tick_at_sqrt_ratio inverts sqrt_ratio_at_tick
    #[test]
    fn prop_sqrt_ratio_round_trip(tick in MIN_TICK..MAX_TICK) {
        let sqrt_price = sqrt_ratio_at_tick(tick).unwrap();
        prop_assert_eq!(tick_at_sqrt_ratio(sqrt_price).unwrap(), tick);
    }
}

// ============================================================
// LIQUIDITY PROPERTIES
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// Property: token0 amounts recover the liquidity that produced them,
    /// never more, and less by at most two liquidity units
    #[test]
    fn prop_token0_liquidity_round_trip(
        (a, b) in sqrt_range_strategy(),
        liquidity in magnitude_strategy()
    ) {
        let amount0 = fit_or_skip!(amount0_for_liquidity(liquidity, a, b));
        let recovered = fit_or_skip!(liquidity_from_token0(amount0, a, b));
        prop_assert!(recovered <= liquidity);

        let unit = fit_or_skip!(liquidity_from_token0(1, a, b));
        let tolerance = unit.saturating_add(1).saturating_mul(2).saturating_add(1);
        prop_assert!(liquidity - recovered <= tolerance);
    }

    /// Property: same for token1
    #[test]
    fn prop_token1_liquidity_round_trip(
        (a, b) in sqrt_range_strategy(),
        liquidity in magnitude_strategy()
    ) {
        let amount1 = fit_or_skip!(amount1_for_liquidity(liquidity, a, b));
        let recovered = fit_or_skip!(liquidity_from_token1(amount1, b, a));
        prop_assert!(recovered <= liquidity);

        let unit = fit_or_skip!(liquidity_from_token1(1, a, b));
        prop_assert!(liquidity - recovered <= unit.saturating_add(2));
    }

    /// Property: amounts never exceed what the liquidity was derived from
    #[test]
    fn prop_amounts_within_source(
        (a, b) in sqrt_range_strategy(),
        amount in magnitude_strategy()
    ) {
        let liquidity0 = fit_or_skip!(liquidity_from_token0(amount, a, b));
        prop_assert!(amount0_for_liquidity(liquidity0, a, b).unwrap() <= amount);

        let liquidity1 = fit_or_skip!(liquidity_from_token1(amount, a, b));
        prop_assert!(amount1_for_liquidity(liquidity1, a, b).unwrap() <= amount);
    }
}

// ============================================================
// SOLVER PROPERTIES
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// Property: the solved amounts never exceed the budgets, and the
    /// binding token is consumed up to a small flooring shortfall
    #[test]
    fn prop_solver_respects_budgets(request in request_strategy()) {
        let quote = match PositionSolver::quote(&request) {
            Ok(quote) => quote,
            // Ranges collapsing at Q64.96 resolution, prices past the tick
            // domain, budgets funding no liquidity or needing > u128 of it
            Err(ClmmError::InvalidArgument(_))
            | Err(ClmmError::OutOfRange(_))
            | Err(ClmmError::MathOverflow) => return Ok(()),
            Err(e) => return Err(TestCaseError::fail(format!("unexpected error: {}", e))),
        };

        prop_assert!(quote.amount0 <= request.budget0);
        prop_assert!(quote.amount1 <= request.budget1);

        match quote.range_position {
            RangePosition::BelowRange => prop_assert_eq!(quote.amount1, 0),
            RangePosition::AboveRange => prop_assert_eq!(quote.amount0, 0),
            RangePosition::InRange => {}
        }

        let current = quote.sqrt_price_current;
        let (lower, upper) = (quote.sqrt_price_lower, quote.sqrt_price_upper);
        match (quote.range_position, quote.binding) {
            (RangePosition::InRange, BindingToken::Token1) => {
                let unit_amount = amount1_for_liquidity(1, lower, current).unwrap();
                prop_assert!(quote.shortfall1() <= unit_amount + 1);
            }
            (RangePosition::InRange, BindingToken::Token0) => {
                let unit_amount = amount0_for_liquidity(1, current, upper).unwrap();
                prop_assert!(quote.shortfall0() <= unit_amount + 3);
            }
            _ => {}
        }
    }

    /// Property: the strict solver agrees with quote whenever it succeeds
    #[test]
    fn prop_solve_agrees_with_quote(request in request_strategy()) {
        if let Ok(solved) = PositionSolver::solve(&request) {
            prop_assert_eq!(solved.range_position, RangePosition::InRange);
            prop_assert_eq!(Some(solved), PositionSolver::quote(&request).ok());
        }
    }
}
