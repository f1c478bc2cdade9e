//! # Position Solving
//!
//! Regime classification of a price range and the solver built on it.

pub mod regime;
pub mod solver;

pub use regime::{amounts_for_liquidity, liquidity_for_amounts, LiquidityCandidates, Regime};
pub use solver::PositionSolver;
