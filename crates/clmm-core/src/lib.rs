//! # CLMM Core - Concentrated Liquidity Math
//!
//! Pure, stateless math for Uniswap V3 style concentrated liquidity:
//!
//! - Price, tick and Q64.96 sqrt price conversions
//! - Liquidity from a single token amount over a price range
//! - Token amounts held by a liquidity value over a price range
//! - Solving the binding liquidity for two token budgets
//!
//! ```
//! use clmm_core::{PositionRequest, PositionSolver, ETH};
//!
//! let request = PositionRequest::new(5000.0, 4545.0, 5500.0, ETH, 5000 * ETH);
//! let quote = PositionSolver::solve(&request)?;
//! assert_eq!(quote.tick_current, 85176);
//! assert!(quote.amount0 <= ETH && quote.amount1 <= 5000 * ETH);
//! # Ok::<(), clmm_core::ClmmError>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `client` (default): serde support and TOML position configs

pub mod constants;
pub mod errors;
pub mod math;
pub mod position;
pub mod types;

#[cfg(feature = "client")]
pub mod config;

// Re-export commonly used items
pub use constants::*;
pub use errors::{ClmmError, CoreResult, ErrorKind};
pub use position::{amounts_for_liquidity, liquidity_for_amounts, PositionSolver, Regime};
pub use types::*;

#[cfg(feature = "client")]
pub use config::PositionConfig;
