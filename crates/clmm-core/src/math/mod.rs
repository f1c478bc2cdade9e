//! # Mathematical Functions
//!
//! Pure fixed-point and tick math for concentrated liquidity positions.

pub mod amount_math;
pub mod big_int;
pub mod fixed_point;
pub mod liquidity_math;
pub mod tick_math;
pub mod units;

// Re-export commonly used functions
pub use amount_math::*;
pub use big_int::*;
pub use fixed_point::*;
pub use liquidity_math::*;
pub use tick_math::*;
pub use units::*;
