//! # Core Type Definitions
//!
//! Value types shared by the math and the position solver.

pub mod position;
pub mod price;

// Re-export all types
pub use position::*;
pub use price::*;
