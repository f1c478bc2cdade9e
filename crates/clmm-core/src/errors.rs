//! # Core Error Types
//!
//! Every failure is detected synchronously at the offending input and
//! returned to the caller. Nothing here is transient, so nothing is retried.

use thiserror::Error;

use crate::constants::{MAX_TICK, MIN_TICK};

/// Errors produced by the concentrated liquidity math
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(serde::Serialize))]
pub enum ClmmError {
    // ========================================================================
    // Validation Errors
    // ========================================================================

    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),

    #[error("Tick {0} out of range [{}, {}]", MIN_TICK, MAX_TICK)]
    OutOfRange(i32),

    // ========================================================================
    // Arithmetic Errors
    // ========================================================================

    #[error("Math overflow")]
    MathOverflow,

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Conversion error")]
    ConversionError,

    // ========================================================================
    // General Errors
    // ========================================================================

    #[error("Internal error: {0}")]
    InternalError(&'static str),

    #[cfg(feature = "client")]
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type using core errors
pub type CoreResult<T> = Result<T, ClmmError>;

/// Coarse error classification for presentation layers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    OutOfRange,
    Arithmetic,
    Config,
}

impl ClmmError {
    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::OutOfRange(_) => ErrorKind::OutOfRange,
            Self::MathOverflow
            | Self::DivisionByZero
            | Self::ConversionError
            | Self::InternalError(_) => ErrorKind::Arithmetic,
            #[cfg(feature = "client")]
            Self::Config(_) => ErrorKind::Config,
        }
    }

    /// Create a configuration error with context
    #[cfg(feature = "client")]
    pub fn config(context: &str, details: impl std::fmt::Display) -> Self {
        Self::Config(format!("{}: {}", context, details))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ClmmError::OutOfRange(887_273);
        assert_eq!(
            format!("{}", err),
            "Tick 887273 out of range [-887272, 887272]"
        );

        let err = ClmmError::InvalidArgument("price must be positive");
        assert_eq!(format!("{}", err), "Invalid argument: price must be positive");
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(ClmmError::InvalidArgument("x").kind(), ErrorKind::InvalidArgument);
        assert_eq!(ClmmError::OutOfRange(0).kind(), ErrorKind::OutOfRange);
        assert_eq!(ClmmError::MathOverflow.kind(), ErrorKind::Arithmetic);
        assert_eq!(ClmmError::DivisionByZero.kind(), ErrorKind::Arithmetic);
    }

    #[cfg(feature = "client")]
    #[test]
    fn test_config_error() {
        let err = ClmmError::config("position.toml", "missing field `range`");
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(format!("{}", err).contains("position.toml"));
    }
}
