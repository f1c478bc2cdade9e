//! # Position Configuration
//!
//! TOML description of a position request, with token budgets written as
//! human decimal strings.
//!
//! ```toml
//! fee_tier = 3000
//!
//! [token0]
//! symbol = "ETH"
//! decimals = 18
//!
//! [token1]
//! symbol = "USDC"
//! decimals = 18
//!
//! [range]
//! price_current = 5000.0
//! price_lower = 4545.0
//! price_upper = 5500.0
//!
//! [budget]
//! amount0 = "1"
//! amount1 = "5000"
//! ```
//!
//! Prices are whole token1 per whole token0. When the two tokens have
//! different decimals they are rescaled to base units in `to_request`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_TOKEN_DECIMALS, FEE_MEDIUM, MAX_TOKEN_DECIMALS};
use crate::errors::{ClmmError, CoreResult};
use crate::math::tick_math::FeeTier;
use crate::math::units::parse_units;
use crate::types::{Price, PositionRequest, TokenAmount};

/// Position configuration loaded from a TOML file
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PositionConfig {
    /// Pool fee in hundredths of a basis point (500, 3000 or 10000)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_tier: Option<u32>,

    pub token0: TokenConfig,
    pub token1: TokenConfig,
    pub range: RangeConfig,
    pub budget: BudgetConfig,
}

/// Token metadata
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TokenConfig {
    /// Ticker used in reports
    pub symbol: String,

    /// Decimals of the token's base unit
    #[serde(default = "default_decimals")]
    pub decimals: u8,
}

/// Price range in whole-token units
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RangeConfig {
    pub price_current: Price,
    pub price_lower: Price,
    pub price_upper: Price,
}

/// Token budgets as decimal strings, e.g. "1.5"
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BudgetConfig {
    pub amount0: String,
    pub amount1: String,
}

fn default_decimals() -> u8 {
    DEFAULT_TOKEN_DECIMALS
}

impl PositionConfig {
    /// Load and validate configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| ClmmError::config(&format!("failed to read {}", path.display()), e))?;

        let config: PositionConfig = toml::from_str(&content)
            .map_err(|e| ClmmError::config(&format!("failed to parse {}", path.display()), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> CoreResult<Self> {
        let config: PositionConfig =
            toml::from_str(content).map_err(|e| ClmmError::config("invalid TOML", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> CoreResult<()> {
        self.token0.validate("token0")?;
        self.token1.validate("token1")?;

        let range = &self.range;
        for (name, price) in [
            ("range.price_current", range.price_current),
            ("range.price_lower", range.price_lower),
            ("range.price_upper", range.price_upper),
        ] {
            if !(price.is_finite() && price > 0.0) {
                return Err(ClmmError::config(name, "must be a positive finite number"));
            }
        }
        if range.price_lower >= range.price_upper {
            return Err(ClmmError::config(
                "range",
                "price_lower must be below price_upper",
            ));
        }

        self.budget0()?;
        self.budget1()?;
        self.fee_tier()?;
        Ok(())
    }

    /// Token0 budget in base units
    pub fn budget0(&self) -> CoreResult<TokenAmount> {
        parse_units(&self.budget.amount0, self.token0.decimals)
            .map_err(|e| ClmmError::config("budget.amount0", e))
    }

    /// Token1 budget in base units
    pub fn budget1(&self) -> CoreResult<TokenAmount> {
        parse_units(&self.budget.amount1, self.token1.decimals)
            .map_err(|e| ClmmError::config("budget.amount1", e))
    }

    /// Configured fee tier, if any
    pub fn fee_tier(&self) -> CoreResult<Option<FeeTier>> {
        self.fee_tier
            .map(|fee| FeeTier::from_fee(fee).map_err(|e| ClmmError::config("fee_tier", e)))
            .transpose()
    }

    /// Build a solver request with prices and budgets in base units
    pub fn to_request(&self) -> CoreResult<PositionRequest> {
        let scale = self.base_unit_price_scale();
        Ok(PositionRequest::new(
            self.range.price_current * scale,
            self.range.price_lower * scale,
            self.range.price_upper * scale,
            self.budget0()?,
            self.budget1()?,
        ))
    }

    /// Factor converting whole-token prices to base-unit prices
    fn base_unit_price_scale(&self) -> f64 {
        let exponent = i32::from(self.token1.decimals) - i32::from(self.token0.decimals);
        10f64.powi(exponent)
    }
}

impl TokenConfig {
    fn validate(&self, name: &str) -> CoreResult<()> {
        if self.symbol.trim().is_empty() {
            return Err(ClmmError::config(name, "symbol must not be empty"));
        }
        if self.decimals > MAX_TOKEN_DECIMALS {
            return Err(ClmmError::config(
                name,
                format!("decimals must be at most {}", MAX_TOKEN_DECIMALS),
            ));
        }
        Ok(())
    }
}

impl Default for PositionConfig {
    fn default() -> Self {
        Self {
            fee_tier: Some(FEE_MEDIUM),
            token0: TokenConfig {
                symbol: "ETH".to_string(),
                decimals: DEFAULT_TOKEN_DECIMALS,
            },
            token1: TokenConfig {
                symbol: "USDC".to_string(),
                decimals: DEFAULT_TOKEN_DECIMALS,
            },
            range: RangeConfig {
                price_current: 5000.0,
                price_lower: 4545.0,
                price_upper: 5500.0,
            },
            budget: BudgetConfig {
                amount0: "1".to_string(),
                amount1: "5000".to_string(),
            },
        }
    }
}
