use super::traits::ConfigSection;
use crate::error::CrossgaError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestingConfig {
    pub initial_capital: f64,
}

impl Default for BacktestingConfig {
    fn default() -> Self {
        Self {
            initial_capital: 10000.0,
        }
    }
}

impl ConfigSection for BacktestingConfig {
    fn section_name() -> &'static str {
        "backtesting"
    }

    fn validate(&self) -> Result<(), CrossgaError> {
        if !self.initial_capital.is_finite() || self.initial_capital <= 0.0 {
            return Err(CrossgaError::Configuration(
                "Initial capital must be positive".to_string()
            ));
        }
        Ok(())
    }
}
