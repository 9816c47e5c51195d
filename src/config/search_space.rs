use super::traits::ConfigSection;
use crate::engines::generation::ParameterBounds;
use crate::error::CrossgaError;
use serde::{Deserialize, Serialize};

/// Inclusive window ranges the search draws from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSpaceConfig {
    pub min_short: usize,
    pub max_short: usize,
    pub min_long: usize,
    pub max_long: usize,
}

impl Default for SearchSpaceConfig {
    fn default() -> Self {
        let bounds = ParameterBounds::default();
        Self {
            min_short: bounds.min_short,
            max_short: bounds.max_short,
            min_long: bounds.min_long,
            max_long: bounds.max_long,
        }
    }
}

impl SearchSpaceConfig {
    pub fn bounds(&self) -> ParameterBounds {
        ParameterBounds {
            min_short: self.min_short,
            max_short: self.max_short,
            min_long: self.min_long,
            max_long: self.max_long,
        }
    }
}

impl ConfigSection for SearchSpaceConfig {
    fn section_name() -> &'static str {
        "search_space"
    }

    fn validate(&self) -> Result<(), CrossgaError> {
        self.bounds().validate()
    }
}
