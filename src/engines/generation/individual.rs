use crate::error::{CrossgaError, Result};
use serde::{Deserialize, Serialize};

/// A candidate `(short, long)` moving-average window pair.
///
/// Every individual that is scored or bred from must satisfy
/// `long_period > short_period`; see [`Individual::check_invariant`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Individual {
    pub short_period: usize,
    pub long_period: usize,
}

impl Individual {
    pub fn new(short_period: usize, long_period: usize) -> Self {
        Self {
            short_period,
            long_period,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.long_period > self.short_period
    }

    pub fn check_invariant(&self) -> Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(CrossgaError::InvariantViolation {
                short_period: self.short_period,
                long_period: self.long_period,
            })
        }
    }
}

/// An individual with the fitness it earned in one generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredIndividual {
    #[serde(flatten)]
    pub individual: Individual,
    pub fitness: f64,
}

pub type Population = Vec<Individual>;

/// Inclusive search ranges for both windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterBounds {
    pub min_short: usize,
    pub max_short: usize,
    pub min_long: usize,
    pub max_long: usize,
}

impl ParameterBounds {
    pub fn new(min_short: usize, max_short: usize, min_long: usize, max_long: usize) -> Result<Self> {
        let bounds = Self {
            min_short,
            max_short,
            min_long,
            max_long,
        };
        bounds.validate()?;
        Ok(bounds)
    }

    /// Rejects empty ranges, zero periods, and bounds under which no
    /// individual can have `long > short`.
    pub fn validate(&self) -> Result<()> {
        if self.min_short < 1 || self.min_long < 1 {
            return Err(CrossgaError::Configuration(
                "Moving-average periods must be at least 1".to_string(),
            ));
        }
        if self.max_short < self.min_short {
            return Err(CrossgaError::Configuration(format!(
                "max_short ({}) must be >= min_short ({})",
                self.max_short, self.min_short
            )));
        }
        if self.max_long < self.min_long {
            return Err(CrossgaError::Configuration(format!(
                "max_long ({}) must be >= min_long ({})",
                self.max_long, self.min_long
            )));
        }
        if self.max_long <= self.min_short {
            return Err(CrossgaError::Configuration(format!(
                "max_long ({}) must exceed min_short ({}) so that long > short is satisfiable",
                self.max_long, self.min_short
            )));
        }
        Ok(())
    }

    pub fn clamp_short(&self, period: usize) -> usize {
        period.clamp(self.min_short, self.max_short)
    }

    pub fn clamp_long(&self, period: usize) -> usize {
        period.clamp(self.min_long, self.max_long)
    }
}

impl Default for ParameterBounds {
    fn default() -> Self {
        Self {
            min_short: 2,
            max_short: 250,
            min_long: 20,
            max_long: 500,
        }
    }
}
