use super::traits::ConfigSection;
use crate::error::CrossgaError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub population_size: usize,
    pub generations: usize,
    pub mutation_rate: f64,
    pub seed: Option<u64>,
    pub parallel: bool,
    pub cache_moving_averages: bool,
    /// Wall-clock budget in seconds; unlimited when absent.
    pub deadline_secs: Option<f64>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            generations: 50,
            mutation_rate: 0.1,
            seed: None,
            parallel: true,
            cache_moving_averages: true,
            deadline_secs: None,
        }
    }
}

impl ConfigSection for EvolutionConfig {
    fn section_name() -> &'static str {
        "evolution"
    }

    fn validate(&self) -> Result<(), CrossgaError> {
        if self.population_size == 0 {
            return Err(CrossgaError::Configuration(
                "Population size must be at least 1".to_string()
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(CrossgaError::Configuration(
                "Mutation rate must be between 0 and 1".to_string()
            ));
        }
        if let Some(secs) = self.deadline_secs {
            if !secs.is_finite() || secs <= 0.0 {
                return Err(CrossgaError::Configuration(
                    "Deadline must be a positive number of seconds".to_string()
                ));
            }
        }
        Ok(())
    }
}
