//! Run configuration

use serde::{Deserialize, Serialize};

use crate::error::{EvolutionError, EvoResult};
use crate::genome::bounds::SeedingBounds;

/// Parameters of a run
///
/// Every field has a default, so a partial JSON document is a valid
/// configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Proportion of each parent kept as head in crossover
    pub crossover_proportion: f64,
    /// Base per-gene mutation probability, scaled by run progress
    pub mutation_probability: f64,
    /// Number of chromosomes seeded; must be positive and even
    pub population_size: usize,
    /// Generation budget
    pub max_iterations: usize,
    /// Print timestamped progress lines
    pub verbose: bool,
    /// Bound convention for the initial population
    pub seeding: SeedingBounds,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            crossover_proportion: 0.5,
            mutation_probability: 0.5,
            population_size: 10,
            max_iterations: 10,
            verbose: false,
            seeding: SeedingBounds::default(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json_str(json: &str) -> EvoResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| EvolutionError::config(format!("malformed configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> EvoResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| EvolutionError::config(e.to_string()))
    }

    /// Check every parameter against its allowed range
    pub fn validate(&self) -> EvoResult<()> {
        check_unit_interval("crossover proportion", self.crossover_proportion)?;
        check_unit_interval("mutation probability", self.mutation_probability)?;

        if self.population_size == 0 || self.population_size % 2 != 0 {
            return Err(EvolutionError::config(format!(
                "population size must be a positive even integer, got {}",
                self.population_size
            )));
        }
        Ok(())
    }
}

fn check_unit_interval(name: &str, value: f64) -> EvoResult<()> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(EvolutionError::config(format!(
            "{name} must be a real number in [0, 1], got {value}"
        )));
    }
    Ok(())
}
