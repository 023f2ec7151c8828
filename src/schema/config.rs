//! Configuration types for the grouping search.

use serde::{Deserialize, Serialize};

fn default_grouping_size() -> usize {
    40
}
fn default_population_size() -> usize {
    100
}
fn default_survivability_divisor() -> usize {
    10
}
fn default_diagonals() -> bool {
    true
}
fn default_min_generations() -> usize {
    30
}
fn default_report_count() -> usize {
    9
}
fn default_retry_limit() -> usize {
    1000
}

/// Tunables for the evolutionary grouping search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Number of cells per grouping.
    #[serde(default = "default_grouping_size")]
    pub grouping_size: usize,
    /// Number of groupings per generation.
    #[serde(default = "default_population_size")]
    pub population_size: usize,
    /// Elite band divisor: the top `population_size / divisor` groupings
    /// survive into the next generation.
    #[serde(default = "default_survivability_divisor")]
    pub survivability_divisor: usize,
    /// Whether adjacency includes diagonal steps (8-connected).
    #[serde(default = "default_diagonals")]
    pub diagonals: bool,
    /// Generations to run before the convergence check may fire.
    #[serde(default = "default_min_generations")]
    pub min_generations: usize,
    /// How many top groupings to report on convergence.
    #[serde(default = "default_report_count")]
    pub report_count: usize,
    /// Upper bound on redraws when growing or mutating groupings.
    #[serde(default = "default_retry_limit")]
    pub retry_limit: usize,
    /// Optional early stop after this many generations without improvement
    /// at the elite cutoff. Off by default; the stagnation counter is still
    /// tracked and reported.
    #[serde(default)]
    pub stagnation_limit: Option<usize>,
    /// Random seed for reproducible runs.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            grouping_size: default_grouping_size(),
            population_size: default_population_size(),
            survivability_divisor: default_survivability_divisor(),
            diagonals: default_diagonals(),
            min_generations: default_min_generations(),
            report_count: default_report_count(),
            retry_limit: default_retry_limit(),
            stagnation_limit: None,
            random_seed: None,
        }
    }
}

impl SearchConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grouping_size == 0 {
            return Err(ConfigError::InvalidGroupingSize);
        }
        if self.population_size == 0 {
            return Err(ConfigError::InvalidPopulationSize);
        }
        // The convergence check reads the fitness at rank
        // `population_size / divisor`, which must stay inside the
        // population.
        if self.survivability_divisor < 2 {
            return Err(ConfigError::InvalidSurvivabilityDivisor);
        }
        if self.retry_limit == 0 {
            return Err(ConfigError::InvalidRetryLimit);
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Grouping size must be non-zero")]
    InvalidGroupingSize,
    #[error("Population size must be non-zero")]
    InvalidPopulationSize,
    #[error("Survivability divisor must be at least 2")]
    InvalidSurvivabilityDivisor,
    #[error("Retry limit must be non-zero")]
    InvalidRetryLimit,
    #[error("Grouping size {size} exceeds the grid's {cells} cells")]
    GroupingTooLarge { size: usize, cells: usize },
}
