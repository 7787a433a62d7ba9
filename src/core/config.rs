use crate::core::error::ConfigError;
use crate::swarm::KernelKind;
use serde::{Deserialize, Serialize};

/// One benchmark scenario: a population, a kernel and the batch sizes to try.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub name: String,
    pub population: usize,
    pub kernel: KernelKind,
    /// `update` calls timed per strategy.
    pub ticks: usize,
    pub batch_sizes: Vec<usize>,
    /// Hypothesis printed ahead of the measurements.
    pub expectation: String,
}

impl ScenarioConfig {
    pub fn new(
        name: impl Into<String>,
        population: usize,
        kernel: KernelKind,
        ticks: usize,
        batch_sizes: Vec<usize>,
        expectation: impl Into<String>,
    ) -> Self {
        ScenarioConfig {
            name: name.into(),
            population,
            kernel,
            ticks,
            batch_sizes,
            expectation: expectation.into(),
        }
    }
}

/// Top-level benchmark hyperparameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkConfig {
    /// Simulation time step passed to every kernel.
    pub dt: f64,
    /// Fixed RNG seed; `None` draws fresh entropy per run.
    pub seed: Option<u64>,
    /// Worker threads for parallel runs; `None` uses the global rayon pool.
    pub threads: Option<usize>,
    pub scenarios: Vec<ScenarioConfig>,
}

impl BenchmarkConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(ConfigError::InvalidTimeStep(self.dt));
        }
        if self.threads == Some(0) {
            return Err(ConfigError::ZeroThreads);
        }
        if self.scenarios.is_empty() {
            return Err(ConfigError::NoScenarios);
        }
        for scenario in &self.scenarios {
            if scenario.population == 0 {
                return Err(ConfigError::EmptyPopulation(scenario.name.clone()));
            }
            if scenario.ticks == 0 {
                return Err(ConfigError::ZeroTicks(scenario.name.clone()));
            }
            if scenario.batch_sizes.is_empty() {
                return Err(ConfigError::NoBatchSizes(scenario.name.clone()));
            }
        }
        Ok(())
    }
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        BenchmarkConfig {
            dt: 0.016,
            seed: None,
            threads: None,
            scenarios: vec![
                ScenarioConfig::new(
                    "100 entities with SIMPLE updates",
                    100,
                    KernelKind::Cheap,
                    100,
                    vec![10],
                    "Sequential faster (task overhead > work)",
                ),
                ScenarioConfig::new(
                    "10,000 entities with SIMPLE updates",
                    10_000,
                    KernelKind::Cheap,
                    10,
                    vec![1000],
                    "Parallel slightly faster",
                ),
                ScenarioConfig::new(
                    "1,000 entities with COMPLEX updates (CPU-heavy)",
                    1_000,
                    KernelKind::Expensive,
                    10,
                    vec![50, 200],
                    "Parallel MUCH faster (real CPU work)",
                ),
                ScenarioConfig::new(
                    "50,000 entities with COMPLEX updates",
                    50_000,
                    KernelKind::Expensive,
                    1,
                    vec![1000],
                    "Parallel SIGNIFICANTLY faster",
                ),
            ],
        }
    }
}
