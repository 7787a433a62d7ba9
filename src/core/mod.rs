//! Core data model, configuration and error types.

pub mod config;
pub mod entity;
pub mod error;

pub use config::{BenchmarkConfig, ScenarioConfig};
pub use entity::{create_population, create_population_seeded, Entity, AUX_LEN};
pub use error::{ConfigError, KernelError, UpdateError, UpdateResult};
