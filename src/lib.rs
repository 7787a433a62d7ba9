//! SwarmTick Core - Batch-Parallel Entity Update Engine
//!
//! Applies a per-entity kernel to large homogeneous entity collections once
//! per tick, either sequentially or as fixed-size batches dispatched onto a
//! rayon pool, and benchmarks the two strategies against each other.

pub mod core;
pub mod swarm;
pub mod utils;

// Re-export key types
pub use crate::core::config::{BenchmarkConfig, ScenarioConfig};
pub use crate::core::entity::{create_population, create_population_seeded, Entity, AUX_LEN};
pub use crate::core::error::{ConfigError, KernelError, UpdateError, UpdateResult};
pub use crate::swarm::{
    BatchPlan, Kernel, KernelKind, ParallelUpdater, SequentialUpdater, Updater, DEFAULT_BATCH_SIZE,
};
pub use crate::utils::benchmark::{speedup, BenchmarkHarness, BenchmarkReport, Verdict};

/// Initialize tracing for the library.
///
/// `level` is an `EnvFilter` directive such as `"debug"` or
/// `"swarmtick_core=trace"`; defaults to `"info"`. Logs go to stderr so that
/// stdout stays reserved for reports.
pub fn setup_logging(level: Option<String>) {
    let filter = level.unwrap_or_else(|| "info".to_string());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
