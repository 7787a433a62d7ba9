//! Error types for the update engine and the benchmark configuration.

use thiserror::Error;

/// A kernel refused to update an entity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("kernel `{kernel}` failed: {reason}")]
pub struct KernelError {
    pub kernel: String,
    pub reason: String,
}

impl KernelError {
    pub fn new(kernel: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            kernel: kernel.into(),
            reason: reason.into(),
        }
    }
}

/// Failure of a single `update` pass.
#[derive(Debug, Error)]
pub enum UpdateError {
    /// `index` is the entity's position in the whole collection, not within its batch.
    #[error("update failed at entity {index}: {source}")]
    Kernel {
        index: usize,
        #[source]
        source: KernelError,
    },

    #[error("update task for batch {batch} panicked: {message}")]
    TaskPanicked { batch: usize, message: String },

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Result type for update passes
pub type UpdateResult<T> = Result<T, UpdateError>;

/// Rejected benchmark configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("time step must be finite and positive, got {0}")]
    InvalidTimeStep(f64),

    #[error("benchmark has no scenarios")]
    NoScenarios,

    #[error("scenario `{0}` has an empty population")]
    EmptyPopulation(String),

    #[error("scenario `{0}` runs zero ticks")]
    ZeroTicks(String),

    #[error("scenario `{0}` lists no batch sizes")]
    NoBatchSizes(String),

    #[error("worker pool needs at least one thread")]
    ZeroThreads,
}
