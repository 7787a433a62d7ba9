//! Swarm Update Engine
//!
//! Applies a per-entity kernel across a whole entity collection once per
//! tick, either on the calling thread or as concurrently running batches.

pub mod batch;
pub mod kernel;
pub mod parallel;
pub mod sequential;

#[cfg(test)]
pub(crate) mod testing;

use crate::core::entity::Entity;
use crate::core::error::UpdateResult;

pub use batch::{BatchPlan, DEFAULT_BATCH_SIZE};
pub use kernel::{Kernel, KernelKind};
pub use parallel::ParallelUpdater;
pub use sequential::SequentialUpdater;

/// An update strategy: one full pass of a kernel over every entity.
///
/// Implementations must return only after every entity has been visited,
/// and must visit each entity exactly once per call.
pub trait Updater: Send + Sync {
    /// Short human-readable name used in benchmark output.
    fn label(&self) -> String;

    fn update_with(&self, entities: &mut [Entity], dt: f64, kernel: &dyn Kernel) -> UpdateResult<()>;

    /// Run one pass of a built-in kernel.
    fn update(&self, entities: &mut [Entity], dt: f64, kind: KernelKind) -> UpdateResult<()> {
        self.update_with(entities, dt, &kind)
    }
}
