//! Single-threaded baseline updater.

use super::kernel::Kernel;
use super::Updater;
use crate::core::entity::Entity;
use crate::core::error::{UpdateError, UpdateResult};

/// Applies the kernel to every entity, in order, on the calling thread.
#[derive(Clone, Copy, Debug, Default)]
pub struct SequentialUpdater;

impl SequentialUpdater {
    pub fn new() -> Self {
        SequentialUpdater
    }
}

impl Updater for SequentialUpdater {
    fn label(&self) -> String {
        "Sequential".to_string()
    }

    fn update_with(&self, entities: &mut [Entity], dt: f64, kernel: &dyn Kernel) -> UpdateResult<()> {
        for (index, entity) in entities.iter_mut().enumerate() {
            kernel
                .apply(entity, dt)
                .map_err(|source| UpdateError::Kernel { index, source })?;
        }
        Ok(())
    }
}
