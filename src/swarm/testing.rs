//! Instrumented kernels shared by the updater tests.
//!
//! Counters live inside the entity itself (aux slot 0) so the kernels keep
//! the no-shared-state contract. Entities are identified by `position[1]`.

use super::kernel::Kernel;
use crate::core::entity::Entity;
use crate::core::error::KernelError;

/// `n` zeroed entities whose `position[1]` holds their index.
pub fn tagged_population(n: usize) -> Vec<Entity> {
    (0..n)
        .map(|i| Entity::new([0.0, i as f64, 0.0], [0.0; 3]))
        .collect()
}

fn tag(entity: &Entity) -> usize {
    entity.position[1] as usize
}

/// Bumps aux slot 0 on every call.
pub struct CountingKernel;

impl CountingKernel {
    pub fn count(entity: &Entity) -> u32 {
        entity.aux_data[0] as u32
    }
}

impl Kernel for CountingKernel {
    fn name(&self) -> &str {
        "counting"
    }

    fn apply(&self, entity: &mut Entity, _dt: f64) -> Result<(), KernelError> {
        entity.aux_data[0] += 1.0;
        Ok(())
    }
}

/// Counts like [`CountingKernel`] but rejects the entity tagged `target`.
pub struct FailAtKernel {
    target: usize,
}

impl FailAtKernel {
    pub fn new(target: usize) -> Self {
        Self { target }
    }
}

impl Kernel for FailAtKernel {
    fn name(&self) -> &str {
        "fail-at"
    }

    fn apply(&self, entity: &mut Entity, dt: f64) -> Result<(), KernelError> {
        if tag(entity) == self.target {
            return Err(KernelError::new(self.name(), format!("entity {} rejected", self.target)));
        }
        CountingKernel.apply(entity, dt)
    }
}

/// Counts like [`CountingKernel`] but panics on the entity tagged `target`.
pub struct PanicAtKernel {
    target: usize,
}

impl PanicAtKernel {
    pub fn new(target: usize) -> Self {
        Self { target }
    }
}

impl Kernel for PanicAtKernel {
    fn name(&self) -> &str {
        "panic-at"
    }

    fn apply(&self, entity: &mut Entity, dt: f64) -> Result<(), KernelError> {
        if tag(entity) == self.target {
            panic!("entity {} exploded", self.target);
        }
        CountingKernel.apply(entity, dt)
    }
}
