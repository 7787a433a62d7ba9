//! Per-entity update kernels
//!
//! Kernels mutate exactly one entity and nothing else, so any number of them
//! can run side by side on disjoint entities.

use crate::core::entity::Entity;
use crate::core::error::KernelError;
use serde::{Deserialize, Serialize};

/// A per-entity transform applied once per tick.
pub trait Kernel: Send + Sync {
    fn name(&self) -> &str;

    fn apply(&self, entity: &mut Entity, dt: f64) -> Result<(), KernelError>;
}

/// The two built-in kernels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KernelKind {
    /// Position integration only. O(1).
    Cheap,
    /// Position integration plus 100 transcendental updates of the aux buffer.
    Expensive,
}

impl KernelKind {
    /// Map the boolean "use expensive kernel" flag.
    pub fn from_expensive(use_expensive: bool) -> Self {
        if use_expensive {
            KernelKind::Expensive
        } else {
            KernelKind::Cheap
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            KernelKind::Cheap => "simple",
            KernelKind::Expensive => "complex",
        }
    }

    #[inline]
    pub fn run(self, entity: &mut Entity, dt: f64) {
        match self {
            KernelKind::Cheap => integrate(entity, dt),
            KernelKind::Expensive => churn(entity, dt),
        }
    }
}

impl Kernel for KernelKind {
    fn name(&self) -> &str {
        self.label()
    }

    #[inline]
    fn apply(&self, entity: &mut Entity, dt: f64) -> Result<(), KernelError> {
        self.run(entity, dt);
        Ok(())
    }
}

/// Cheap kernel: `position += velocity * dt` on each axis.
#[inline]
pub fn integrate(entity: &mut Entity, dt: f64) {
    for (p, v) in entity.position.iter_mut().zip(entity.velocity.iter()) {
        *p += v * dt;
    }
}

/// Expensive kernel: integrate, then run every aux value through
/// `sqrt(|sin(aux) * cos(x)|) + 0.001`.
#[inline]
pub fn churn(entity: &mut Entity, dt: f64) {
    integrate(entity, dt);

    let cos_x = entity.position[0].cos();
    for aux in entity.aux_data.iter_mut() {
        let mixed = aux.sin() * cos_x;
        *aux = mixed.abs().sqrt() + 0.001;
    }
}
