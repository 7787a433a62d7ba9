//! Entity data model
//!
//! Every entity has the same fixed shape: a 3D position, a 3D velocity and a
//! 100-slot auxiliary buffer that only the expensive kernel touches.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

/// Number of auxiliary values carried by every entity.
pub const AUX_LEN: usize = 100;

/// A single simulation entity, updated in place by kernels.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    pub position: [f64; 3],
    pub velocity: [f64; 3],
    pub aux_data: [f64; AUX_LEN],
}

impl Entity {
    /// Entity with the given motion state and a zeroed aux buffer.
    pub fn new(position: [f64; 3], velocity: [f64; 3]) -> Self {
        Self {
            position,
            velocity,
            aux_data: [0.0; AUX_LEN],
        }
    }

    /// Draw position, velocity and aux values uniformly from [0, 1).
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut entity = Self::new(
            [rng.gen(), rng.gen(), rng.gen()],
            [rng.gen(), rng.gen(), rng.gen()],
        );
        for aux in entity.aux_data.iter_mut() {
            *aux = rng.gen();
        }
        entity
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::new([0.0; 3], [0.0; 3])
    }
}

/// Build `count` randomized entities from the supplied RNG.
pub fn create_population<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<Entity> {
    info!("🌐 [Population] Spawning {} entities...", count);
    (0..count).map(|_| Entity::random(rng)).collect()
}

/// Reproducible population: the same seed always yields the same entities.
pub fn create_population_seeded(count: usize, seed: u64) -> Vec<Entity> {
    let mut rng = StdRng::seed_from_u64(seed);
    create_population(count, &mut rng)
}
