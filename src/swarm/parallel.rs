//! Batch-Parallel Updater
//!
//! Cuts the entity slice into fixed-size contiguous batches and spawns one
//! rayon scoped task per batch. Walking the [`BatchPlan`] ranges with
//! `split_at_mut` hands every task a disjoint `&mut` slice, so entities need no locking. The scope is the join point:
//! `update` returns only once every batch task has finished.

use super::batch::{effective_batch_size, BatchPlan};
use super::kernel::Kernel;
use super::Updater;
use crate::core::entity::Entity;
use crate::core::error::{KernelError, UpdateError, UpdateResult};
use parking_lot::Mutex;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::mem;
use tracing::{debug, warn};

/// Updates entities in concurrently running fixed-size batches.
#[derive(Clone)]
pub struct ParallelUpdater {
    batch_size: usize,
    // None dispatches onto the global rayon pool.
    pool: Option<Arc<ThreadPool>>,
}

impl ParallelUpdater {
    /// A zero batch size falls back to [`super::batch::DEFAULT_BATCH_SIZE`].
    pub fn new(batch_size: usize) -> Self {
        if batch_size == 0 {
            debug!(
                "[Parallel] batch size 0 requested, using default {}",
                effective_batch_size(batch_size)
            );
        }
        Self {
            batch_size: effective_batch_size(batch_size),
            pool: None,
        }
    }

    /// Same as [`ParallelUpdater::new`] but runs batches on a private pool
    /// of `threads` workers.
    pub fn with_threads(batch_size: usize, threads: usize) -> UpdateResult<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("swarmtick-worker-{}", i))
            .build()?;
        Ok(Self {
            pool: Some(Arc::new(pool)),
            ..Self::new(batch_size)
        })
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// How `len` entities would be split by this updater.
    pub fn plan(&self, len: usize) -> BatchPlan {
        BatchPlan::new(len, self.batch_size)
    }

    fn dispatch(&self, entities: &mut [Entity], dt: f64, kernel: &dyn Kernel) -> Option<UpdateError> {
        let plan = self.plan(entities.len());
        let first_failure: Mutex<Option<UpdateError>> = Mutex::new(None);

        match &self.pool {
            Some(pool) => pool.scope(|scope| spawn_batches(scope, entities, plan, dt, kernel, &first_failure)),
            None => rayon::scope(|scope| spawn_batches(scope, entities, plan, dt, kernel, &first_failure)),
        }

        first_failure.into_inner()
    }
}

impl Updater for ParallelUpdater {
    fn label(&self) -> String {
        format!("Parallel batch={}", self.batch_size)
    }

    fn update_with(&self, entities: &mut [Entity], dt: f64, kernel: &dyn Kernel) -> UpdateResult<()> {
        debug!(
            "[Parallel] dispatching {} batches of {} for {} entities ({})",
            self.plan(entities.len()).count(),
            self.batch_size,
            entities.len(),
            kernel.name()
        );

        match self.dispatch(entities, dt, kernel) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for ParallelUpdater {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParallelUpdater")
            .field("batch_size", &self.batch_size)
            .field("threads", &self.pool.as_ref().map(|p| p.current_num_threads()))
            .finish()
    }
}

/// One scoped task per batch. A failing task records itself in
/// `failure_slot` only if no earlier failure was recorded.
fn spawn_batches<'scope>(
    scope: &rayon::Scope<'scope>,
    entities: &'scope mut [Entity],
    plan: BatchPlan,
    dt: f64,
    kernel: &'scope dyn Kernel,
    failure_slot: &'scope Mutex<Option<UpdateError>>,
) {
    let mut rest = entities;
    for (batch, range) in plan.ranges().enumerate() {
        let (chunk, tail) = mem::take(&mut rest).split_at_mut(range.len());
        rest = tail;
        let start = range.start;
        scope.spawn(move |_| {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| run_batch(chunk, dt, kernel)));
            let failure = match outcome {
                Ok(Ok(())) => return,
                Ok(Err((offset, source))) => UpdateError::Kernel {
                    index: start + offset,
                    source,
                },
                Err(payload) => UpdateError::TaskPanicked {
                    batch,
                    message: panic_message(payload.as_ref()),
                },
            };
            warn!("[Parallel] batch {} failed: {}", batch, failure);
            let mut slot = failure_slot.lock();
            if slot.is_none() {
                *slot = Some(failure);
            }
        });
    }
}

/// Apply `kernel` to one batch in order, stopping at the first rejection.
/// The error carries the offset within the batch.
fn run_batch(batch: &mut [Entity], dt: f64, kernel: &dyn Kernel) -> Result<(), (usize, KernelError)> {
    for (offset, entity) in batch.iter_mut().enumerate() {
        kernel.apply(entity, dt).map_err(|e| (offset, e))?;
    }
    Ok(())
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::create_population_seeded;
    use crate::swarm::batch::DEFAULT_BATCH_SIZE;
    use crate::swarm::kernel::KernelKind;
    use crate::swarm::sequential::SequentialUpdater;
    use crate::swarm::testing::{tagged_population, CountingKernel, FailAtKernel, PanicAtKernel};

    #[test]
    fn three_entities_cheap_tick_batch_two() {
        let mut entities = vec![Entity::new([0.0; 3], [1.0, 0.0, 0.0]); 3];
        ParallelUpdater::new(2)
            .update(&mut entities, 0.016, KernelKind::Cheap)
            .unwrap();
        for e in &entities {
            assert_eq!(e.position, [0.016, 0.0, 0.0]);
            assert_eq!(e.velocity, [1.0, 0.0, 0.0]);
        }
    }

    #[test]
    fn single_entity_expensive_tick() {
        let mut entities = vec![Entity::default()];
        ParallelUpdater::new(4)
            .update(&mut entities, 0.016, KernelKind::Expensive)
            .unwrap();
        assert_eq!(entities[0].position, [0.0; 3]);
        assert!(entities[0].aux_data.iter().all(|v| *v == 0.001));
    }

    #[test]
    fn matches_sequential_for_every_batch_size() {
        let start = create_population_seeded(40, 2024);
        for kind in [KernelKind::Cheap, KernelKind::Expensive] {
            let mut expected = start.clone();
            SequentialUpdater.update(&mut expected, 0.016, kind).unwrap();

            for batch_size in 1..=start.len() + 1 {
                let mut actual = start.clone();
                ParallelUpdater::new(batch_size)
                    .update(&mut actual, 0.016, kind)
                    .unwrap();
                assert_eq!(actual, expected, "batch_size={} kernel={:?}", batch_size, kind);
            }
        }
    }

    #[test]
    fn every_entity_updated_exactly_once() {
        let n = 33;
        for batch_size in 1..=n {
            let mut entities = vec![Entity::default(); n];
            ParallelUpdater::new(batch_size)
                .update_with(&mut entities, 0.016, &CountingKernel)
                .unwrap();
            assert!(
                entities.iter().all(|e| CountingKernel::count(e) == 1),
                "batch_size={}",
                batch_size
            );
        }
    }

    #[test]
    fn repeated_calls_apply_one_pass_each() {
        let mut entities = vec![Entity::default(); 20];
        let updater = ParallelUpdater::new(3);
        for _ in 0..5 {
            updater.update_with(&mut entities, 0.016, &CountingKernel).unwrap();
        }
        assert!(entities.iter().all(|e| CountingKernel::count(e) == 5));
    }

    #[test]
    fn zero_batch_size_falls_back_to_default() {
        let updater = ParallelUpdater::new(0);
        assert_eq!(updater.batch_size(), DEFAULT_BATCH_SIZE);

        let mut entities = vec![Entity::default(); 250];
        updater.update_with(&mut entities, 0.016, &CountingKernel).unwrap();
        assert!(entities.iter().all(|e| CountingKernel::count(e) == 1));
        assert_eq!(updater.plan(250).count(), 3);
    }

    #[test]
    fn batch_count_degeneracy() {
        assert_eq!(ParallelUpdater::new(64).plan(64).count(), 1);
        assert_eq!(ParallelUpdater::new(500).plan(64).count(), 1);
        assert_eq!(ParallelUpdater::new(1).plan(64).count(), 64);
    }

    #[test]
    fn kernel_failure_reported_after_siblings_finish() {
        let mut entities = tagged_population(20);
        let err = ParallelUpdater::new(5)
            .update_with(&mut entities, 0.016, &FailAtKernel::new(12))
            .unwrap_err();

        match err {
            UpdateError::Kernel { index, source } => {
                assert_eq!(index, 12);
                assert_eq!(source.kernel, "fail-at");
            }
            other => panic!("unexpected error: {other}"),
        }

        // Batch 2 covers 10..15 and stops at 12; every other batch completes.
        for (i, e) in entities.iter().enumerate() {
            let expected = if (12..15).contains(&i) { 0 } else { 1 };
            assert_eq!(CountingKernel::count(e), expected, "entity {}", i);
        }
    }

    #[test]
    fn failure_in_short_last_batch_reports_global_index() {
        let mut entities = tagged_population(10);
        let err = ParallelUpdater::new(4)
            .update_with(&mut entities, 0.016, &FailAtKernel::new(9))
            .unwrap_err();

        assert!(matches!(err, UpdateError::Kernel { index: 9, .. }));
        // Batches 0..4 and 4..8 complete, the last batch 8..10 stops at 9.
        for (i, e) in entities.iter().enumerate() {
            let expected = if i == 9 { 0 } else { 1 };
            assert_eq!(CountingKernel::count(e), expected, "entity {}", i);
        }
    }

    #[test]
    fn task_panic_becomes_error() {
        let mut entities = tagged_population(12);
        let err = ParallelUpdater::new(4)
            .update_with(&mut entities, 0.016, &PanicAtKernel::new(0))
            .unwrap_err();

        match err {
            UpdateError::TaskPanicked { batch, message } => {
                assert_eq!(batch, 0);
                assert!(message.contains("entity 0 exploded"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(entities[4..].iter().all(|e| CountingKernel::count(e) == 1));
    }

    #[test]
    fn private_pool_matches_global_pool() {
        let start = create_population_seeded(100, 5);
        let mut on_global = start.clone();
        let mut on_private = start;

        ParallelUpdater::new(7)
            .update(&mut on_global, 0.016, KernelKind::Expensive)
            .unwrap();
        ParallelUpdater::with_threads(7, 2)
            .unwrap()
            .update(&mut on_private, 0.016, KernelKind::Expensive)
            .unwrap();

        assert_eq!(on_global, on_private);
    }

    #[test]
    fn label_reports_batch_size() {
        assert_eq!(ParallelUpdater::new(50).label(), "Parallel batch=50");
    }
}
