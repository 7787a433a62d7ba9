//! Static batch partitioning
//!
//! A collection of `len` entities is cut into contiguous ranges of
//! `batch_size`, the last one holding the remainder. The parallel updater
//! carves its per-task slices straight from [`BatchPlan::ranges`].

use std::ops::Range;

/// Batch size used when a caller asks for zero.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Replace a zero batch size with [`DEFAULT_BATCH_SIZE`].
#[inline]
pub fn effective_batch_size(batch_size: usize) -> usize {
    if batch_size == 0 {
        DEFAULT_BATCH_SIZE
    } else {
        batch_size
    }
}

/// The partition of `len` items into batches of at most `batch_size`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BatchPlan {
    len: usize,
    batch_size: usize,
}

impl BatchPlan {
    pub fn new(len: usize, batch_size: usize) -> Self {
        Self {
            len,
            batch_size: effective_batch_size(batch_size),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// ⌈len / batch_size⌉
    pub fn count(&self) -> usize {
        self.len.div_ceil(self.batch_size)
    }

    /// Index range of batch `batch`, or `None` past the end.
    pub fn range(&self, batch: usize) -> Option<Range<usize>> {
        let start = batch.checked_mul(self.batch_size)?;
        if start >= self.len {
            return None;
        }
        Some(start..(start + self.batch_size).min(self.len))
    }

    pub fn ranges(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        (0..self.count()).filter_map(move |b| self.range(b))
    }
}
