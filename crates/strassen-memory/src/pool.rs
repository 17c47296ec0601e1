//! Scratch buffer pool with size classes for buffer reuse.

use std::collections::hash_map::HashMap;
use std::collections::TryReserveError;

use parking_lot::Mutex;

use crate::lease::BufferLease;
use crate::stats::{AtomicPoolStats, PoolStats};

/// Smallest size class, in elements.
const MIN_CLASS: usize = 64;

/// Pool of flat element buffers, organized by size class (power of 4).
///
/// Square power-of-two matrices have `n * n` elements, which is always a
/// power of 4, so a scratch buffer for extent `n` lands exactly on a class
/// boundary and is reused without slack.
///
/// Buffers handed out from the pool are *not* cleared: a reused buffer keeps
/// whatever the previous holder left in it. Callers that need zeroed memory
/// must clear it themselves.
pub struct BufferPool<T> {
    pools: Mutex<HashMap<usize, Vec<Vec<T>>>>,
    max_len: usize,
    max_per_class: usize,
    stats: AtomicPoolStats,
}

impl<T: Copy + Default> BufferPool<T> {
    /// Create a new pool.
    ///
    /// Buffers longer than `max_len` elements are never retained, and each
    /// size class holds at most `max_per_class` buffers.
    #[must_use]
    pub fn new(max_len: usize, max_per_class: usize) -> Self {
        Self {
            pools: Mutex::new(HashMap::new()),
            max_len,
            max_per_class,
            stats: AtomicPoolStats::new(),
        }
    }

    /// Take a buffer of exactly `len` elements from the pool, or allocate one.
    ///
    /// Freshly allocated buffers are filled with `T::default()`; reused ones
    /// keep their previous contents.
    pub fn try_acquire(&self, len: usize) -> Result<Vec<T>, TryReserveError> {
        let class = Self::size_class(len);
        let reused = self.pools.lock().get_mut(&class).and_then(Vec::pop);

        if let Some(mut buf) = reused {
            self.stats.record_hit();
            tracing::trace!(len, class, "scratch pool hit");
            buf.resize(len, T::default());
            return Ok(buf);
        }

        self.stats.record_miss();
        tracing::trace!(len, class, "scratch pool miss");
        let mut buf = Vec::new();
        buf.try_reserve_exact(class)?;
        buf.resize(len, T::default());
        Ok(buf)
    }

    /// Lease a buffer of `len` elements; it returns to this pool when dropped.
    pub fn lease(&self, len: usize) -> Result<BufferLease<'_, T>, TryReserveError> {
        let buf = self.try_acquire(len)?;
        Ok(BufferLease::new(self, buf))
    }

    /// Return a buffer to the pool.
    pub fn release(&self, buf: Vec<T>) {
        let capacity = buf.capacity();
        if capacity > self.max_len || capacity < MIN_CLASS {
            self.stats.record_eviction();
            return;
        }

        let class = Self::fitting_class(capacity);
        let mut pools = self.pools.lock();
        let pool = pools.entry(class).or_default();
        if pool.len() < self.max_per_class {
            pool.push(buf);
        } else {
            self.stats.record_eviction();
        }
    }

    /// Smallest class that can hold `len` elements (round up to a power of 4).
    fn size_class(len: usize) -> usize {
        let mut class = MIN_CLASS;
        while class < len {
            class *= 4;
        }
        class
    }

    /// Largest class a buffer with the given capacity can serve.
    fn fitting_class(capacity: usize) -> usize {
        let mut class = MIN_CLASS;
        while class.saturating_mul(4) <= capacity {
            class *= 4;
        }
        class
    }

    /// Get total number of pooled buffers.
    #[must_use]
    pub fn total_pooled(&self) -> usize {
        self.pools.lock().values().map(Vec::len).sum()
    }

    /// Get a snapshot of pool statistics.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        self.stats.snapshot()
    }

    /// Reset pool statistics counters.
    pub fn reset_stats(&self) {
        self.stats.reset();
    }
}

impl<T: Copy + Default> Default for BufferPool<T> {
    /// Retains buffers up to 4096 x 4096 elements, four per class.
    fn default() -> Self {
        Self::new(4096 * 4096, 4)
    }
}
