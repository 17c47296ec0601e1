//! Scoped ownership of a pooled buffer.

use std::ops::{Deref, DerefMut};

use crate::pool::BufferPool;

/// A buffer borrowed from a [`BufferPool`].
///
/// The buffer goes back to its pool when the lease is dropped, including
/// during unwinding, so a scratch area is never leaked by an early return.
pub struct BufferLease<'p, T: Copy + Default> {
    pool: &'p BufferPool<T>,
    buf: Vec<T>,
}

impl<'p, T: Copy + Default> BufferLease<'p, T> {
    pub(crate) fn new(pool: &'p BufferPool<T>, buf: Vec<T>) -> Self {
        Self { pool, buf }
    }
}

impl<T: Copy + Default> Deref for BufferLease<'_, T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.buf
    }
}

impl<T: Copy + Default> DerefMut for BufferLease<'_, T> {
    fn deref_mut(&mut self) -> &mut [T] {
        &mut self.buf
    }
}

impl<T: Copy + Default> Drop for BufferLease<'_, T> {
    fn drop(&mut self) {
        self.pool.release(std::mem::take(&mut self.buf));
    }
}
