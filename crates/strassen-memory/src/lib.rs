//! # strassen-memory
//!
//! Scratch buffer management for the `strassen-rs` workspace.
//!
//! Provides a size-classed pool of flat element buffers, a lease that hands
//! its buffer back to the pool when dropped, and lock-free usage statistics.
#![warn(missing_docs)]

pub mod lease;
pub mod pool;
pub mod stats;

pub use lease::BufferLease;
pub use pool::BufferPool;
pub use stats::PoolStats;
