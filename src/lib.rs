//! Shared fixtures for the workspace-level integration tests.

pub use strassen_core::generator::operand_pair;

/// Seed used by the integration tests unless a test needs its own.
pub const DEFAULT_SEED: u64 = 0x5EED_0F57_12A5_5E00;
