//! Constants for thresholds, tolerances and process exit codes.

/// Default extent below which the recursion switches to naive multiplication.
///
/// Blocks whose extent is strictly smaller than this value are multiplied with
/// the triple loop. The best value depends on cache sizes and floating-point
/// throughput; `strassen-calibration` measures it per machine.
pub const DEFAULT_BASE_CASE_THRESHOLD: usize = 64;

/// Default relative tolerance used when comparing two products.
pub const DEFAULT_TOLERANCE: f64 = 1e-4;

/// Number of half-size products computed at each recursion level.
pub const STRASSEN_PRODUCTS: u64 = 7;

/// Minimum progress change (1%) before an observer logs an update.
pub const PROGRESS_REPORT_THRESHOLD: f64 = 0.01;

/// Process exit codes.
pub mod exit_codes {
    /// Successful execution.
    pub const SUCCESS: i32 = 0;
    /// Generic error.
    pub const ERROR_GENERIC: i32 = 1;
    /// Products from different multipliers disagreed beyond the tolerance.
    pub const ERROR_MISMATCH: i32 = 3;
    /// Invalid configuration or input shape.
    pub const ERROR_CONFIG: i32 = 4;
}
