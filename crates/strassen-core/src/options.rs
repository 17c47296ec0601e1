//! Multiplication options and configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_BASE_CASE_THRESHOLD, DEFAULT_TOLERANCE};

/// Where the driver takes its scratch buffer from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScratchMode {
    /// Allocate a zeroed buffer for every call and free it on return.
    #[default]
    Fresh,
    /// Lease a buffer from the multiplier's pool and hand it back on return.
    /// Reused buffers are not cleared.
    Pooled,
}

impl fmt::Display for ScratchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fresh => f.write_str("fresh"),
            Self::Pooled => f.write_str("pooled"),
        }
    }
}

impl FromStr for ScratchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fresh" => Ok(Self::Fresh),
            "pooled" => Ok(Self::Pooled),
            other => Err(format!("unknown scratch mode: {other}")),
        }
    }
}

/// Options for one multiplication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Options {
    /// Blocks with a smaller extent are multiplied naively.
    pub base_case_threshold: usize,
    /// Scratch buffer source.
    pub scratch: ScratchMode,
    /// Relative tolerance for comparing products.
    pub tolerance: f64,
    /// Memory limit in bytes (0 = unlimited).
    pub memory_limit: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            base_case_threshold: DEFAULT_BASE_CASE_THRESHOLD,
            scratch: ScratchMode::Fresh,
            tolerance: DEFAULT_TOLERANCE,
            memory_limit: 0,
        }
    }
}

impl Options {
    /// Normalize options, applying defaults where values are zero or unusable.
    #[must_use]
    pub fn normalize(mut self) -> Self {
        self.base_case_threshold = self.threshold();
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            self.tolerance = DEFAULT_TOLERANCE;
        }
        self
    }

    /// Base-case threshold in effect, 0 reading as the default.
    #[must_use]
    pub fn threshold(&self) -> usize {
        if self.base_case_threshold == 0 {
            DEFAULT_BASE_CASE_THRESHOLD
        } else {
            self.base_case_threshold
        }
    }

    /// Memory limit as an option, `None` meaning unlimited.
    #[must_use]
    pub fn memory_limit(&self) -> Option<usize> {
        (self.memory_limit > 0).then_some(self.memory_limit)
    }
}
