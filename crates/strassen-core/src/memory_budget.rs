//! Memory budget estimation and validation.

use crate::recursive::is_base_case;

/// Memory estimate for one `n x n` multiplication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryEstimate {
    /// Both operands (in bytes).
    pub operand_bytes: usize,
    /// The destination (in bytes).
    pub result_bytes: usize,
    /// The single scratch buffer (in bytes).
    pub scratch_bytes: usize,
    /// Total estimated memory (in bytes).
    pub total_bytes: usize,
    /// Temporaries a Strassen that allocates ten sums and seven products per
    /// level would hold at its deepest point (in bytes).
    pub per_level_bytes: usize,
}

impl MemoryEstimate {
    /// Half-size temporaries per level of a textbook Strassen.
    const TEMPORARIES_PER_LEVEL: usize = 17;

    /// Estimate memory for multiplying `n x n` matrices of `T` with the given
    /// base-case threshold.
    #[must_use]
    pub fn estimate<T>(n: usize, threshold: usize) -> Self {
        let cell = std::mem::size_of::<T>();
        let square = n.saturating_mul(n).saturating_mul(cell);
        let recurses = !is_base_case(n, threshold);
        let scratch_bytes = if recurses { square } else { 0 };

        // Depth-first recursion keeps one chain of levels alive at a time.
        let mut per_level_bytes = 0usize;
        let mut extent = n;
        while extent.is_power_of_two() && !is_base_case(extent, threshold) {
            let half = extent / 2;
            let block = half.saturating_mul(half).saturating_mul(cell);
            per_level_bytes =
                per_level_bytes.saturating_add(block.saturating_mul(Self::TEMPORARIES_PER_LEVEL));
            extent = half;
        }

        let operand_bytes = square.saturating_mul(2);
        Self {
            operand_bytes,
            result_bytes: square,
            scratch_bytes,
            total_bytes: operand_bytes
                .saturating_add(square)
                .saturating_add(scratch_bytes),
            per_level_bytes,
        }
    }

    /// Check if the computation fits within the given memory limit.
    ///
    /// `None` means unlimited (always fits).
    #[must_use]
    pub fn fits_in(&self, limit: Option<usize>) -> bool {
        match limit {
            None => true,
            Some(l) => self.total_bytes <= l,
        }
    }
}

/// Parse a memory limit string (e.g., "8G", "512M", "1024K").
///
/// # Errors
///
/// Returns an error string if the format is invalid or the value overflows.
pub fn parse_memory_limit(s: &str) -> Result<usize, String> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(0);
    }

    let (num_str, multiplier) = if let Some(n) = s.strip_suffix('G') {
        (n, 1024 * 1024 * 1024)
    } else if let Some(n) = s.strip_suffix('M') {
        (n, 1024 * 1024)
    } else if let Some(n) = s.strip_suffix('K') {
        (n, 1024)
    } else if let Some(n) = s.strip_suffix('B') {
        (n, 1)
    } else {
        (s, 1)
    };

    let value: usize = num_str
        .trim()
        .parse()
        .map_err(|e| format!("invalid memory limit: {e}"))?;
    value
        .checked_mul(multiplier)
        .ok_or_else(|| format!("memory limit too large: {s}"))
}
