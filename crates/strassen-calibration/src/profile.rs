//! Calibration profile (serializable).

use serde::{Deserialize, Serialize};

use strassen_core::constants::DEFAULT_BASE_CASE_THRESHOLD;
use strassen_core::options::Options;

/// Current profile format version.
pub const PROFILE_VERSION: u32 = 1;

/// Calibration profile holding the tuned base-case threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationProfile {
    /// Profile format version for compatibility checking.
    pub version: u32,
    /// Fastest base-case threshold found.
    pub base_case_threshold: usize,
    /// Matrix size the threshold was measured at.
    pub matrix_size: usize,
    /// CPU model used for calibration.
    pub cpu_model: String,
    /// Number of CPU cores.
    pub num_cores: usize,
    /// CPU fingerprint for invalidation.
    pub cpu_fingerprint: String,
    /// Calibration timestamp.
    pub timestamp: String,
}

impl Default for CalibrationProfile {
    fn default() -> Self {
        Self {
            version: PROFILE_VERSION,
            base_case_threshold: DEFAULT_BASE_CASE_THRESHOLD,
            matrix_size: 0,
            cpu_model: String::new(),
            num_cores: num_cpus(),
            cpu_fingerprint: String::new(),
            timestamp: String::new(),
        }
    }
}

impl CalibrationProfile {
    /// Profile for the current machine with the given measurement.
    #[must_use]
    pub fn measured(base_case_threshold: usize, matrix_size: usize) -> Self {
        Self {
            version: PROFILE_VERSION,
            base_case_threshold,
            matrix_size,
            cpu_model: cpu_model(),
            num_cores: num_cpus(),
            cpu_fingerprint: cpu_fingerprint(),
            timestamp: current_timestamp(),
        }
    }

    /// Check if this profile is compatible with the current version.
    #[must_use]
    pub fn is_compatible(&self) -> bool {
        self.version == PROFILE_VERSION
    }

    /// Check if this profile matches the current CPU.
    #[must_use]
    pub fn matches_cpu(&self, current_fingerprint: &str) -> bool {
        if self.cpu_fingerprint.is_empty() || current_fingerprint.is_empty() {
            return true;
        }
        self.cpu_fingerprint == current_fingerprint
    }

    /// A threshold of zero would never reach the base case.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.base_case_threshold >= 1
    }

    /// `opts` with this profile's threshold.
    #[must_use]
    pub fn apply(&self, opts: Options) -> Options {
        Options {
            base_case_threshold: self.base_case_threshold,
            ..opts
        }
    }
}

fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(std::num::NonZero::get)
        .unwrap_or(4)
}

/// CPU fingerprint based on model and core count.
#[must_use]
pub fn cpu_fingerprint() -> String {
    let cores = num_cpus();
    let model = cpu_model();
    if model.is_empty() {
        format!("cores={cores}")
    } else {
        format!("cores={cores};model={model}")
    }
}

/// Get the current CPU model string.
#[must_use]
pub fn cpu_model() -> String {
    use sysinfo::{CpuRefreshKind, RefreshKind, System};
    let sys = System::new_with_specifics(RefreshKind::new().with_cpu(CpuRefreshKind::new()));
    sys.cpus()
        .first()
        .map(|cpu| cpu.brand().trim().to_string())
        .unwrap_or_default()
}

/// Seconds since the Unix epoch, prefixed with `unix:`.
#[must_use]
pub fn current_timestamp() -> String {
    let dur = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    format!("unix:{}", dur.as_secs())
}
