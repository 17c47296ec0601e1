//! Calibration engine.

use std::path::PathBuf;

use crate::adaptive;
use crate::io;
use crate::microbench::{self, CANDIDATE_THRESHOLDS};
use crate::profile::CalibrationProfile;

/// Matrix size timed by a full calibration.
pub const FULL_SIZE: usize = 512;

/// Timed runs per threshold in a full calibration.
const FULL_RUNS: u32 = 5;

/// Mode of calibration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationMode {
    /// Time every candidate threshold at a large size.
    Full,
    /// Quick adaptive search at a small size.
    Auto,
    /// Load from the profile file.
    Cached,
}

/// Progress callback for calibration.
pub type ProgressCallback = Box<dyn Fn(CalibrationProgress) + Send>;

/// Progress information during calibration.
#[derive(Debug, Clone)]
pub struct CalibrationProgress {
    /// Current step name.
    pub step: String,
    /// Current step number (1-based).
    pub current: usize,
    /// Total number of steps.
    pub total: usize,
}

/// Calibration engine that determines the best base-case threshold.
pub struct CalibrationEngine {
    mode: CalibrationMode,
    matrix_size: Option<usize>,
    profile_path: Option<PathBuf>,
    progress_cb: Option<ProgressCallback>,
}

impl CalibrationEngine {
    /// Create a new calibration engine.
    #[must_use]
    pub fn new(mode: CalibrationMode) -> Self {
        Self {
            mode,
            matrix_size: None,
            profile_path: None,
            progress_cb: None,
        }
    }

    /// Set a progress callback.
    #[must_use]
    pub fn with_progress(mut self, cb: ProgressCallback) -> Self {
        self.progress_cb = Some(cb);
        self
    }

    /// Time at size `n` instead of the mode's default size.
    #[must_use]
    pub fn with_matrix_size(mut self, n: usize) -> Self {
        self.matrix_size = Some(n);
        self
    }

    /// Read cached profiles from `path` instead of the standard locations.
    #[must_use]
    pub fn with_profile_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.profile_path = Some(path.into());
        self
    }

    /// Run calibration and produce a profile.
    #[must_use]
    pub fn calibrate(&self) -> CalibrationProfile {
        match self.mode {
            CalibrationMode::Full => self.full_calibration(),
            CalibrationMode::Auto => self.auto_calibration(),
            CalibrationMode::Cached => self.load_cached(),
        }
    }

    fn report_progress(&self, step: &str, current: usize, total: usize) {
        if let Some(cb) = &self.progress_cb {
            cb(CalibrationProgress {
                step: step.to_string(),
                current,
                total,
            });
        }
    }

    fn full_calibration(&self) -> CalibrationProfile {
        let n = self.matrix_size.unwrap_or(FULL_SIZE);
        let total_steps = CANDIDATE_THRESHOLDS.len() + 1;

        self.report_progress("Timing naive multiplication", 1, total_steps);
        let mut bench = match microbench::Bench::new(n, 0xF0_11CA) {
            Ok(bench) => bench,
            Err(e) => {
                tracing::warn!(size = n, error = %e, "full calibration failed, using defaults");
                return CalibrationProfile::default();
            }
        };

        let mut samples = Vec::with_capacity(CANDIDATE_THRESHOLDS.len());
        for (i, &threshold) in CANDIDATE_THRESHOLDS.iter().enumerate() {
            self.report_progress(
                &format!("Timing Strassen with threshold {threshold}"),
                i + 2,
                total_steps,
            );
            match bench.sample(threshold, FULL_RUNS) {
                Ok(sample) => {
                    tracing::debug!(
                        threshold,
                        size = n,
                        median_us = sample.strassen.median.as_micros(),
                        speedup = sample.speedup(),
                        "calibration sample"
                    );
                    samples.push(sample);
                }
                Err(e) => tracing::warn!(threshold, error = %e, "calibration sample failed"),
            }
        }

        match microbench::fastest(&samples) {
            Some(best) => CalibrationProfile::measured(best.threshold, n),
            None => CalibrationProfile::default(),
        }
    }

    fn auto_calibration(&self) -> CalibrationProfile {
        let total_steps = 2;

        self.report_progress("Running adaptive estimation", 1, total_steps);
        let est = match self.matrix_size {
            Some(n) => adaptive::estimate_threshold_at(n),
            None => adaptive::estimate_threshold(),
        };

        self.report_progress("Building profile", 2, total_steps);
        CalibrationProfile::measured(est.base_case_threshold, est.matrix_size)
    }

    fn load_cached(&self) -> CalibrationProfile {
        let loaded = match &self.profile_path {
            Some(path) => match io::load_from_path(path) {
                Ok(p) => Some(p),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "cannot read cached profile, using defaults");
                    None
                }
            },
            None => io::load_profile(),
        };
        loaded
            .and_then(io::validated)
            .unwrap_or_default()
    }
}
