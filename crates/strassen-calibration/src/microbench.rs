//! Micro-benchmarks for calibration.

use std::time::{Duration, Instant};

use strassen_core::generator::random_matrix;
use strassen_core::matrix::Matrix;
use strassen_core::options::Options;
use strassen_core::{naive, strassen, MatmulError};

/// Power-of-two thresholds considered by calibration.
pub const CANDIDATE_THRESHOLDS: &[usize] = &[8, 16, 32, 64, 128, 256];

/// Summary of repeated timings of one closure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub median: Duration,
    pub min: Duration,
    pub max: Duration,
    pub runs: u32,
}

/// Run `f` once to warm caches, then `runs` more times, and summarize.
pub fn time_runs<F>(runs: u32, mut f: F) -> Timing
where
    F: FnMut(),
{
    f();

    let runs = runs.max(1);
    let mut durations: Vec<Duration> = (0..runs)
        .map(|_| {
            let start = Instant::now();
            f();
            start.elapsed()
        })
        .collect();
    durations.sort_unstable();

    let mid = durations.len() / 2;
    let median = if durations.len() % 2 == 1 {
        durations[mid]
    } else {
        (durations[mid - 1] + durations[mid]) / 2
    };

    Timing {
        median,
        min: durations.first().copied().unwrap_or_default(),
        max: durations.last().copied().unwrap_or_default(),
        runs,
    }
}

/// Naive and Strassen timings for one threshold at one size.
#[derive(Debug, Clone)]
pub struct ThresholdSample {
    pub threshold: usize,
    pub matrix_size: usize,
    pub strassen: Timing,
    pub naive: Timing,
}

impl ThresholdSample {
    /// How many times faster Strassen ran than the triple loop.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn speedup(&self) -> f64 {
        let strassen_ns = self.strassen.median.as_nanos().max(1) as f64;
        self.naive.median.as_nanos() as f64 / strassen_ns
    }
}

/// Operands and destination reused across every timed run at one size.
pub struct Bench {
    n: usize,
    a: Matrix<f32>,
    b: Matrix<f32>,
    c: Matrix<f32>,
    naive: Option<Timing>,
}

impl Bench {
    /// Allocate seeded `n x n` operands.
    pub fn new(n: usize, seed: u64) -> Result<Self, MatmulError> {
        if !n.is_power_of_two() {
            return Err(MatmulError::NotPowerOfTwo(n));
        }
        Ok(Self {
            n,
            a: random_matrix(n, seed)?,
            b: random_matrix(n, seed.rotate_left(32) ^ 0x5EED)?,
            c: Matrix::zeros(n)?,
            naive: None,
        })
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.n
    }

    /// Time the triple loop once and remember it; it does not depend on the
    /// threshold.
    pub fn naive(&mut self, runs: u32) -> Result<Timing, MatmulError> {
        if let Some(timing) = self.naive {
            return Ok(timing);
        }
        let Self { n, a, b, c, .. } = self;
        let mut outcome = Ok(());
        let timing = time_runs(runs, || {
            if outcome.is_ok() {
                outcome = naive::multiply(c, a, b, *n);
            }
        });
        outcome?;
        self.naive = Some(timing);
        Ok(timing)
    }

    /// Time Strassen with the given base-case threshold.
    pub fn strassen(&mut self, threshold: usize, runs: u32) -> Result<Timing, MatmulError> {
        let opts = Options {
            base_case_threshold: threshold,
            ..Options::default()
        };
        let Self { n, a, b, c, .. } = self;
        let mut outcome = Ok(());
        let timing = time_runs(runs, || {
            if outcome.is_ok() {
                outcome = strassen::multiply_with(c, a, b, *n, &opts);
            }
        });
        outcome?;
        Ok(timing)
    }

    /// Both timings for one threshold.
    pub fn sample(&mut self, threshold: usize, runs: u32) -> Result<ThresholdSample, MatmulError> {
        let naive = self.naive(runs)?;
        let strassen = self.strassen(threshold, runs)?;
        Ok(ThresholdSample {
            threshold,
            matrix_size: self.n,
            strassen,
            naive,
        })
    }
}

/// Sample every threshold in `thresholds` at size `n`.
pub fn sweep(
    n: usize,
    thresholds: &[usize],
    runs: u32,
) -> Result<Vec<ThresholdSample>, MatmulError> {
    let mut bench = Bench::new(n, 0x00CA_11B8)?;
    thresholds
        .iter()
        .map(|&threshold| bench.sample(threshold, runs))
        .collect()
}

/// The sample with the lowest Strassen median, if any.
#[must_use]
pub fn fastest(samples: &[ThresholdSample]) -> Option<&ThresholdSample> {
    samples.iter().min_by_key(|s| s.strassen.median)
}
