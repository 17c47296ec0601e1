//! Application configuration from CLI flags and environment.

use std::path::PathBuf;

use clap::Parser;

use strassen_core::memory_budget::parse_memory_limit;
use strassen_core::{MatmulError, Options, ScratchMode, DEFAULT_TOLERANCE};

/// Seed used when `--seed` is not given.
pub const DEFAULT_SEED: u64 = 42;

/// strassen: reduced-memory Strassen matrix multiplication.
#[derive(Parser, Debug)]
#[command(name = "strassen", version, about)]
#[allow(clippy::struct_excessive_bools)]
pub struct AppConfig {
    /// Matrix size (a power of two).
    #[arg(short = 'n', long = "size", default_value_t = 512, env = "STRASSEN_N")]
    pub size: usize,

    /// Algorithm to use: naive, strassen, or all.
    #[arg(long, default_value = "all")]
    pub algo: String,

    /// Extent below which Strassen switches to the triple loop (0 = default).
    #[arg(long, default_value_t = 0, env = "STRASSEN_THRESHOLD")]
    pub threshold: usize,

    /// Seed for the random operands.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Scratch buffer source: fresh or pooled.
    #[arg(long, default_value = "fresh")]
    pub scratch: ScratchMode,

    /// Relative tolerance when comparing products.
    #[arg(long, default_value_t = DEFAULT_TOLERANCE)]
    pub tolerance: f64,

    /// Memory limit (e.g., "8G", "512M").
    #[arg(long, default_value = "")]
    pub memory_limit: String,

    /// Run full calibration and save the profile.
    #[arg(long)]
    pub calibrate: bool,

    /// Run quick adaptive calibration and save the profile.
    #[arg(long)]
    pub auto_calibrate: bool,

    /// Matrix size timed during calibration (0 = mode default).
    #[arg(long, default_value_t = 0)]
    pub calibration_size: usize,

    /// Use the threshold from the saved calibration profile.
    #[arg(long)]
    pub use_profile: bool,

    /// Delete the saved calibration profile and exit.
    #[arg(long, conflicts_with_all = ["calibrate", "auto_calibrate", "use_profile"])]
    pub reset_profile: bool,

    /// Show progress bars.
    #[arg(long)]
    pub progress: bool,

    /// Generate shell completion.
    #[arg(long, value_enum)]
    pub completion: Option<clap_complete::Shell>,

    /// Write the product as CSV to this path.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Quiet mode (only output the checksum).
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbose output and debug logging.
    #[arg(short, long)]
    pub verbose: bool,

    /// Show detailed information.
    #[arg(short, long)]
    pub details: bool,
}

impl AppConfig {
    /// Parse CLI arguments.
    #[must_use]
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Multiplication options from the flags, before any profile is applied.
    pub fn options(&self) -> Result<Options, MatmulError> {
        let memory_limit = parse_memory_limit(&self.memory_limit).map_err(MatmulError::Config)?;
        Ok(Options {
            base_case_threshold: self.threshold,
            scratch: self.scratch,
            tolerance: self.tolerance,
            memory_limit,
        })
    }

    /// Default tracing directive when `RUST_LOG` is unset.
    #[must_use]
    pub fn log_directive(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "warn"
        }
    }
}
