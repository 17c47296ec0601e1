//! # strassen-calibration
//!
//! Finds the base-case threshold that makes Strassen fastest on the current
//! machine and persists it as a calibration profile.

pub mod adaptive;
pub mod calibration;
pub mod io;
pub mod microbench;
pub mod profile;

pub use calibration::{CalibrationEngine, CalibrationMode, CalibrationProgress};
pub use io::CalibrationError;
pub use profile::CalibrationProfile;
