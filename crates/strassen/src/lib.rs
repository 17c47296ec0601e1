//! strassen library: application logic for the `strassen` binary.

pub mod app;
pub mod config;
pub mod errors;
