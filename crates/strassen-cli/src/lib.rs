//! # strassen-cli
//!
//! CLI output, progress bars, and shell completion.

pub mod completion;
pub mod output;
pub mod presenter;
pub mod progress;
pub mod ui;

pub use presenter::CLIResultPresenter;
pub use progress::BarObserver;
