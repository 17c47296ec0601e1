//! strassen: reduced-memory Strassen matrix multiplication.

use tracing_subscriber::EnvFilter;

use strassen_cli::ui;
use strassen_lib::{app, config, errors};

fn main() {
    let config = config::AppConfig::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_directive()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = app::run(&config) {
        ui::print_error(&format!("{e:#}"));
        std::process::exit(errors::exit_code_for(&e));
    }
}
