//! Application entry point and dispatch.

use std::sync::Arc;

use anyhow::{Context, Result};

use strassen_calibration::calibration::{CalibrationEngine, CalibrationMode, CalibrationProgress};
use strassen_calibration::io;
use strassen_cli::output::{format_bytes, write_csv};
use strassen_cli::presenter::CLIResultPresenter;
use strassen_cli::progress::BarObserver;
use strassen_cli::ui;
use strassen_core::generator::operand_pair;
use strassen_core::memory_budget::MemoryEstimate;
use strassen_core::observer::{ProgressObserver, ProgressSubject};
use strassen_core::observers::LoggingObserver;
use strassen_core::registry::DefaultFactory;
use strassen_core::{MatmulError, Options};
use strassen_orchestration::interfaces::ResultPresenter;
use strassen_orchestration::orchestrator::{
    analyze_comparison_results, execute_multiplications_with_observer,
};
use strassen_orchestration::selection::get_multipliers_to_run;

use crate::config::AppConfig;

/// Minimum interval between logged progress updates.
const LOG_INTERVAL_MS: u64 = 100;

/// Run the application.
pub fn run(config: &AppConfig) -> Result<()> {
    if let Some(shell) = config.completion {
        let mut cmd = <AppConfig as clap::CommandFactory>::command();
        strassen_cli::completion::generate_completion(&mut cmd, shell, &mut std::io::stdout());
        return Ok(());
    }

    if config.reset_profile {
        return reset_profile(config);
    }

    if config.calibrate || config.auto_calibrate {
        return run_calibration(config);
    }

    run_cli(config)
}

/// Flag options, with the saved profile's threshold when `--use-profile` is
/// set and no explicit threshold was given.
pub fn resolve_options(config: &AppConfig) -> Result<Options, MatmulError> {
    let mut opts = config.options()?;
    if config.use_profile && opts.base_case_threshold == 0 {
        match io::load_validated_profile() {
            Some(profile) => {
                tracing::info!(
                    threshold = profile.base_case_threshold,
                    measured_at = profile.matrix_size,
                    "using calibrated threshold"
                );
                opts = profile.apply(opts);
            }
            None => tracing::warn!("no usable calibration profile, using default threshold"),
        }
    }
    Ok(opts.normalize())
}

fn run_cli(config: &AppConfig) -> Result<()> {
    let n = config.size;
    if !n.is_power_of_two() {
        return Err(MatmulError::NotPowerOfTwo(n).into());
    }
    let opts = resolve_options(config)?;

    let estimate = MemoryEstimate::estimate::<f32>(n, opts.base_case_threshold);
    if !estimate.fits_in(opts.memory_limit()) {
        return Err(MatmulError::MemoryLimit {
            required: estimate.total_bytes,
            limit: opts.memory_limit,
        }
        .into());
    }
    if config.details && !config.quiet {
        println!(
            "Memory: {} total ({} scratch; per-level temporaries would need {})",
            format_bytes(estimate.total_bytes),
            format_bytes(estimate.scratch_bytes),
            format_bytes(estimate.per_level_bytes),
        );
    }

    let factory = DefaultFactory::<f32>::new();
    let multipliers = get_multipliers_to_run(&config.algo, &factory)?;
    let (a, b) = operand_pair::<f32>(n, config.seed)?;

    let names: Vec<&str> = multipliers.iter().map(|m| m.name()).collect();
    let bars = (config.progress && !config.quiet).then(|| Arc::new(BarObserver::new(&names)));
    let observer: ProgressSubject =
        std::iter::once(Arc::new(LoggingObserver::new(LOG_INTERVAL_MS)) as Arc<dyn ProgressObserver>)
            .chain(bars.clone().map(|bars| bars as Arc<dyn ProgressObserver>))
            .collect();

    let results = execute_multiplications_with_observer(&multipliers, &a, &b, n, &opts, &observer);
    if let Some(bars) = &bars {
        bars.clear();
    }

    let presenter = CLIResultPresenter::new(config.verbose, config.quiet);
    for result in &results {
        match &result.outcome {
            Ok(_) => presenter.present_result(result, n, config.details),
            Err(e) => {
                let message = format!("{}: {e}", result.algorithm);
                ResultPresenter::<f32>::present_error(&presenter, &message);
            }
        }
    }
    if results.len() > 1 {
        presenter.present_comparison(results.as_slice());
    }

    if let Some(path) = &config.output {
        if let Some(product) = results.iter().find_map(|r| r.product()) {
            write_csv(path, product)
                .with_context(|| format!("cannot write {}", path.display()))?;
        }
    }

    if let Some(e) = results.iter().find_map(|r| r.error()) {
        return Err(e.clone().into());
    }
    if results.len() > 1 {
        analyze_comparison_results(&results, opts.tolerance)?;
    }
    Ok(())
}

fn reset_profile(config: &AppConfig) -> Result<()> {
    let removed = io::delete_profile().context("cannot delete calibration profile")?;
    if config.quiet {
        return Ok(());
    }
    match removed {
        Some(path) => ui::print_success(&format!("Removed {}", path.display())),
        None => ui::print_warning("no calibration profile to remove"),
    }
    Ok(())
}

fn run_calibration(config: &AppConfig) -> Result<()> {
    let mode = if config.calibrate {
        CalibrationMode::Full
    } else {
        CalibrationMode::Auto
    };

    let mut engine = CalibrationEngine::new(mode);
    if config.calibration_size > 0 {
        engine = engine.with_matrix_size(config.calibration_size);
    }
    if !config.quiet {
        ui::print_header("Calibration");
        engine = engine.with_progress(Box::new(|p: CalibrationProgress| {
            eprintln!("[{}/{}] {}", p.current, p.total, p.step);
        }));
    }
    let profile = engine.calibrate();

    let path = io::save_profile(&profile).context("cannot save calibration profile")?;
    if !config.quiet {
        println!("  Base-case threshold: {}", profile.base_case_threshold);
        println!("  Measured at: {}x{}", profile.matrix_size, profile.matrix_size);
        ui::print_success(&format!("Profile saved to {}", path.display()));
    }
    Ok(())
}
