//! Terminal progress bars fed by multiplier progress updates.

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};

use strassen_core::constants::STRASSEN_PRODUCTS;
use strassen_core::observer::ProgressObserver;
use strassen_core::progress::ProgressUpdate;

const TEMPLATE: &str = "{spinner:.green} {prefix:<10} [{elapsed_precise}] [{bar:30.cyan/blue}] {pos}/{len} {msg}";

/// One bar per multiplier, indexed by `calc_index`.
pub struct BarObserver {
    multi: MultiProgress,
    bars: Vec<ProgressBar>,
}

impl BarObserver {
    /// Bars labelled with `algorithms`, drawn to stderr.
    #[must_use]
    pub fn new(algorithms: &[&str]) -> Self {
        Self::with_target(algorithms, ProgressDrawTarget::stderr())
    }

    /// Bars that track progress without drawing anything.
    #[must_use]
    pub fn hidden(algorithms: &[&str]) -> Self {
        Self::with_target(algorithms, ProgressDrawTarget::hidden())
    }

    fn with_target(algorithms: &[&str], target: ProgressDrawTarget) -> Self {
        let multi = MultiProgress::with_draw_target(target);
        let style = ProgressStyle::default_bar()
            .template(TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        let bars = algorithms
            .iter()
            .map(|name| {
                let bar = multi.add(ProgressBar::new(STRASSEN_PRODUCTS));
                bar.set_style(style.clone());
                bar.set_prefix((*name).to_string());
                bar
            })
            .collect();
        Self { multi, bars }
    }

    /// Position of the bar for `calc_index`.
    #[must_use]
    pub fn position(&self, calc_index: usize) -> Option<u64> {
        self.bars.get(calc_index).map(ProgressBar::position)
    }

    /// Whether the bar for `calc_index` has finished.
    #[must_use]
    pub fn is_finished(&self, calc_index: usize) -> bool {
        self.bars.get(calc_index).is_some_and(ProgressBar::is_finished)
    }

    /// Remove every bar from the terminal.
    pub fn clear(&self) {
        for bar in &self.bars {
            bar.finish_and_clear();
        }
        if let Err(e) = self.multi.clear() {
            tracing::debug!(error = %e, "cannot clear progress bars");
        }
    }
}

impl ProgressObserver for BarObserver {
    fn on_progress(&self, update: &ProgressUpdate) {
        let Some(bar) = self.bars.get(update.calc_index) else {
            return;
        };
        if update.done {
            bar.set_position(bar.length().unwrap_or(STRASSEN_PRODUCTS));
            bar.finish_with_message("done");
            return;
        }
        if update.total_steps > 0 && bar.length() != Some(update.total_steps) {
            bar.set_length(update.total_steps);
        }
        bar.set_position(update.current_step);
        bar.set_message(format!("{:.0}%", update.progress * 100.0));
    }
}
