//! CLI result presenter.

use strassen_core::Scalar;
use strassen_orchestration::interfaces::{MultiplicationResult, ResultPresenter};

use crate::output::{format_duration, format_number, format_preview, gflops};

/// Corner shown by default; `--verbose` widens it.
const PREVIEW_CORNER: usize = 4;
const VERBOSE_PREVIEW_CORNER: usize = 8;

/// CLI result presenter.
pub struct CLIResultPresenter {
    verbose: bool,
    quiet: bool,
}

impl CLIResultPresenter {
    #[must_use]
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    /// The lines `present_result` prints.
    #[must_use]
    pub fn render_result<T: Scalar>(
        &self,
        result: &MultiplicationResult<T>,
        n: usize,
        details: bool,
    ) -> Vec<String> {
        let product = match &result.outcome {
            Ok(product) => product,
            Err(e) => return vec![format!("{}: {e}", result.algorithm)],
        };

        if self.quiet {
            return vec![format!("{}", product.checksum())];
        }

        let mut lines = vec![
            format!("Algorithm: {}", result.algorithm),
            format!("Size: {n}x{n}"),
            format!("Duration: {}", format_duration(result.duration)),
        ];
        if details {
            lines.push(format!(
                "Cells: {}",
                format_number(u64::try_from(n.saturating_mul(n)).unwrap_or(u64::MAX))
            ));
            lines.push(format!(
                "Throughput: {:.2} GFLOP/s (2n^3 basis)",
                gflops(n, result.duration)
            ));
        }
        lines.push(format!("Checksum: {}", product.checksum()));

        let corner = if self.verbose {
            VERBOSE_PREVIEW_CORNER
        } else {
            PREVIEW_CORNER
        };
        lines.push(format!("C[0..{}, 0..{}]:", corner.min(n), corner.min(n)));
        lines.extend(format_preview(product, corner).lines().map(str::to_string));
        lines
    }

    /// The lines `present_comparison` prints.
    #[must_use]
    pub fn render_comparison<T: Scalar>(&self, results: &[MultiplicationResult<T>]) -> Vec<String> {
        if self.quiet {
            return Vec::new();
        }

        let reference = results.iter().find_map(MultiplicationResult::product);
        let mut lines = vec![String::new(), "Comparison Results:".to_string(), format!("{:-<60}", "")];
        for result in results {
            let status = match (&result.outcome, reference) {
                (Err(_), _) => "ERROR".to_string(),
                (Ok(product), Some(reference)) => {
                    format!("OK  rel.err {:.2e}", product.relative_error(reference).to_f64_lossy())
                }
                (Ok(_), None) => "OK".to_string(),
            };
            lines.push(format!(
                "  {:<20} {:>10} [{status}]",
                result.algorithm,
                format_duration(result.duration),
            ));
        }
        lines
    }
}

impl<T: Scalar> ResultPresenter<T> for CLIResultPresenter {
    fn present_result(&self, result: &MultiplicationResult<T>, n: usize, details: bool) {
        for line in self.render_result(result, n, details) {
            println!("{line}");
        }
    }

    fn present_comparison(&self, results: &[MultiplicationResult<T>]) {
        for line in self.render_comparison(results) {
            println!("{line}");
        }
    }

    fn present_error(&self, error: &str) {
        eprintln!("Error: {error}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use strassen_core::{MatmulError, Matrix};

    fn result(algorithm: &str, outcome: Result<Matrix<f32>, MatmulError>) -> MultiplicationResult {
        MultiplicationResult {
            algorithm: algorithm.into(),
            outcome,
            duration: Duration::from_millis(5),
        }
    }

    fn product() -> Matrix<f32> {
        Matrix::from_rows(&[vec![19.0, 22.0], vec![43.0, 50.0]]).unwrap()
    }

    #[test]
    fn quiet_prints_checksum_only() {
        let presenter = CLIResultPresenter::new(false, true);
        let lines = presenter.render_result(&result("Strassen", Ok(product())), 2, true);
        assert_eq!(lines, vec!["134".to_string()]);
    }

    #[test]
    fn normal_result_has_summary_and_preview() {
        let presenter = CLIResultPresenter::new(false, false);
        let lines = presenter.render_result(&result("Strassen", Ok(product())), 2, false);
        assert_eq!(lines[0], "Algorithm: Strassen");
        assert_eq!(lines[1], "Size: 2x2");
        assert!(lines.iter().any(|l| l == "Checksum: 134"));
        assert!(lines.iter().any(|l| l == "C[0..2, 0..2]:"));
        assert!(!lines.iter().any(|l| l.starts_with("Throughput")));
    }

    #[test]
    fn details_add_throughput() {
        let presenter = CLIResultPresenter::new(true, false);
        let lines = presenter.render_result(&result("Naive", Ok(product())), 2, true);
        assert!(lines.iter().any(|l| l == "Cells: 4"));
        assert!(lines.iter().any(|l| l.starts_with("Throughput:")));
    }

    #[test]
    fn failed_result_prints_error() {
        let presenter = CLIResultPresenter::new(false, false);
        let lines =
            presenter.render_result(&result("Strassen", Err(MatmulError::NotPowerOfTwo(3))), 3, false);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("Strassen: "));
        assert!(lines[0].contains('3'));
    }

    #[test]
    fn comparison_quiet_is_empty() {
        let presenter = CLIResultPresenter::new(false, true);
        assert!(presenter
            .render_comparison(&[result("Naive", Ok(product()))])
            .is_empty());
    }

    #[test]
    fn comparison_marks_errors() {
        let presenter = CLIResultPresenter::new(false, false);
        let lines = presenter.render_comparison(&[
            result("Naive", Ok(product())),
            result("Strassen", Err(MatmulError::Allocation { elements: 4 })),
        ]);
        assert_eq!(lines.len(), 5);
        assert!(lines[3].contains("Naive") && lines[3].contains("rel.err 0.00e0"));
        assert!(lines[4].contains("Strassen") && lines[4].contains("[ERROR]"));
    }

    #[test]
    fn comparison_empty() {
        let presenter = CLIResultPresenter::new(false, false);
        let results: Vec<MultiplicationResult> = Vec::new();
        assert_eq!(presenter.render_comparison(&results).len(), 3);
    }

    #[test]
    fn present_does_not_panic() {
        let presenter = CLIResultPresenter::new(false, false);
        let r = result("Strassen", Ok(product()));
        presenter.present_result(&r, 2, true);
        ResultPresenter::<f32>::present_comparison(&presenter, std::slice::from_ref(&r));
        ResultPresenter::<f32>::present_error(&presenter, "boom");
    }
}
