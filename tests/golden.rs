//! Golden file integration tests.
//!
//! Reads tests/testdata/strassen_golden.json and verifies that every route
//! into the multiplier reproduces the known products exactly.

use serde::Deserialize;

use strassen_core::naive;
use strassen_core::observers::NoOpObserver;
use strassen_core::registry::DefaultFactory;
use strassen_core::strassen::{self, StrassenMultiplier};
use strassen_core::{Matrix, Multiplier, NaiveMultiplier, Options, Scalar, ScheduleChecker, ScratchMode};
use strassen_orchestration::orchestrator::{analyze_comparison_results, execute_multiplications};
use strassen_orchestration::selection::get_multipliers_to_run;

// ---------------------------------------------------------------------------
// Golden data structures
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct GoldenData {
    #[allow(dead_code)]
    description: String,
    cases: Vec<GoldenCase>,
}

#[derive(Deserialize)]
struct GoldenCase {
    name: String,
    n: usize,
    a: Vec<Vec<i64>>,
    b: Vec<Vec<i64>>,
    c: Vec<Vec<i64>>,
}

impl GoldenCase {
    fn operands<T: Scalar>(&self) -> (Matrix<T>, Matrix<T>, Matrix<T>) {
        (to_matrix(&self.a), to_matrix(&self.b), to_matrix(&self.c))
    }
}

#[allow(clippy::cast_precision_loss)]
fn to_matrix<T: Scalar>(rows: &[Vec<i64>]) -> Matrix<T> {
    let rows: Vec<Vec<T>> = rows
        .iter()
        .map(|row| row.iter().map(|&v| T::from_f64_lossy(v as f64)).collect())
        .collect();
    Matrix::from_rows(&rows).expect("golden rows must be square")
}

fn load_golden_data() -> GoldenData {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/testdata/strassen_golden.json");
    let data = std::fs::read_to_string(path).expect("failed to read golden file");
    serde_json::from_str(&data).expect("failed to parse golden JSON")
}

/// Thresholds from "recurse down to 1x1" up to the default.
const THRESHOLDS: [usize; 5] = [1, 2, 4, 8, 64];

fn with_threshold(threshold: usize) -> Options {
    Options {
        base_case_threshold: threshold,
        ..Options::default()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn golden_data_is_consistent() {
    let data = load_golden_data();
    assert!(!data.cases.is_empty());
    for case in &data.cases {
        assert!(case.n.is_power_of_two(), "{}", case.name);
        for rows in [&case.a, &case.b, &case.c] {
            assert_eq!(rows.len(), case.n, "{}", case.name);
            assert!(rows.iter().all(|r| r.len() == case.n), "{}", case.name);
        }
    }
}

#[test]
fn classic_two_by_two_fully_recursed() {
    let data = load_golden_data();
    let case = data
        .cases
        .iter()
        .find(|c| c.name == "classic_2x2")
        .expect("classic case present");
    let (a, b, expected) = case.operands::<f32>();
    let mut c = Matrix::zeros(2).unwrap();
    strassen::multiply_with(&mut c, &a, &b, 2, &with_threshold(1)).unwrap();
    assert_eq!(c.as_slice(), &[19.0, 22.0, 43.0, 50.0]);
    assert_eq!(c, expected);
}

#[test]
fn strassen_matches_golden_f32() {
    for case in load_golden_data().cases {
        let (a, b, expected) = case.operands::<f32>();
        for threshold in THRESHOLDS {
            let mut c = Matrix::zeros(case.n).unwrap();
            strassen::multiply_with(&mut c, &a, &b, case.n, &with_threshold(threshold)).unwrap();
            assert_eq!(c, expected, "{} at threshold {threshold}", case.name);
        }
    }
}

#[test]
fn strassen_matches_golden_f64() {
    for case in load_golden_data().cases {
        let (a, b, expected) = case.operands::<f64>();
        for threshold in THRESHOLDS {
            let mut c = Matrix::zeros(case.n).unwrap();
            strassen::multiply_with(&mut c, &a, &b, case.n, &with_threshold(threshold)).unwrap();
            assert_eq!(c, expected, "{} at threshold {threshold}", case.name);
        }
    }
}

#[test]
fn naive_matches_golden() {
    for case in load_golden_data().cases {
        let (a, b, expected) = case.operands::<f64>();
        let mut c = Matrix::zeros(case.n).unwrap();
        naive::multiply(&mut c, &a, &b, case.n).unwrap();
        assert_eq!(c, expected, "{}", case.name);

        let product = NaiveMultiplier::new()
            .multiply(&NoOpObserver::new(), 0, &a, &b, case.n, &Options::default())
            .unwrap();
        assert_eq!(product, expected, "{}", case.name);
    }
}

#[test]
fn golden_schedule_is_clean() {
    for case in load_golden_data().cases {
        let (a, b, expected) = case.operands::<f32>();
        let mut c = Matrix::zeros(case.n).unwrap();
        let mut checker = ScheduleChecker::new(case.n);
        strassen::multiply_hooked(&mut c, &a, &b, case.n, &with_threshold(1), &mut checker).unwrap();
        assert_eq!(c, expected, "{}", case.name);
        if let Err(violations) = checker.finish() {
            panic!("{}: {} schedule violations, first: {}", case.name, violations.len(), violations[0]);
        }
    }
}

#[test]
fn pooled_multiplier_matches_golden() {
    let multiplier = StrassenMultiplier::<f32>::new();
    let opts = Options {
        base_case_threshold: 2,
        scratch: ScratchMode::Pooled,
        ..Options::default()
    };
    // Two passes so the second one runs on dirty, reused scratch.
    for _ in 0..2 {
        for case in load_golden_data().cases {
            let (a, b, expected) = case.operands::<f32>();
            let product = multiplier
                .multiply(&NoOpObserver::new(), 0, &a, &b, case.n, &opts)
                .unwrap();
            assert_eq!(product, expected, "{}", case.name);
        }
    }
}

#[test]
fn orchestrated_comparison_matches_golden() {
    let factory = DefaultFactory::<f32>::new();
    let multipliers = get_multipliers_to_run("all", &factory).unwrap();
    let opts = with_threshold(2);
    for case in load_golden_data().cases {
        let (a, b, expected) = case.operands::<f32>();
        let results = execute_multiplications(&multipliers, &a, &b, case.n, &opts);
        assert_eq!(results.len(), 2);
        for result in &results {
            assert_eq!(result.product(), Some(&expected), "{} via {}", case.name, result.algorithm);
        }
        analyze_comparison_results(&results, opts.tolerance).unwrap();
    }
}
