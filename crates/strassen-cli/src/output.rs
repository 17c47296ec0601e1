//! CLI output formatting.

use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use strassen_core::{Matrix, Scalar};

/// Format a duration for display.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 0.001 {
        format!("{:.2}µs", secs * 1_000_000.0)
    } else if secs < 1.0 {
        format!("{:.2}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{secs:.3}s")
    } else {
        let mins = (secs / 60.0).floor() as u64;
        let remaining = secs - (mins as f64 * 60.0);
        format!("{mins}m{remaining:.1}s")
    }
}

/// Format a number with thousand separators.
#[must_use]
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Format a byte count with a binary unit.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_bytes(bytes: usize) -> String {
    const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit + 1 < UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}

/// Classical flop count `2n^3` divided by the elapsed time, in GFLOP/s.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn gflops(n: usize, d: Duration) -> f64 {
    let secs = d.as_secs_f64();
    if secs <= 0.0 {
        return 0.0;
    }
    let n = n as f64;
    2.0 * n * n * n / secs / 1e9
}

/// The top-left `corner x corner` cells, one row per line.
#[must_use]
pub fn format_preview<T: Scalar>(m: &Matrix<T>, corner: usize) -> String {
    let rows = corner.min(m.rows());
    let cols = corner.min(m.cols());
    let mut lines = Vec::with_capacity(rows);
    for i in 0..rows {
        let cells: Vec<String> = (0..cols).map(|j| format!("{:>10.4}", m.get(i, j))).collect();
        let ellipsis = if cols < m.cols() { " ..." } else { "" };
        lines.push(format!("[{}{ellipsis}]", cells.join(" ")));
    }
    if rows < m.rows() {
        lines.push("...".to_string());
    }
    lines.join("\n")
}

/// Write `m` as comma-separated rows.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be created or written.
pub fn write_csv<T: Scalar>(path: &Path, m: &Matrix<T>) -> io::Result<()> {
    let file = std::fs::File::create(path)?;
    let mut out = BufWriter::new(file);
    for i in 0..m.rows() {
        for j in 0..m.cols() {
            if j > 0 {
                out.write_all(b",")?;
            }
            write!(out, "{}", m.get(i, j))?;
        }
        out.write_all(b"\n")?;
    }
    out.flush()
}
