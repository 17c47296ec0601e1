//! UI helpers for CLI display.

use console::{style, StyledObject};

/// Check if color output is disabled via `NO_COLOR` env var.
#[must_use]
pub fn is_color_disabled() -> bool {
    std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty())
}

fn tag(text: &'static str, paint: fn(StyledObject<&'static str>) -> StyledObject<&'static str>) -> String {
    if is_color_disabled() {
        text.to_string()
    } else {
        paint(style(text)).to_string()
    }
}

/// `=== text ===`, bold cyan when colors are on.
#[must_use]
pub fn header(text: &str) -> String {
    let plain = format!("=== {text} ===");
    if is_color_disabled() {
        plain
    } else {
        style(plain).bold().cyan().to_string()
    }
}

/// Print a styled header.
pub fn print_header(text: &str) {
    println!("{}", header(text));
}

/// Print a success message.
pub fn print_success(text: &str) {
    println!("{} {text}", tag("[OK]", |s| s.green().bold()));
}

/// Print a warning to stderr.
pub fn print_warning(text: &str) {
    eprintln!("{} {text}", tag("[WARN]", |s| s.yellow().bold()));
}

/// Print an error message to stderr.
pub fn print_error(text: &str) {
    eprintln!("{} {text}", tag("[ERROR]", |s| s.red().bold()));
}
