//! Formatting functions for user facing output.
//!
//! The library reports through these instead of printing directly, so the
//! look of the CLI stays in one place.

use console::style;

use crate::warning::OperationWarning;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display an operation warning to the user.
pub fn display_warning(warning: &OperationWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Print an empty line, used to separate command output blocks.
pub fn line_separator() {
    println!();
}

/// Print a labelled value, dimming absent values.
pub fn display_field(label: &str, value: Option<&str>) {
    match value {
        Some(value) => println!("  {:<12} {}", label, style(value).cyan()),
        None => println!("  {:<12} {}", label, style("(none)").dim()),
    }
}
