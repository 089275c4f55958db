//! Terminal output
//!
//! Diagnostics go to stderr, data to stdout. `colored` honours NO_COLOR and
//! CLICOLOR_FORCE.

use std::fmt::Display;

use colored::Colorize;

pub fn error(msg: &(impl Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

pub fn warning(msg: &(impl Display + ?Sized)) {
    eprintln!("{}: {}", "warning".yellow(), msg);
}

/// `label: value` with the label highlighted
pub fn field(label: &str, value: &(impl Display + ?Sized)) {
    println!("{}: {}", label.green(), value);
}

/// Uncoloured payload (JSON, TOML, text trees) safe to pipe
pub fn data(msg: &(impl Display + ?Sized)) {
    println!("{}", msg);
}
