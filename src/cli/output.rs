//! Terminal output for the CLI
//!
//! Colors follow NO_COLOR, CLICOLOR and CLICOLOR_FORCE. Data lines (tiles,
//! status lines) stay uncolored so they can be piped.

use std::fmt::Display;

use colored::Colorize;

use crate::domain::Rgb;

/// Red bold "error:" prefix, on stderr
pub fn error(msg: &(impl Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Yellow "Warning:" prefix, on stderr
pub fn warning(msg: &(impl Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

pub fn header(msg: &(impl Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// A node line prefixed with a swatch painted in its display tag.
pub fn swatch(tag: Rgb, msg: &(impl Display + ?Sized)) {
    println!("{} {}", "██".truecolor(tag.0, tag.1, tag.2), msg);
}

pub fn info(msg: &(impl Display + ?Sized)) {
    println!("{}", msg);
}
