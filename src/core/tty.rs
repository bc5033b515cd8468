//! Terminal detection and status output.

use std::io;
use std::io::IsTerminal;

const MARKER: &str = "\u{25B6}\u{FE0E} ";

pub fn is_stderr_tty() -> bool {
    io::stderr().is_terminal()
}

/// `▶︎ text` in bold, with a blue marker when `color` is set.
pub fn styled_headline(text: &str, color: bool) -> String {
    if color {
        format!("\u{1b}[1m\u{1b}[34m{}\u{1b}[39m{}\u{1b}[22m", MARKER, text)
    } else {
        format!("{}{}", MARKER, text)
    }
}

/// Print a headline to stderr.
pub fn headline(text: &str) {
    eprintln!("{}", styled_headline(text, is_stderr_tty()));
}

/// Print an indented progress line to stderr.
pub fn status(message: &str) {
    eprintln!("  {}", message);
}
