//! ANSI rendering of dispatcher output lines.

use tango_core::{LineKind, OutputLine};

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";
pub const FG_RED: &str = "\x1b[31m";
pub const FG_GREEN: &str = "\x1b[32m";
pub const FG_YELLOW: &str = "\x1b[33m";
pub const FG_CYAN: &str = "\x1b[36m";

/// Symbol printed before reading each input line.
pub const PROMPT_SYMBOL: &str = "> ";

/// Render one output line with its kind's color.
pub fn render(line: &OutputLine) -> String {
    let (prefix, suffix) = match line.kind {
        LineKind::System => ("", ""),
        LineKind::Prompt => (FG_CYAN, RESET),
        LineKind::User => (DIM, RESET),
        LineKind::Error => (FG_RED, RESET),
        LineKind::Info => (FG_YELLOW, RESET),
        LineKind::Success => (FG_GREEN, RESET),
        LineKind::Header => (BOLD, RESET),
        LineKind::Question => (FG_CYAN, RESET),
    };
    format!("{prefix}{}{suffix}", line.text)
}
