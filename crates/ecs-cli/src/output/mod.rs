//! Output formatting utilities for the CLI
//!
//! Status lines go to stdout, colored by category. Diagnostics go to stderr
//! with a colored prefix.

use std::io::{IsTerminal, Write};

use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};

use ecs_core::{Category, RunSummary, StatusLine};

/// Whether status lines are styled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Always,
    Never,
}

impl ColorMode {
    /// Color unless `--no-color` was given, `NO_COLOR` is set, or stdout is
    /// not a terminal.
    pub fn detect(no_color: bool) -> Self {
        let env_opt_out = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
        if no_color || env_opt_out || !std::io::stdout().is_terminal() {
            Self::Never
        } else {
            Self::Always
        }
    }
}

/// Foreground color for each category
pub fn category_color(category: Category) -> Color {
    match category {
        Category::Healthy => Color::DarkGreen,
        Category::Transitioning => Color::DarkYellow,
        Category::Stopped | Category::Unreachable => Color::Red,
        Category::ActiveNotRunning => Color::Yellow,
    }
}

/// Write one status line followed by a newline.
///
/// Falls back to plain text if styling fails. Write errors are ignored, so a
/// closed pipe does not abort the report.
pub fn present<W: Write>(out: &mut W, line: &StatusLine, mode: ColorMode) {
    if mode == ColorMode::Always {
        let styled = crossterm::queue!(
            out,
            SetForegroundColor(category_color(line.category)),
            Print(&line.message),
            ResetColor,
            Print("\n")
        );
        if styled.is_ok() {
            let _ = out.flush();
            return;
        }
    }

    let _ = writeln!(out, "{}", line.message);
    let _ = out.flush();
}

/// Diagnostic for a run that did not account for every service
pub fn format_incomplete(summary: &RunSummary) -> Option<String> {
    if summary.is_complete() {
        return None;
    }

    let mut message = format!(
        "{} of {} services were not reported",
        summary.missing(),
        summary.expected
    );
    if summary.failed_batches > 0 {
        message.push_str(&format!(
            " ({} failed request{})",
            summary.failed_batches,
            if summary.failed_batches == 1 { "" } else { "s" }
        ));
    }
    if summary.cancelled {
        message.push_str(" (cancelled)");
    }
    Some(message)
}

/// Print an error message in red with an X prefix
///
/// Outputs to stderr with red coloring for error feedback to the user.
pub fn print_error(msg: &str) {
    let mut stderr = std::io::stderr();
    let _ = crossterm::execute!(
        stderr,
        SetForegroundColor(Color::Red),
        Print("✗ "),
        ResetColor,
        Print(msg),
        Print("\n")
    );
}

/// Print a warning message in yellow with a warning symbol prefix
pub fn print_warning(msg: &str) {
    let mut stderr = std::io::stderr();
    let _ = crossterm::execute!(
        stderr,
        SetForegroundColor(Color::Yellow),
        Print("⚠ "),
        ResetColor,
        Print(msg),
        Print("\n")
    );
}
