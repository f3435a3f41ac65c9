//! Terminal output for the CLI.
//!
//! Human output goes through [`console`] styling; `--json` suppresses all of
//! it so stdout carries only the JSON documents commands print.

use std::time::Duration;

use console::{style, StyledObject};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Human,
    Json,
}

/// Output handler shared by every command.
#[derive(Debug, Clone)]
pub struct Output {
    mode: Mode,
    verbose: bool,
}

impl Output {
    pub fn new(verbose: bool, json: bool) -> Self {
        let mode = if json { Mode::Json } else { Mode::Human };
        Self { mode, verbose }
    }

    fn human(&self) -> bool {
        self.mode == Mode::Human
    }

    fn status(&self, glyph: StyledObject<&str>, msg: &str) {
        if self.human() {
            println!("{} {}", glyph, msg);
        }
    }

    pub fn info(&self, msg: &str) {
        self.status(style("ℹ").blue(), msg);
    }

    pub fn success(&self, msg: &str) {
        self.status(style("✓").green(), msg);
    }

    /// Warnings go to stderr so piped human output stays clean.
    pub fn warn(&self, msg: &str) {
        if self.human() {
            eprintln!("{} {}", style("⚠").yellow(), msg);
        }
    }

    /// Errors are printed in both modes; JSON mode wraps them in an object.
    pub fn error(&self, msg: &str) {
        match self.mode {
            Mode::Json => eprintln!("{}", serde_json::json!({ "error": msg })),
            Mode::Human => eprintln!("{} {}", style("✗").red(), style(msg).red()),
        }
    }

    /// Verbose-only detail.
    pub fn debug(&self, msg: &str) {
        if self.verbose && self.human() {
            eprintln!("{} {}", style("→").dim(), style(msg).dim());
        }
    }

    pub fn header(&self, msg: &str) {
        if self.human() {
            println!("\n{}", style(msg).bold().underlined());
        }
    }

    /// Pretty-print a value as JSON, regardless of mode.
    pub fn json<T: Serialize>(&self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(json) => println!("{}", json),
            Err(e) => tracing::error!(error = %e, "failed to serialize output"),
        }
    }

    pub fn kv(&self, key: &str, value: &str) {
        if self.human() {
            println!("  {}: {}", style(key).dim(), value);
        }
    }

    /// A key-value line with the value emphasized, for totals.
    pub fn total(&self, key: &str, value: &str) {
        if self.human() {
            println!("  {}: {}", style(key).dim(), style(value).bold());
        }
    }

    pub fn list_item(&self, item: &str) {
        if self.human() {
            println!("    {} {}", style("•").dim(), item);
        }
    }

    /// Column headings for a following run of [`table_row`](Self::table_row).
    pub fn table_header(&self, cols: &[&str], widths: &[usize]) {
        if self.human() {
            println!("  {}", style(pad_columns(cols, widths)).bold());
        }
    }

    pub fn table_row(&self, cols: &[&str], widths: &[usize]) {
        if self.human() {
            println!("  {}", pad_columns(cols, widths));
        }
    }

    /// Spinner for the rates request; hidden in JSON mode.
    pub fn spinner(&self, msg: &str) -> ProgressBar {
        if !self.human() {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(template) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(template);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn is_json(&self) -> bool {
        self.mode == Mode::Json
    }
}

fn pad_columns(cols: &[&str], widths: &[usize]) -> String {
    cols.iter()
        .zip(widths)
        .map(|(col, width)| format!("{:width$}", col, width = width))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

/// Format an age in milliseconds, e.g. `2m 5s`.
pub fn format_age(ms: u64) -> String {
    let secs = ms / 1000;
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_age() {
        assert_eq!(format_age(4_500), "4s");
        assert_eq!(format_age(125_000), "2m 5s");
        assert_eq!(format_age(3_600_000 + 120_000), "1h 2m");
    }

    #[test]
    fn test_pad_columns() {
        assert_eq!(pad_columns(&["USD", "0.0077"], &[5, 8]), "USD    0.0077");
        assert_eq!(pad_columns(&["KESX", "1"], &[3, 3]), "KESX  1");
    }

    #[test]
    fn test_json_mode_flags() {
        let output = Output::new(true, true);
        assert!(output.is_json());
        assert!(output.is_verbose());
        assert!(!Output::new(false, false).is_json());
    }
}
