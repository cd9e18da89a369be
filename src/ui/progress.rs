//! Spinner for blocking data-source work

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::time::Duration;

/// Transient spinner line on stderr with persistent completion lines.
///
/// Hidden when `quiet` is set or stderr is not a terminal, so piped and JSON
/// output stay clean.
pub struct ProgressPrinter {
    bar: Option<ProgressBar>,
}

impl ProgressPrinter {
    pub fn new(quiet: bool) -> Self {
        let bar = (!quiet && std::io::stderr().is_terminal()).then(|| {
            let bar = ProgressBar::new_spinner();
            bar.set_style(
                ProgressStyle::with_template("{spinner:.cyan} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        });
        Self { bar }
    }

    pub fn is_visible(&self) -> bool {
        self.bar.is_some()
    }

    /// Replace the spinner message
    pub fn update(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.set_message(message.to_string());
        }
    }

    /// Print a permanent line above the spinner
    pub fn persist(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.println(message);
        }
    }

    /// Stop the spinner, leaving a ✓ or ✗ line
    pub fn finish(&mut self, success: bool, message: &str) {
        if let Some(bar) = self.bar.take() {
            let mark = if success {
                "✓".green().bold()
            } else {
                "✗".red().bold()
            };
            bar.finish_and_clear();
            eprintln!("{} {}", mark, message);
        }
    }
}

impl Drop for ProgressPrinter {
    fn drop(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_printer_is_hidden() {
        let mut printer = ProgressPrinter::new(true);
        assert!(!printer.is_visible());
        printer.update("loading");
        printer.persist("done");
        printer.finish(true, "ok");
    }
}
