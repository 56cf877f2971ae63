//! Report module - Status lines and spinners on the console

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Print an error message; shown even in quiet mode
pub fn print_error(message: &str) {
    eprintln!("   {} {}", "✗".bright_red(), message);
}

/// Console reporter honoring `--verbose` and `--quiet`
#[derive(Debug, Clone, Copy, Default)]
pub struct Reporter {
    verbose: bool,
    quiet: bool,
}

impl Reporter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    /// Reporter that prints nothing but errors
    pub fn silent() -> Self {
        Self::new(false, true)
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    pub fn step(&self, message: &str) {
        if !self.quiet {
            println!("   {} {}", "→".bright_blue(), message);
        }
    }

    pub fn success(&self, message: &str) {
        if !self.quiet {
            println!("   {} {}", "✓".bright_green(), message);
        }
    }

    pub fn warning(&self, message: &str) {
        if !self.quiet {
            println!("   {} {}", "⚠".bright_yellow(), message);
        }
    }

    pub fn info(&self, message: &str) {
        if !self.quiet {
            println!("   {} {}", "ℹ".bright_cyan(), message);
        }
    }

    /// Extra detail, only with `--verbose`
    pub fn detail(&self, message: &str) {
        if self.verbose && !self.quiet {
            println!("     {}", message.bright_black());
        }
    }

    pub fn error(&self, message: &str) {
        print_error(message);
    }

    /// Spinner for a long-running external command; hidden when quiet
    pub fn spinner(&self, message: impl Into<String>) -> ProgressBar {
        if self.quiet {
            return ProgressBar::hidden();
        }
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("   {spinner:.green} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(message.into());
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    }
}
