//! Formatter for diagnostics on stderr
//!
//! Keeps error and warning output consistent across commands.

use console::style;

use super::OutputConfig;

/// Formatter for CLI diagnostics
#[derive(Debug, Clone)]
pub struct Formatter {
    config: OutputConfig,
}

impl Formatter {
    /// Create a new formatter with the given configuration
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    /// Check if colors are enabled
    pub fn colors_enabled(&self) -> bool {
        !self.config.no_color && console::colors_enabled_stderr()
    }

    /// Render an error line
    pub fn error_line(&self, message: &str) -> String {
        if self.colors_enabled() {
            format!("{} {message}", style("✗").red())
        } else {
            format!("✗ {message}")
        }
    }

    /// Render a warning line
    pub fn warning_line(&self, message: &str) -> String {
        if self.colors_enabled() {
            format!("{} {message}", style("⚠").yellow())
        } else {
            format!("⚠ {message}")
        }
    }

    /// Output an error message
    pub fn error(&self, message: &str) {
        eprintln!("{}", self.error_line(message));
    }

    /// Output a warning message
    pub fn warning(&self, message: &str) {
        eprintln!("{}", self.warning_line(message));
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new(OutputConfig::default())
    }
}
