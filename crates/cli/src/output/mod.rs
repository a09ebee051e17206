//! Output formatting utilities
//!
//! Command results go to the session's output sink. This module covers what
//! is written to stderr: errors and warnings.

mod formatter;

pub use formatter::Formatter;

/// Output configuration derived from CLI flags
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    /// Disable colored output
    pub no_color: bool,
}
