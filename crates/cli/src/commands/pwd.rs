//! pwd command - Print the working directory
//!
//! Normalizes the configured working directory without contacting storage.

use std::io::Write;

use sn_core::{Prefix, Result, SessionConfig};

/// Execute the pwd command
pub fn execute<W: Write>(config: &SessionConfig, out: &mut W) -> Result<()> {
    writeln!(out, "{}", Prefix::parse(&config.working_dir))?;
    Ok(())
}
