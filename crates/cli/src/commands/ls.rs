//! ls command - List a directory
//!
//! Lists the immediate children of a path, directories first within each
//! page, or every key beneath it with `--recursive`.

use std::io::Write;

use clap::Args;
use sn_core::{ListMode, LsOptions, Result, Session};

/// List a directory
#[derive(Args, Debug)]
pub struct LsArgs {
    /// Path to list (defaults to the working directory)
    pub path: Option<String>,

    /// List every key beneath the path
    #[arg(short, long)]
    pub recursive: bool,

    /// Show modification time and size
    #[arg(short, long)]
    pub long: bool,
}

impl LsArgs {
    fn options(&self) -> LsOptions {
        LsOptions {
            mode: if self.recursive {
                ListMode::Recursive
            } else {
                ListMode::Children
            },
            long: self.long,
        }
    }
}

/// Execute the ls command
pub async fn execute<W: Write>(args: &LsArgs, session: &mut Session<W>) -> Result<()> {
    let path = args.path.as_deref().unwrap_or_default();
    session.lsdir_with(path, args.options()).await
}
