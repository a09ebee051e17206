//! s3nav - navigate an S3-compatible bucket like a filesystem
//!
//! Runs one `cd`, `ls`, `pwd` or `buckets` command per invocation.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use s3nav::commands::{self, Cli};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so stdout carries command output only
    let filter = if cli.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let exit_code = commands::execute(cli).await;

    std::process::exit(exit_code.as_i32());
}
