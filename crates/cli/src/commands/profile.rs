//! Profile management commands
//!
//! Profiles are named sets of credentials and a bucket, stored in the
//! configuration file.

use std::io::Write;

use clap::Subcommand;
use sn_core::{Profile, ProfileManager, Result};

use crate::output::Formatter;

/// Profile subcommands
#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// Add or update a profile
    Set(SetArgs),

    /// List all configured profiles
    List,

    /// Remove a profile
    Remove(RemoveArgs),
}

/// Arguments for the `profile set` command
#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Profile name (letters, digits, '-' or '_')
    pub name: String,

    /// Bucket to navigate
    #[arg(value_name = "BUCKET")]
    pub profile_bucket: String,

    /// Access key ID
    #[arg(value_name = "ACCESS_KEY")]
    pub profile_access_key: String,

    /// Secret access key; omit to keep reading it from PASSWORD
    #[arg(value_name = "SECRET_KEY")]
    pub profile_secret_key: Option<String>,

    /// Use this profile when none is selected
    #[arg(long)]
    pub default: bool,
}

/// Arguments for the `profile remove` command
#[derive(clap::Args, Debug)]
pub struct RemoveArgs {
    /// Name of the profile to remove
    pub name: String,
}

/// Execute a profile subcommand
pub fn execute<W: Write>(
    cmd: &ProfileCommands,
    manager: &ProfileManager,
    formatter: &Formatter,
    out: &mut W,
) -> Result<()> {
    match cmd {
        ProfileCommands::Set(args) => {
            let mut profile = Profile::new(
                &args.name,
                &args.profile_bucket,
                &args.profile_access_key,
            );
            profile.secret_key = args.profile_secret_key.clone();
            if profile.secret_key.is_some() {
                formatter.warning("secret key is stored in plain text in the config file");
            }
            manager.set(profile, args.default)?;
            writeln!(out, "Profile '{}' saved.", args.name)?;
        }
        ProfileCommands::List => {
            let default = manager.default_name()?;
            for profile in manager.list()? {
                let marker = if default.as_deref() == Some(profile.name.as_str()) {
                    "*"
                } else {
                    " "
                };
                writeln!(out, "{marker} {} {}", profile.name, profile.bucket)?;
            }
        }
        ProfileCommands::Remove(args) => {
            manager.remove(&args.name)?;
            writeln!(out, "Profile '{}' removed.", args.name)?;
        }
    }
    Ok(())
}
