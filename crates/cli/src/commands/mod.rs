//! CLI command definitions and execution
//!
//! Each invocation runs one command. Settings are resolved from flags, the
//! environment and the selected profile, in that order, before any command
//! touches the network.

use std::io::Write;

use clap::{Parser, Subcommand};
use sn_core::{
    Connector, Error, Profile, ProfileManager, Result, Session, SessionConfig, valid_bucket,
};
use sn_s3::S3Connector;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

mod buckets;
mod cd;
mod ls;
mod profile;
mod pwd;

/// s3nav - navigate an S3-compatible bucket like a filesystem
///
/// Issues shell-like `cd` and `ls` commands against object key prefixes.
#[derive(Parser, Debug)]
#[command(name = "s3nav")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Working directory inside the bucket
    #[arg(long, global = true, env = "S3NAV_PWD")]
    pub pwd: Option<String>,

    /// Bucket to navigate
    #[arg(short, long, global = true, env = "S3NAV_BUCKET")]
    pub bucket: Option<String>,

    /// Access key ID
    #[arg(long, global = true, env = "S3NAV_ACCESS_KEY")]
    pub access_key: Option<String>,

    /// Secret access key
    #[arg(long, global = true, env = "PASSWORD", hide_env_values = true)]
    pub secret_key: Option<String>,

    /// Profile supplying bucket and credentials
    #[arg(short, long, global = true, env = "S3NAV_PROFILE")]
    pub profile: Option<String>,

    /// Bind the bucket without checking the account's bucket list
    #[arg(long, global = true, default_value = "false")]
    pub skip_bucket_check: bool,

    /// Disable colored output
    #[arg(long, global = true, default_value = "false")]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true, default_value = "false")]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Change the working directory
    Cd(cd::CdArgs),

    /// List a directory
    Ls(ls::LsArgs),

    /// Print the working directory
    Pwd,

    /// List buckets visible to the account
    Buckets,

    /// Manage saved profiles
    #[command(subcommand)]
    Profile(profile::ProfileCommands),
}

/// Execute the CLI command and return an exit code
pub async fn execute(cli: Cli) -> ExitCode {
    let formatter = Formatter::new(OutputConfig {
        no_color: cli.no_color,
    });

    // Without a config directory there are simply no saved profiles
    let profiles = ProfileManager::new()
        .inspect_err(|e| tracing::debug!(error = %e, "profiles unavailable"))
        .ok();
    let stdout = std::io::stdout();
    let result = run(cli, profiles.as_ref(), &S3Connector, stdout.lock()).await;

    match result {
        Ok(()) => ExitCode::Success,
        Err(e) => {
            formatter.error(&e.to_string());
            ExitCode::from_error(&e)
        }
    }
}

/// Run one command, writing its output to `out`
///
/// `profiles` is `None` when no configuration directory exists.
pub async fn run<W: Write>(
    cli: Cli,
    profiles: Option<&ProfileManager>,
    connector: &dyn Connector,
    mut out: W,
) -> Result<()> {
    match &cli.command {
        Commands::Profile(cmd) => {
            let formatter = Formatter::new(OutputConfig {
                no_color: cli.no_color,
            });
            profile::execute(cmd, require(profiles)?, &formatter, &mut out)
        }
        Commands::Pwd => {
            let config = resolve(&cli, profiles)?;
            pwd::execute(&config, &mut out)
        }
        Commands::Buckets => {
            let config = resolve(&cli, profiles)?;
            buckets::execute(&config, connector, &mut out).await
        }
        Commands::Cd(args) => {
            let mut session = open_session(&cli, profiles, connector, out).await?;
            cd::execute(args, &mut session).await
        }
        Commands::Ls(args) => {
            let mut session = open_session(&cli, profiles, connector, out).await?;
            ls::execute(args, &mut session).await
        }
    }
}

/// Merge flags, environment and profile into session settings
///
/// Flags and environment variables win over the profile. The working
/// directory defaults to the bucket root.
pub fn resolve(cli: &Cli, profiles: Option<&ProfileManager>) -> Result<SessionConfig> {
    let profile = match profiles {
        Some(manager) => manager.resolve(cli.profile.as_deref())?,
        None if cli.profile.is_some() => return Err(no_config_dir()),
        None => None,
    };
    Ok(merge(cli, profile))
}

fn require(profiles: Option<&ProfileManager>) -> Result<&ProfileManager> {
    profiles.ok_or_else(no_config_dir)
}

fn no_config_dir() -> Error {
    Error::Config("no configuration directory for this user; profiles are unavailable".into())
}

fn merge(cli: &Cli, profile: Option<Profile>) -> SessionConfig {
    let (bucket, access_key, secret_key) = match profile {
        Some(p) => {
            tracing::debug!(profile = %p.name, "using profile");
            (Some(p.bucket), Some(p.access_key), p.secret_key)
        }
        None => (None, None, None),
    };

    SessionConfig {
        working_dir: cli.pwd.clone().unwrap_or_else(|| "/".to_string()),
        access_key: cli.access_key.clone().or(access_key).unwrap_or_default(),
        secret_key: cli.secret_key.clone().or(secret_key).unwrap_or_default(),
        bucket: cli.bucket.clone().or(bucket).unwrap_or_default(),
    }
}

/// Build a session with its bucket bound
///
/// The bucket is looked up in the account's bucket list first unless
/// `--skip-bucket-check` is given.
async fn open_session<W: Write>(
    cli: &Cli,
    profiles: Option<&ProfileManager>,
    connector: &dyn Connector,
    out: W,
) -> Result<Session<W>> {
    let config = resolve(cli, profiles)?;
    let mut session = Session::new(config, out)?;
    let connection = session.setup_connection(connector).await?;

    if !cli.skip_bucket_check && !valid_bucket(session.bucket_name(), &connection).await? {
        return Err(Error::BucketNotFound(session.bucket_name().to_lowercase()));
    }

    session.bind(&connection)?;
    Ok(session)
}
