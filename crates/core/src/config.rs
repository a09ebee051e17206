//! On-disk settings for s3nav
//!
//! Saved profiles live in a TOML file at `<config dir>/s3nav/config.toml`, or
//! in the directory named by `S3NAV_CONFIG_DIR`. Files written by an older
//! schema are upgraded on load; files from a newer s3nav are rejected.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::profile::Profile;

/// Schema written by this build
pub const SCHEMA_VERSION: u32 = 1;

/// Environment variable overriding the configuration directory
pub const CONFIG_DIR_ENV: &str = "S3NAV_CONFIG_DIR";

/// Contents of the settings file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Schema the file was written with
    pub schema_version: u32,

    /// Profile used when none is selected explicitly
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_profile: Option<String>,

    /// Saved profiles, in insertion order
    #[serde(default)]
    pub profiles: Vec<Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            default_profile: None,
            profiles: Vec::new(),
        }
    }
}

/// Reads and writes the settings file
#[derive(Debug)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Locate the settings file for the current user
    pub fn new() -> Result<Self> {
        let dir = match std::env::var_os(CONFIG_DIR_ENV) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => dirs::config_dir()
                .map(|d| d.join("s3nav"))
                .ok_or_else(|| Error::Config("no configuration directory for this user".into()))?,
        };
        Ok(Self::with_path(dir.join("config.toml")))
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Read the settings file
    ///
    /// A missing file reads as an empty configuration.
    pub fn load(&self) -> Result<Config> {
        if !self.config_path.exists() {
            tracing::debug!(path = %self.config_path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }

        let config: Config = toml::from_str(&std::fs::read_to_string(&self.config_path)?)?;

        match config.schema_version {
            v if v == SCHEMA_VERSION => Ok(config),
            v if v < SCHEMA_VERSION => Ok(self.migrate(config)),
            v => Err(Error::Config(format!(
                "{} has schema version {v}, newer than supported version {SCHEMA_VERSION}",
                self.config_path.display()
            ))),
        }
    }

    /// Write the settings file, creating its directory
    ///
    /// The file is made owner-only on unix since profiles may hold secrets.
    pub fn save(&self, config: &Config) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&self.config_path, toml::to_string_pretty(config)?)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.config_path, std::fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }

    // Schema 0 predates `default_profile`; serde already defaults it.
    fn migrate(&self, mut config: Config) -> Config {
        tracing::warn!(
            path = %self.config_path.display(),
            from = config.schema_version,
            to = SCHEMA_VERSION,
            "upgrading configuration file"
        );
        config.schema_version = SCHEMA_VERSION;
        config
    }
}
