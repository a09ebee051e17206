//! Profile management
//!
//! Profiles are named sets of credentials and a bucket, stored in the
//! configuration file so they need not be passed on every invocation.

use serde::{Deserialize, Serialize};

use crate::config::ConfigManager;
use crate::error::{Error, Result};

/// A named bucket and credential set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Unique name for this profile
    pub name: String,

    /// Bucket to navigate
    pub bucket: String,

    /// Access key ID
    pub access_key: String,

    /// Secret access key; omit to take it from the environment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,
}

impl Profile {
    /// Create a new profile without a stored secret
    pub fn new(
        name: impl Into<String>,
        bucket: impl Into<String>,
        access_key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            bucket: bucket.into(),
            access_key: access_key.into(),
            secret_key: None,
        }
    }
}

/// Check if a string is a valid profile name
pub fn is_valid_profile_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Manager for profile operations
#[derive(Debug)]
pub struct ProfileManager {
    config_manager: ConfigManager,
}

impl ProfileManager {
    /// Create a new ProfileManager with a specific ConfigManager
    pub fn with_config_manager(config_manager: ConfigManager) -> Self {
        Self { config_manager }
    }

    /// Create a new ProfileManager using the default config location
    pub fn new() -> Result<Self> {
        let config_manager = ConfigManager::new()?;
        Ok(Self { config_manager })
    }

    /// List all configured profiles
    pub fn list(&self) -> Result<Vec<Profile>> {
        let config = self.config_manager.load()?;
        Ok(config.profiles)
    }

    /// Get a profile by name
    pub fn get(&self, name: &str) -> Result<Profile> {
        let config = self.config_manager.load()?;
        config
            .profiles
            .into_iter()
            .find(|p| p.name == name)
            .ok_or_else(|| Error::ProfileNotFound(name.to_string()))
    }

    /// Name of the default profile, if one is set
    pub fn default_name(&self) -> Result<Option<String>> {
        Ok(self.config_manager.load()?.default_profile)
    }

    /// Resolve a profile: the named one, else the default, else none
    pub fn resolve(&self, name: Option<&str>) -> Result<Option<Profile>> {
        match name {
            Some(name) => self.get(name).map(Some),
            None => match self.default_name()? {
                Some(name) => self.get(&name).map(Some),
                None => Ok(None),
            },
        }
    }

    /// Add or update a profile, optionally making it the default
    pub fn set(&self, profile: Profile, make_default: bool) -> Result<()> {
        if !is_valid_profile_name(&profile.name) {
            return Err(Error::Config(format!(
                "Invalid profile name '{}': use letters, digits, '-' or '_'",
                profile.name
            )));
        }

        let mut config = self.config_manager.load()?;
        if make_default {
            config.default_profile = Some(profile.name.clone());
        }

        config.profiles.retain(|p| p.name != profile.name);
        config.profiles.push(profile);

        self.config_manager.save(&config)
    }

    /// Remove a profile, clearing the default if it pointed there
    pub fn remove(&self, name: &str) -> Result<()> {
        let mut config = self.config_manager.load()?;
        let original_len = config.profiles.len();

        config.profiles.retain(|p| p.name != name);

        if config.profiles.len() == original_len {
            return Err(Error::ProfileNotFound(name.to_string()));
        }
        if config.default_profile.as_deref() == Some(name) {
            config.default_profile = None;
        }

        self.config_manager.save(&config)
    }

    /// Check if a profile exists
    pub fn exists(&self, name: &str) -> Result<bool> {
        let config = self.config_manager.load()?;
        Ok(config.profiles.iter().any(|p| p.name == name))
    }
}
