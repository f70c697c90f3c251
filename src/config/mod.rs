//! Profile file for Lacework credentials
//!
//! Named profiles live in `~/.lacework/config.yaml`:
//!
//! ```yaml
//! profiles:
//!   default:
//!     account: example
//!     api_key: EXAMPLE_1234567890ABCDE
//!     api_secret: _abcdef1234567890
//!     version: 2
//! ```
//!
//! This is a format of its own. The Lacework CLI's `~/.lacework.toml` is not
//! read; copy the profiles over by hand.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::client::{ClientBuilder, LaceworkClient};
use crate::error::{ConfigError, Result};

/// Profile used when none is named
pub const DEFAULT_PROFILE: &str = "default";

/// Current profile format
pub const CONFIG_VERSION: u32 = 2;

/// All profiles of a configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

/// Credentials and account of one profile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub account: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subaccount: Option<String>,

    pub api_key: String,

    pub api_secret: String,

    /// Profile format version
    #[serde(default = "default_version")]
    pub version: u32,
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

impl Profile {
    /// Builder seeded with this profile's account and keys
    pub fn client_builder(&self) -> ClientBuilder {
        let mut builder =
            LaceworkClient::builder(&self.account).api_keys(&self.api_key, &self.api_secret);
        if let Some(subaccount) = self.subaccount.as_deref().filter(|s| !s.is_empty()) {
            builder = builder.subaccount(subaccount);
        }
        builder
    }
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| ConfigError::NotFound("could not determine home directory".into()))?;

        Ok(home.join(".lacework").join("config.yaml"))
    }

    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        Self::load_from(Self::default_path()?)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()).into());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents).map_err(ConfigError::from)?;

        Ok(config)
    }

    /// Save configuration to a specific path, readable by the owner only
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_yaml::to_string(self).map_err(ConfigError::from)?;
        std::fs::write(path, contents)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(path)?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(path, perms)?;
        }

        Ok(())
    }

    pub fn profile(&self, name: &str) -> Result<&Profile> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::MissingProfile(name.to_string()).into())
    }

    /// Add or replace a profile
    pub fn store_profile(&mut self, name: impl Into<String>, profile: Profile) {
        self.profiles.insert(name.into(), profile);
    }

    /// Builder for the named profile
    pub fn client_builder(&self, name: &str) -> Result<ClientBuilder> {
        Ok(self.profile(name)?.client_builder())
    }
}
