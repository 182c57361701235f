// src/config.rs

//! Install configuration file
//!
//! # Example install.toml
//!
//! ```toml
//! [platform]
//! platform = "ubuntu"
//! platform_family = "debian"   # inferred for well-known distros
//! platform_version = "18.04"
//! kernel_machine = "aarch64"
//!
//! [install]
//! version = "18.09.5"
//! channel = "stable"           # or ["stable", "test"]
//! setup_repo = true
//! package_options = "--no-install-recommends"
//! ```

use crate::error::{Error, Result};
use crate::install::InstallRequest;
use crate::platform::{OsFacts, PlatformFamily};
use crate::repository::Channel;
use crate::version::VersionSpec;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Default path for the install configuration
pub const DEFAULT_CONFIG_PATH: &str = "/etc/dockerpkg/install.toml";

/// Top-level configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InstallConfig {
    /// Facts about the target machine
    #[serde(default)]
    pub platform: PlatformSettings,

    /// Desired installation
    #[serde(default)]
    pub install: InstallSettings,
}

/// `[platform]` section; any field may be supplied on the command line instead
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlatformSettings {
    pub platform: Option<String>,
    pub platform_family: Option<String>,
    pub platform_version: Option<String>,
    pub kernel_machine: Option<String>,
}

impl PlatformSettings {
    /// Complete facts, inferring the family for well-known distros
    pub fn to_facts(&self) -> Result<OsFacts> {
        let platform = required(&self.platform, "platform.platform")?;
        let platform_family = match &self.platform_family {
            Some(family) => family.clone(),
            None => PlatformFamily::infer(&platform)
                .map(|f| f.as_str().to_string())
                .ok_or_else(|| {
                    Error::ConfigError(format!(
                        "platform.platform_family is required for platform {}",
                        platform
                    ))
                })?,
        };

        Ok(OsFacts {
            platform,
            platform_family,
            platform_version: required(&self.platform_version, "platform.platform_version")?,
            kernel_machine: required(&self.kernel_machine, "platform.kernel_machine")?,
        })
    }
}

fn required(value: &Option<String>, key: &str) -> Result<String> {
    value
        .clone()
        .ok_or_else(|| Error::ConfigError(format!("{} is not set", key)))
}

/// A channel given either as one name or as a component list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChannelSetting {
    One(String),
    Many(Vec<String>),
}

impl ChannelSetting {
    pub fn to_channel(&self) -> Result<Channel> {
        match self {
            Self::One(name) => Channel::new(name.clone()),
            Self::Many(components) => Channel::from_components(components.clone()),
        }
    }
}

/// `[install]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InstallSettings {
    pub version: Option<String>,
    pub channel: Option<ChannelSetting>,
    pub setup_repo: Option<bool>,
    pub package_name: Option<String>,
    pub package_version: Option<String>,
    pub package_options: Option<String>,
}

impl InstallSettings {
    /// Build an install request, filling unset values with defaults
    pub fn to_request(&self) -> Result<InstallRequest> {
        let version = match &self.version {
            Some(v) => VersionSpec::parse(v)?,
            None => VersionSpec::default(),
        };
        let channel = match &self.channel {
            Some(c) => c.to_channel()?,
            None => Channel::default(),
        };

        Ok(InstallRequest {
            version,
            channel,
            setup_repo: self.setup_repo,
            package_name: self.package_name.clone(),
            package_version: self.package_version.clone(),
            package_options: self.package_options.clone(),
        })
    }
}

/// Parse configuration from TOML text
pub fn parse_config(content: &str) -> Result<InstallConfig> {
    Ok(toml::from_str(content)?)
}

/// Load configuration from `path`, or from the default path if it exists
///
/// A missing default file yields an empty configuration; a missing
/// explicit path is an error.
pub fn load_config(path: Option<&Path>) -> Result<InstallConfig> {
    let path = match path {
        Some(p) => p,
        None => {
            let default = Path::new(DEFAULT_CONFIG_PATH);
            if !default.exists() {
                debug!("No config file at {}, using defaults", DEFAULT_CONFIG_PATH);
                return Ok(InstallConfig::default());
            }
            default
        }
    };

    debug!("Loading config from {}", path.display());
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}
