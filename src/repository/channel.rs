// src/repository/channel.rs

//! Release channel of the upstream package feed

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default channel when none is configured
pub const DEFAULT_CHANNEL: &str = "stable";

/// One or more feed components, e.g. `stable` or `stable test`
///
/// Yum repositories only take a single channel in the URL, so they use
/// [`Channel::primary`]. Apt repositories list every component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Channel {
    components: Vec<String>,
}

impl Channel {
    /// Single-component channel
    pub fn new(name: impl Into<String>) -> Result<Self> {
        Self::from_components(vec![name.into()])
    }

    /// Channel from an ordered component list
    pub fn from_components(components: Vec<String>) -> Result<Self> {
        if components.is_empty() {
            return Err(Error::InvalidChannel(
                "at least one component is required".to_string(),
            ));
        }

        let components = components
            .into_iter()
            .map(|c| {
                let c = c.trim().to_string();
                if c.is_empty() || c.contains(char::is_whitespace) {
                    Err(Error::InvalidChannel(format!("'{}' is not a component name", c)))
                } else {
                    Ok(c)
                }
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { components })
    }

    /// First component, used wherever only one channel fits
    pub fn primary(&self) -> &str {
        // from_components guarantees at least one entry
        &self.components[0]
    }

    pub fn components(&self) -> &[String] {
        &self.components
    }

    /// Primary channel with the first letter upper-cased and the rest lowered
    ///
    /// `stable` becomes `Stable`, `NIGHTLY` becomes `Nightly`.
    pub fn capitalized(&self) -> String {
        let mut chars = self.primary().chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
            None => String::new(),
        }
    }
}

impl Default for Channel {
    fn default() -> Self {
        Self {
            components: vec![DEFAULT_CHANNEL.to_string()],
        }
    }
}

impl TryFrom<Vec<String>> for Channel {
    type Error = Error;

    fn try_from(components: Vec<String>) -> Result<Self> {
        Self::from_components(components)
    }
}

impl From<Channel> for Vec<String> {
    fn from(channel: Channel) -> Self {
        channel.components
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.components.join(" "))
    }
}
