// src/repository/descriptor.rs

//! Repository connection parameters handed to the registrar

use serde::Serialize;
use std::fmt;

/// Name the repository is registered under
pub const REPOSITORY_NAME: &str = "Docker";

/// Key server apt falls back to when the key URL is unreachable
pub const APT_KEYSERVER: &str = "keyserver.ubuntu.com";

/// Package manager the repository is written for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RepositoryKind {
    /// yum/dnf `.repo` definition
    Yum,
    /// apt `sources.list` entry
    Apt,
}

impl fmt::Display for RepositoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Yum => write!(f, "yum"),
            Self::Apt => write!(f, "apt"),
        }
    }
}

/// Everything a registrar needs to make the Docker feed visible
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RepositoryDescriptor {
    pub name: String,
    pub kind: RepositoryKind,
    pub base_url: String,
    pub gpg_key_url: String,
    /// Architecture token in the package manager's naming
    pub architecture: String,
    /// Feed components, in order
    pub components: Vec<String>,
    pub display_name: String,
    /// Apt suite (release codename); yum repositories have none
    pub suite: Option<String>,
    pub keyserver: Option<String>,
    pub gpg_check: bool,
    pub enabled: bool,
}

impl RepositoryDescriptor {
    /// Render the definition as the package manager's config text
    ///
    /// Yum gives a `.repo` stanza. Apt gives a `sources.list` line and
    /// needs a suite, so `None` is returned for apt descriptors without one.
    pub fn render(&self) -> Option<String> {
        match self.kind {
            RepositoryKind::Yum => Some(format!(
                concat!(
                    "[{name}]\nname={display}\nbaseurl={url}\n",
                    "enabled={enabled}\ngpgcheck={check}\ngpgkey={key}\n",
                ),
                name = self.name,
                display = self.display_name,
                url = self.base_url,
                enabled = u8::from(self.enabled),
                check = u8::from(self.gpg_check),
                key = self.gpg_key_url,
            )),
            RepositoryKind::Apt => {
                let suite = self.suite.as_deref()?;
                Some(format!(
                    "deb [arch={}] {} {} {}\n",
                    self.architecture,
                    self.base_url,
                    suite,
                    self.components.join(" ")
                ))
            }
        }
    }
}

impl fmt::Display for RepositoryDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {}) {} [{}]",
            self.name,
            self.kind,
            self.architecture,
            self.base_url,
            self.components.join(", ")
        )
    }
}
