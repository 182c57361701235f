// src/platform/mod.rs

//! Normalized platform identity
//!
//! Raw OS facts (`platform`, `platform_family`, `platform_version`,
//! `kernel_machine`) are collected elsewhere and handed in as [`OsFacts`].
//! [`PlatformProfile::from_facts`] validates them once and produces an
//! immutable profile that the repository and version resolvers borrow.
//!
//! Two views of the release are kept on the profile because the packaging
//! rules key on both: RHEL and Debian releases are matched by integer major
//! version, Ubuntu releases by the exact dotted string.

mod arch;

pub use arch::map_architecture;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw operating system facts as reported by the target machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsFacts {
    /// Distribution identifier, e.g. `ubuntu`, `centos`, `fedora`, `amazon`
    pub platform: String,
    /// Coarse family, e.g. `debian`, `rhel`, `fedora`, `amazon`
    pub platform_family: String,
    /// Release version as a string, e.g. `18.04` or `7.6.1810`
    pub platform_version: String,
    /// Kernel CPU architecture, e.g. `x86_64`
    pub kernel_machine: String,
}

impl OsFacts {
    pub fn new(
        platform: impl Into<String>,
        platform_family: impl Into<String>,
        platform_version: impl Into<String>,
        kernel_machine: impl Into<String>,
    ) -> Self {
        Self {
            platform: platform.into(),
            platform_family: platform_family.into(),
            platform_version: platform_version.into(),
            kernel_machine: kernel_machine.into(),
        }
    }
}

/// Package-manager family of a platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformFamily {
    Rhel,
    Fedora,
    Debian,
    Amazon,
    Other,
}

impl PlatformFamily {
    /// Parse a family name; anything unrecognised is `Other`
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "rhel" => Self::Rhel,
            "fedora" => Self::Fedora,
            "debian" => Self::Debian,
            "amazon" => Self::Amazon,
            _ => Self::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rhel => "rhel",
            Self::Fedora => "fedora",
            Self::Debian => "debian",
            Self::Amazon => "amazon",
            Self::Other => "other",
        }
    }

    /// True for families whose packages come from yum/dnf repositories
    pub fn is_rpm_based(&self) -> bool {
        matches!(self, Self::Rhel | Self::Fedora)
    }

    /// Family of a well-known distribution, for facts that omit it
    pub fn infer(platform: &str) -> Option<Self> {
        match platform.trim().to_ascii_lowercase().as_str() {
            "debian" | "ubuntu" => Some(Self::Debian),
            "fedora" => Some(Self::Fedora),
            "amazon" => Some(Self::Amazon),
            "centos" | "redhat" | "oracle" | "scientific" | "almalinux" | "rocky" => {
                Some(Self::Rhel)
            }
            _ => None,
        }
    }
}

impl fmt::Display for PlatformFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Release codenames used in Debian-family package versions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Codename {
    /// Debian 9
    Stretch,
    /// Debian 10
    Buster,
    /// Ubuntu 16.04
    Xenial,
    /// Ubuntu 18.04
    Bionic,
    /// Ubuntu 20.04
    Focal,
}

impl Codename {
    /// Look up the codename for a distribution release
    ///
    /// Debian is matched on the integer major version, Ubuntu on the exact
    /// version string.
    pub fn lookup(distro: &str, raw_version: &str, major_version: u32) -> Option<Self> {
        match (distro, major_version, raw_version) {
            ("debian", 9, _) => Some(Self::Stretch),
            ("debian", 10, _) => Some(Self::Buster),
            ("ubuntu", _, "16.04") => Some(Self::Xenial),
            ("ubuntu", _, "18.04") => Some(Self::Bionic),
            ("ubuntu", _, "20.04") => Some(Self::Focal),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stretch => "stretch",
            Self::Buster => "buster",
            Self::Xenial => "xenial",
            Self::Bionic => "bionic",
            Self::Focal => "focal",
        }
    }
}

impl fmt::Display for Codename {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Leading integer of a version string, `0` if there is none
///
/// `"7.6.1810"` gives 7 and `"18.04"` gives 18. Digit runs too large for
/// a `u32` saturate at `u32::MAX`.
pub fn leading_integer(version: &str) -> u32 {
    let digits: String = version
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        return 0;
    }
    digits.parse().unwrap_or(u32::MAX)
}

/// Validated, immutable description of the target platform
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PlatformProfile {
    family: PlatformFamily,
    distro: String,
    major_version: u32,
    raw_version: String,
    codename: Option<Codename>,
    kernel_arch: String,
}

impl PlatformProfile {
    /// Build a profile from raw facts, checking family and distro agree
    pub fn from_facts(facts: &OsFacts) -> Result<Self> {
        let distro = facts.platform.trim().to_ascii_lowercase();
        if distro.is_empty() {
            return Err(Error::InconsistentPlatform(
                "platform name is empty".to_string(),
            ));
        }

        let kernel_arch = facts.kernel_machine.trim().to_string();
        if kernel_arch.is_empty() {
            return Err(Error::InconsistentPlatform(format!(
                "kernel architecture is empty for platform {}",
                distro
            )));
        }

        let family = PlatformFamily::from_name(&facts.platform_family);
        check_family(family, &distro)?;

        let raw_version = facts.platform_version.trim().to_string();
        let major_version = leading_integer(&raw_version);
        let codename = Codename::lookup(&distro, &raw_version, major_version);

        Ok(Self {
            family,
            distro,
            major_version,
            raw_version,
            codename,
            kernel_arch,
        })
    }

    pub fn family(&self) -> PlatformFamily {
        self.family
    }

    pub fn distro(&self) -> &str {
        &self.distro
    }

    pub fn major_version(&self) -> u32 {
        self.major_version
    }

    pub fn raw_version(&self) -> &str {
        &self.raw_version
    }

    pub fn codename(&self) -> Option<Codename> {
        self.codename
    }

    pub fn kernel_arch(&self) -> &str {
        &self.kernel_arch
    }

    /// Codename, or an error naming the release that has none
    pub fn require_codename(&self) -> Result<Codename> {
        self.codename.ok_or_else(|| Error::UnresolvedCodename {
            distro: self.distro.clone(),
            version: self.raw_version.clone(),
        })
    }

    /// RHEL-family release 7 (CentOS 7, RHEL 7, Oracle Linux 7, ...)
    pub fn is_el7(&self) -> bool {
        self.family == PlatformFamily::Rhel && self.major_version == 7
    }

    pub fn is_fedora(&self) -> bool {
        self.distro == "fedora"
    }

    pub fn is_debian_family(&self) -> bool {
        self.family == PlatformFamily::Debian
    }

    pub fn is_debian(&self) -> bool {
        self.distro == "debian"
    }

    pub fn is_ubuntu(&self) -> bool {
        self.distro == "ubuntu"
    }

    /// Ubuntu 18.04 specifically
    pub fn is_bionic(&self) -> bool {
        self.is_ubuntu() && self.raw_version == "18.04"
    }

    pub fn is_amazon(&self) -> bool {
        self.distro == "amazon"
    }
}

impl fmt::Display for PlatformProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.distro, self.raw_version)?;
        if let Some(codename) = self.codename {
            write!(f, " ({})", codename)?;
        }
        write!(f, " [{}, {}]", self.family, self.kernel_arch)
    }
}

/// Distributions that pin a family, and the family they pin
const PINNED_DISTROS: &[(&str, PlatformFamily)] = &[
    ("debian", PlatformFamily::Debian),
    ("ubuntu", PlatformFamily::Debian),
    ("fedora", PlatformFamily::Fedora),
    ("amazon", PlatformFamily::Amazon),
];

fn check_family(family: PlatformFamily, distro: &str) -> Result<()> {
    if let Some((_, expected)) = PINNED_DISTROS.iter().find(|(name, _)| *name == distro) {
        if *expected != family {
            return Err(Error::InconsistentPlatform(format!(
                "platform {} belongs to the {} family, not {}",
                distro, expected, family
            )));
        }
        return Ok(());
    }

    // Families with a fixed member list
    match family {
        PlatformFamily::Debian | PlatformFamily::Fedora | PlatformFamily::Amazon => {
            Err(Error::InconsistentPlatform(format!(
                "platform {} is not a supported member of the {} family",
                distro, family
            )))
        }
        PlatformFamily::Rhel | PlatformFamily::Other => Ok(()),
    }
}
