// src/repository/mod.rs

//! Docker package repository resolution
//!
//! This module computes where a platform's package manager should fetch
//! Docker packages from:
//! - yum/dnf repositories for RHEL-family and Fedora systems
//! - apt repositories for Debian and Ubuntu
//! - an explicit `Unsupported` result for everything else
//!
//! Nothing here touches the network or filesystem. Registering the
//! descriptor is left to a [`RepositoryRegistrar`](crate::install::RepositoryRegistrar).

mod channel;
mod descriptor;

pub use channel::{Channel, DEFAULT_CHANNEL};
pub use descriptor::{APT_KEYSERVER, REPOSITORY_NAME, RepositoryDescriptor, RepositoryKind};

use crate::platform::{PlatformFamily, PlatformProfile, map_architecture};
use serde::Serialize;
use tracing::debug;

/// Root of the upstream Linux package feeds
pub const DOWNLOAD_BASE_URL: &str = "https://download.docker.com/linux";

/// Reason attached to unsupported platforms
pub const UNSUPPORTED_REASON: &str = "no repository definition for this platform";

/// Outcome of repository resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RepositoryPlan {
    /// A repository should be registered
    Configured(RepositoryDescriptor),
    /// No repository is known for this platform; callers skip registration
    Unsupported { reason: String },
}

impl RepositoryPlan {
    pub fn descriptor(&self) -> Option<&RepositoryDescriptor> {
        match self {
            Self::Configured(descriptor) => Some(descriptor),
            Self::Unsupported { .. } => None,
        }
    }

    pub fn is_supported(&self) -> bool {
        matches!(self, Self::Configured(_))
    }
}

/// Compute the repository definition for a platform and channel
pub fn resolve_repository(profile: &PlatformProfile, channel: &Channel) -> RepositoryPlan {
    let plan = match profile.family() {
        PlatformFamily::Rhel | PlatformFamily::Fedora => {
            RepositoryPlan::Configured(yum_descriptor(profile, channel))
        }
        PlatformFamily::Debian => RepositoryPlan::Configured(apt_descriptor(profile, channel)),
        PlatformFamily::Amazon | PlatformFamily::Other => RepositoryPlan::Unsupported {
            reason: UNSUPPORTED_REASON.to_string(),
        },
    };

    debug!("Repository plan for {}: {:?}", profile, plan);
    plan
}

fn yum_descriptor(profile: &PlatformProfile, channel: &Channel) -> RepositoryDescriptor {
    let segment = if profile.family() == PlatformFamily::Fedora {
        "fedora"
    } else {
        "centos"
    };
    let arch = profile.kernel_arch();

    RepositoryDescriptor {
        name: REPOSITORY_NAME.to_string(),
        kind: RepositoryKind::Yum,
        base_url: format!(
            "{}/{}/{}/{}/{}",
            DOWNLOAD_BASE_URL,
            segment,
            profile.major_version(),
            arch,
            channel.primary()
        ),
        gpg_key_url: format!("{}/{}/gpg", DOWNLOAD_BASE_URL, segment),
        architecture: arch.to_string(),
        components: vec![channel.primary().to_string()],
        display_name: format!("Docker {} repository", channel.capitalized()),
        suite: None,
        keyserver: None,
        gpg_check: true,
        enabled: true,
    }
}

fn apt_descriptor(profile: &PlatformProfile, channel: &Channel) -> RepositoryDescriptor {
    let distro = profile.distro();

    RepositoryDescriptor {
        name: REPOSITORY_NAME.to_string(),
        kind: RepositoryKind::Apt,
        base_url: format!("{}/{}", DOWNLOAD_BASE_URL, distro),
        gpg_key_url: format!("{}/{}/gpg", DOWNLOAD_BASE_URL, distro),
        architecture: map_architecture(profile.kernel_arch()),
        components: channel.components().to_vec(),
        display_name: format!("Docker {} repository", channel.capitalized()),
        suite: profile.codename().map(|c| c.to_string()),
        keyserver: Some(APT_KEYSERVER.to_string()),
        gpg_check: true,
        enabled: true,
    }
}
